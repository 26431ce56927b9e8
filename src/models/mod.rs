pub mod payment;
pub mod settings;
