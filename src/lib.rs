//! T-Bank (Tinkoff) acquiring integration for the subscription bot: signed
//! `Init`/`GetState` calls, credential loading from the bot settings and
//! admin notification on confirmed payments.

pub mod app;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::Config;
pub use error::{ConfigError, NotifyError, ProcessorError, SettingsError};
pub use models::payment::{Customer, PaymentSession, PaymentStatus, ProcessorResponse};
pub use services::{FileSettingsStore, InMemorySettingsStore, Notifier, SettingsStore, TBankClient};
