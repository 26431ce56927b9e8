pub mod notifier;
pub mod processor_client;
pub mod settings_store;
pub mod signing;

pub use notifier::{Notifier, TelegramNotifier};
pub use processor_client::TBankClient;
pub use settings_store::{FileSettingsStore, InMemorySettingsStore, SettingsStore};
