use crate::error::SettingsError;
use crate::models::settings::ProcessorSettings;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Persisted bot settings this crate reads but does not own.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Processor row, `None` when it was never saved.
    async fn processor_settings(&self) -> Result<Option<ProcessorSettings>, SettingsError>;

    /// Admin chat for payment notifications. `None` or `Some(0)` means disabled.
    async fn notification_target(&self) -> Result<Option<i64>, SettingsError>;
}

#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    processor: RwLock<Option<ProcessorSettings>>,
    notification_target: RwLock<Option<i64>>,
}

impl InMemorySettingsStore {
    pub fn new(processor: Option<ProcessorSettings>, notification_target: Option<i64>) -> Self {
        Self {
            processor: RwLock::new(processor),
            notification_target: RwLock::new(notification_target),
        }
    }

    pub fn set_processor(&self, settings: Option<ProcessorSettings>) {
        *self.processor.write() = settings;
    }

    pub fn set_notification_target(&self, chat_id: Option<i64>) {
        *self.notification_target.write() = chat_id;
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn processor_settings(&self) -> Result<Option<ProcessorSettings>, SettingsError> {
        Ok(self.processor.read().clone())
    }

    async fn notification_target(&self) -> Result<Option<i64>, SettingsError> {
        Ok(*self.notification_target.read())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    processor: Option<ProcessorSettings>,
    notifications: Option<NotificationSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct NotificationSettings {
    chat_id: Option<i64>,
}

/// TOML-backed store, re-read on every call so edits apply without restart.
///
/// ```toml
/// [processor]
/// terminal_key = "TinkoffBankTest"
/// password = "secret"
///
/// [notifications]
/// chat_id = 123456789
/// ```
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<SettingsFile, SettingsError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SettingsFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn processor_settings(&self) -> Result<Option<ProcessorSettings>, SettingsError> {
        Ok(self.load().await?.processor)
    }

    async fn notification_target(&self) -> Result<Option<i64>, SettingsError> {
        Ok(self.load().await?.notifications.and_then(|n| n.chat_id))
    }
}
