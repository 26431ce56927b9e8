use serde::{Deserialize, Serialize};
use std::fmt;

/// Processor row as persisted in the bot settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorSettings {
    pub terminal_key: Option<String>,
    pub password: Option<String>,
}

impl ProcessorSettings {
    pub fn new(terminal_key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            terminal_key: Some(terminal_key.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields present and non-empty, or nothing.
    pub fn credentials(&self) -> Option<Credentials> {
        let terminal_key = self.terminal_key.as_deref().filter(|k| !k.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some(Credentials {
            terminal_key: terminal_key.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub terminal_key: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("terminal_key", &self.terminal_key)
            .field("password", &"***")
            .finish()
    }
}
