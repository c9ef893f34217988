//! Error Types for the persona crate

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PersonaError>;

#[derive(Error, Debug)]
pub enum PersonaError {
    /// A knowledge document is missing or unreadable. Fatal at startup.
    #[error("Failed to load {}: {reason}", path.display())]
    StartupLoad { path: PathBuf, reason: String },

    /// Notification could not be delivered. Never leaves the notifier.
    #[error("Notification delivery failed: {0}")]
    Notification(String),
}

impl PersonaError {
    pub fn startup_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StartupLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
