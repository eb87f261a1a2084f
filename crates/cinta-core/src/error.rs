//! Error types for Cinta Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // Storage errors
    #[error("Settings storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to write setting '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("Failed to encode settings: {0}")]
    Serialization(#[from] serde_json::Error),

    // Settings form errors
    #[error("Invalid value for '{field}': {value:?}")]
    InvalidSetting { field: &'static str, value: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a storage write error
    pub fn storage_write(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::StorageWrite {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid settings input error
    pub fn invalid_setting(field: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidSetting {
            field,
            value: value.into(),
        }
    }

    /// Returns true if the player keeps working normally after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StorageUnavailable(_)
                | Error::StorageWrite { .. }
                | Error::InvalidSetting { .. }
        )
    }

    /// Returns the error code reported to the JS layer
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Error::StorageWrite { .. } => "STORAGE_WRITE",
            Error::Serialization(_) => "SERIALIZATION",
            Error::InvalidSetting { .. } => "INVALID_SETTING",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
