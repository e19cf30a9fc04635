//! Error types for the custom property renamer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown rename strategy '{value}' (expected 'none' or 'debug')")]
    InvalidStrategy { value: String },

    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

pub type Result<T> = std::result::Result<T, RenameError>;

impl RenameError {
    pub fn invalid_strategy(value: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            value: value.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// True for errors raised while building options, before any stylesheet is touched
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidStrategy { .. } | Self::InvalidPattern { .. })
    }
}
