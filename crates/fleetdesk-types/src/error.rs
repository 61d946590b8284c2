//! Error types for fleetdesk

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backing table is absent. Fatal for the session.
    #[error("Data file not found at {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("{field} '{value}' is already registered")]
    DuplicateKey { field: &'static str, value: String },

    /// Wrong credentials or a lookup that matched nothing
    #[error("{0}")]
    Mismatch(String),

    #[error("Failed to send email: {0}")]
    EmailDelivery(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

impl Error {
    /// Errors that end the operator's session instead of being reported and retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MissingFile(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_file_is_fatal() {
        assert!(Error::MissingFile(PathBuf::from("vehicles.csv")).is_fatal());
        assert!(!Error::NotLoggedIn.is_fatal());
        assert!(!Error::EmailDelivery("timeout".into()).is_fatal());
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = Error::DuplicateKey {
            field: "username",
            value: "alice".to_string(),
        };
        assert_eq!(err.to_string(), "username 'alice' is already registered");
    }
}
