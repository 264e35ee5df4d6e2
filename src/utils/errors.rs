//! Error handling for RemindBuddy
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the RemindBuddy application
#[derive(Error, Debug)]
pub enum RemindBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {chat_id}")]
    UserNotFound { chat_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for RemindBuddy operations
pub type Result<T> = std::result::Result<T, RemindBuddyError>;

impl RemindBuddyError {
    /// Check if the error is recoverable within a handler turn
    pub fn is_recoverable(&self) -> bool {
        match self {
            RemindBuddyError::Database(_) => true,
            RemindBuddyError::Migration(_) => false,
            RemindBuddyError::Telegram(_) => true,
            RemindBuddyError::Config(_) => false,
            RemindBuddyError::UserNotFound { .. } => true,
            RemindBuddyError::EventNotFound { .. } => true,
            RemindBuddyError::InvalidStateTransition { .. } => false,
            RemindBuddyError::Serialization(_) => false,
            RemindBuddyError::Io(_) => true,
            RemindBuddyError::InvalidInput(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_fatal() {
        let err = RemindBuddyError::Config("missing token".to_string());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_not_found_is_recoverable() {
        let err = RemindBuddyError::EventNotFound { event_id: 7 };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Event not found: 7");
    }
}
