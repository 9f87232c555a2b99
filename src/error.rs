//! Error types for stickerlandia-events

use thiserror::Error;

/// Errors that can occur in the event publishing subsystem
#[derive(Debug, Error)]
pub enum EventError {
    /// Transport connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Publish failure on a specific channel
    #[error("Failed to publish event to channel '{channel}': {reason}")]
    Publish { channel: String, reason: String },

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error (unknown transport, missing settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stream/topic creation or management error
    #[error("Stream error: {0}")]
    Stream(String),

    /// Event bus rejected one or more submitted entries
    #[error("Event bus rejected entry for channel '{channel}': {reason}")]
    BusRejected { channel: String, reason: String },

    /// Timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Background publish task was cancelled or panicked
    #[error("Publish task failed: {0}")]
    Task(String),
}

/// Result type alias for event operations
pub type Result<T> = std::result::Result<T, EventError>;
