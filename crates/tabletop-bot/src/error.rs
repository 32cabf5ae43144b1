//! Error types for the bot engine.

use thiserror::Error;

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the engine.
///
/// Bad user input is not an error: it becomes a usage reply.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Throttle configuration rejected
    #[error("Throttle error: {0}")]
    Throttle(#[from] tabletop_throttle::ThrottleError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Message pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// No handler for an event
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
