//! Error types for the card terminal

use thiserror::Error;

/// Result type alias for terminal operations
pub type Result<T> = std::result::Result<T, TerminalError>;

/// Errors that can occur outside a session's own decisions
#[derive(Debug, Error)]
pub enum TerminalError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config values are inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}
