//! Error types for cardgate core

use std::path::PathBuf;

use thiserror::Error;

/// Validation errors for card fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Expiry is not of the form MM/YY
    #[error("Expiry date must be MM/YY, got {0:?}")]
    MalformedExpiry(String),

    #[error("Card number must be 1-{max} characters without commas or spaces")]
    InvalidCardNumber { max: usize },

    #[error("Holder name must be non-empty and contain no commas or '|'")]
    InvalidHolderName,

    #[error("PIN must be {0}-{1} digits")]
    InvalidPin(usize, usize),

    #[error("Role must be a single word without commas")]
    InvalidRole,

    #[error("Invalid PIN digest: {0}")]
    InvalidDigest(String),
}

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot read record store {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write record store {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored line did not decode into a record
    #[error("Malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Audit log errors
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Cannot write audit log {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
