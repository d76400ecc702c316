//! cardgate core - card records and the persistence behind a card terminal
//!
//! This crate provides the pieces the terminal builds on:
//! - Card records and field validation
//! - One-way PIN digests
//! - Month-granular expiry checks
//! - The append-only record store
//! - The audit log

pub mod audit;
pub mod card;
pub mod digest;
pub mod error;
pub mod expiry;
pub mod store;

pub use audit::{AuditEntry, AuditLog, FileAuditLog, MemoryAuditLog};
pub use card::{CardRecord, Role, DEFAULT_MAX_CARD_NUMBER_LEN, MAX_PIN_LENGTH, MIN_PIN_LENGTH};
pub use digest::PinDigest;
pub use error::{AuditError, CardError, StoreError};
pub use expiry::ExpiryDate;
pub use store::{FlatFileStore, RecordStore};
