//! One-way PIN digests
//!
//! A PIN is stored only as the SHA-256 of its UTF-8 bytes, hex-encoded.
//!
//! # Known weakness
//!
//! The digest is unsalted and single-round, so a stolen record store can be
//! brute-forced across the small PIN space. Moving to a salted, memory-hard
//! hash changes every stored digest and has to ship as a versioned record
//! format, not as a drop-in replacement of this function.

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CardError;

/// Length of a hex-encoded digest
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 digest of a PIN, kept as 64 lowercase hex characters
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PinDigest(String);

impl PinDigest {
    /// Digest a PIN
    pub fn of(pin: &str) -> Self {
        let hash = Sha256::digest(pin.as_bytes());
        Self(hex::encode(hash))
    }

    /// Parse a stored digest, normalising to lowercase
    pub fn from_hex(s: &str) -> Result<Self, CardError> {
        if s.len() != DIGEST_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CardError::InvalidDigest(format!(
                "expected {} hex characters",
                DIGEST_HEX_LEN
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Compare against another digest in constant time
    pub fn matches(&self, other: &PinDigest) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinDigest({}..)", &self.0[..8])
    }
}
