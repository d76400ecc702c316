//! Authentication for the card terminal
//!
//! A session runs one card through the state machine:
//!
//! ```text
//! Start -> Lookup -> Found ----------------------+
//!                 -> NotFound -> Registering -> Registered
//!                                                |
//!          CheckingExpiry <----------------------+
//!            -> Expired                       (deny)
//!            -> NotExpired -> VerifyingPin
//!                 -> Exhausted                (deny)
//!                 -> Verified -> Authorizing
//!                      -> AdminGranted | UserGranted  (allow)
//! ```
//!
//! # Security Model
//!
//! - PINs are stored as unsalted SHA-256 digests and compared in constant time
//! - The attempt counter lives only for the session; nothing is persisted
//! - Every decision writes one audit entry

mod orchestrator;
mod pin;
mod registration;

pub use orchestrator::{Authenticator, Session};
pub use pin::{PinOutcome, PinVerifier, DEFAULT_MAX_ATTEMPTS};
pub use registration::{Registration, RegistrationError};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use cardgate_core::{CardError, DEFAULT_MAX_CARD_NUMBER_LEN, MAX_PIN_LENGTH, MIN_PIN_LENGTH};

/// States a session passes through
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    Start,
    Lookup,
    Found,
    NotFound,
    Registering,
    Registered,
    CheckingExpiry,
    Expired,
    NotExpired,
    VerifyingPin,
    Verified,
    Exhausted,
    Authorizing,
    AdminGranted,
    UserGranted,
}

/// Terminal result of a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    AdminGranted,
    UserGranted,
    DeniedExpired,
    DeniedIncorrectPin,
    /// Registration input failed validation
    RegistrationRejected(CardError),
    /// Card number failed validation before lookup
    InvalidCard,
    /// Operator input ended before a decision was reached
    Aborted,
}

impl SessionOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, SessionOutcome::AdminGranted | SessionOutcome::UserGranted)
    }

    /// Process exit status for `--exit-status` mode
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionOutcome::AdminGranted | SessionOutcome::UserGranted => 0,
            SessionOutcome::DeniedExpired
            | SessionOutcome::DeniedIncorrectPin
            | SessionOutcome::InvalidCard => 1,
            SessionOutcome::RegistrationRejected(_) | SessionOutcome::Aborted => 2,
        }
    }
}

/// Limits applied during a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPolicy {
    /// PIN attempts before the session is denied
    pub max_attempts: u32,
    pub max_card_number_len: usize,
    pub min_pin_len: usize,
    pub max_pin_len: usize,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_card_number_len: DEFAULT_MAX_CARD_NUMBER_LEN,
            min_pin_len: MIN_PIN_LENGTH,
            max_pin_len: MAX_PIN_LENGTH,
        }
    }
}

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in local time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
