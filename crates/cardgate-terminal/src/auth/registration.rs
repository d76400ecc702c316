//! One-time registration of an unknown card

use tracing::debug;
use zeroize::Zeroizing;

use cardgate_core::card::{validate_holder_name, validate_pin};
use cardgate_core::{CardError, CardRecord, ExpiryDate, PinDigest, Role};

use super::AuthPolicy;
use crate::operator::{Operator, Prompt};

/// Why registration did not produce a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Invalid(#[from] CardError),

    #[error("input closed during registration")]
    Aborted,
}

/// Collects and validates the fields of a new card
pub struct Registration<'a> {
    policy: &'a AuthPolicy,
}

impl<'a> Registration<'a> {
    pub fn new(policy: &'a AuthPolicy) -> Self {
        Self { policy }
    }

    /// Ask for name, expiry, PIN and role, stopping at the first invalid field.
    ///
    /// The raw PIN is digested here and dropped; it never leaves this call.
    pub fn collect(
        &self,
        card_number: &str,
        operator: &mut dyn Operator,
    ) -> Result<CardRecord, RegistrationError> {
        let name = ask(operator, Prompt::HolderName)?;
        let holder_name = validate_holder_name(&name)?;

        let expiry: ExpiryDate = ask(operator, Prompt::ExpiryDate)?.parse()?;

        let pin = Zeroizing::new(ask(operator, Prompt::NewPin)?);
        validate_pin(&pin, self.policy.min_pin_len, self.policy.max_pin_len)?;
        let pin_digest = PinDigest::of(&pin);

        let role: Role = ask(operator, Prompt::Role)?.parse()?;

        debug!(card = card_number, role = %role, "Registration collected");
        Ok(CardRecord::new(card_number, holder_name, expiry, pin_digest, role))
    }
}

fn ask(operator: &mut dyn Operator, prompt: Prompt) -> Result<String, RegistrationError> {
    operator.ask(prompt).ok_or(RegistrationError::Aborted)
}
