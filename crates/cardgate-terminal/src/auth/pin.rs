//! Attempt-bounded PIN challenge

use tracing::{debug, info};
use zeroize::Zeroizing;

use cardgate_core::PinDigest;

use crate::operator::{Notice, Operator, Prompt};

/// Default number of PIN attempts per session
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Result of a PIN challenge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOutcome {
    /// Correct PIN on the given attempt (1-based)
    Verified { attempts_used: u32 },
    /// Every attempt failed, or input ran out
    Exhausted,
}

/// Challenges the operator for a PIN matching a stored digest
#[derive(Clone, Copy, Debug)]
pub struct PinVerifier {
    max_attempts: u32,
}

impl PinVerifier {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Prompt until the PIN matches or attempts run out.
    ///
    /// Closed input counts as failure of all remaining attempts.
    pub fn verify(&self, stored: &PinDigest, operator: &mut dyn Operator) -> PinOutcome {
        for attempt in 1..=self.max_attempts {
            let Some(entered) = operator.ask(Prompt::Pin) else {
                debug!(attempt, "PIN input closed");
                return PinOutcome::Exhausted;
            };
            let entered = Zeroizing::new(entered);

            if PinDigest::of(&entered).matches(stored) {
                return PinOutcome::Verified {
                    attempts_used: attempt,
                };
            }

            let attempts_left = self.max_attempts - attempt;
            info!(attempt, attempts_left, "Incorrect PIN");
            operator.notify(&Notice::IncorrectPin { attempts_left });
        }

        PinOutcome::Exhausted
    }
}

impl Default for PinVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::ScriptedOperator;

    #[test]
    fn test_three_wrong_pins_exhaust() {
        let stored = PinDigest::of("1234");
        let mut operator = ScriptedOperator::new(["0000", "1111", "2222"]);

        let outcome = PinVerifier::default().verify(&stored, &mut operator);

        assert_eq!(outcome, PinOutcome::Exhausted);
        assert_eq!(
            operator.notices(),
            &[
                Notice::IncorrectPin { attempts_left: 2 },
                Notice::IncorrectPin { attempts_left: 1 },
                Notice::IncorrectPin { attempts_left: 0 },
            ]
        );
    }

    #[test]
    fn test_success_on_last_attempt() {
        let stored = PinDigest::of("1234");
        let mut operator = ScriptedOperator::new(["9999", "9999", "1234"]);

        let outcome = PinVerifier::new(3).verify(&stored, &mut operator);

        assert_eq!(outcome, PinOutcome::Verified { attempts_used: 3 });
        assert_eq!(operator.notices().len(), 2);
    }

    #[test]
    fn test_no_prompt_after_success() {
        let stored = PinDigest::of("1234");
        let mut operator = ScriptedOperator::new(["1234", "1234"]);

        let outcome = PinVerifier::default().verify(&stored, &mut operator);

        assert_eq!(outcome, PinOutcome::Verified { attempts_used: 1 });
        assert_eq!(operator.prompts(), &[Prompt::Pin]);
        assert_eq!(operator.remaining(), 1);
    }

    #[test]
    fn test_no_fourth_attempt() {
        let stored = PinDigest::of("1234");
        let mut operator = ScriptedOperator::new(["0000", "0000", "0000", "1234"]);

        let outcome = PinVerifier::default().verify(&stored, &mut operator);

        assert_eq!(outcome, PinOutcome::Exhausted);
        assert_eq!(operator.remaining(), 1);
    }

    #[test]
    fn test_closed_input_exhausts() {
        let stored = PinDigest::of("1234");
        let mut operator = ScriptedOperator::new(["0000"]);

        let outcome = PinVerifier::default().verify(&stored, &mut operator);

        assert_eq!(outcome, PinOutcome::Exhausted);
        assert_eq!(operator.prompts().len(), 2);
    }
}
