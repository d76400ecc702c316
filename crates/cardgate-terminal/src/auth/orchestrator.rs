//! Session orchestration: lookup, registration, expiry, PIN, authorization

use tracing::{info, warn};

use cardgate_core::audit::status;
use cardgate_core::card::validate_card_number;
use cardgate_core::{AuditEntry, AuditLog, CardRecord, RecordStore};

use super::{
    AuthPolicy, AuthState, Clock, PinOutcome, PinVerifier, Registration, RegistrationError,
    SessionOutcome, SystemClock,
};
use crate::operator::{Notice, Operator, Prompt};

/// Result of one terminal session
#[derive(Debug, Clone)]
pub struct Session {
    pub outcome: SessionOutcome,
    /// Card in use, once known or registered
    pub record: Option<CardRecord>,
    /// Whether a registered record reached the store
    pub persisted: bool,
    /// States visited, in order
    pub trail: Vec<AuthState>,
}

impl Session {
    fn new() -> Self {
        Self {
            outcome: SessionOutcome::Aborted,
            record: None,
            persisted: false,
            trail: vec![AuthState::Start],
        }
    }

    fn enter(&mut self, state: AuthState) {
        self.trail.push(state);
    }

    fn finish(mut self, outcome: SessionOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Drives a card through registration and authentication
pub struct Authenticator<S, L, C = SystemClock> {
    store: S,
    audit: L,
    clock: C,
    policy: AuthPolicy,
}

impl<S: RecordStore, L: AuditLog> Authenticator<S, L, SystemClock> {
    pub fn new(store: S, audit: L, policy: AuthPolicy) -> Self {
        Self::with_clock(store, audit, policy, SystemClock)
    }
}

impl<S: RecordStore, L: AuditLog, C: Clock> Authenticator<S, L, C> {
    pub fn with_clock(store: S, audit: L, policy: AuthPolicy, clock: C) -> Self {
        Self {
            store,
            audit,
            clock,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit_log(&self) -> &L {
        &self.audit
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Run one session: ask for a card number and take it to a decision
    pub fn run(&mut self, operator: &mut dyn Operator) -> Session {
        let session = Session::new();

        let Some(card_number) = operator.ask(Prompt::CardNumber) else {
            info!("Input closed before a card was presented");
            return session;
        };

        if let Err(e) = validate_card_number(&card_number, self.policy.max_card_number_len) {
            self.log(&card_number, None, status::DENIED_INVALID_CARD);
            operator.notify(&Notice::InvalidCardNumber(e));
            operator.notify(&Notice::AccessDenied);
            return session.finish(SessionOutcome::InvalidCard);
        }

        self.authenticate(&card_number, operator, session)
    }

    fn authenticate(
        &mut self,
        card_number: &str,
        operator: &mut dyn Operator,
        mut session: Session,
    ) -> Session {
        session.enter(AuthState::Lookup);
        let record = match self.store.lookup(card_number) {
            Some(record) => {
                session.enter(AuthState::Found);
                session.persisted = true;
                record
            }
            None => {
                session.enter(AuthState::NotFound);
                match self.register(card_number, operator, &mut session) {
                    Some(record) => record,
                    None => return session,
                }
            }
        };

        let outcome = self.decide(&record, operator, &mut session);
        session.record = Some(record);
        session.outcome = outcome;
        session
    }

    /// Registration pass for an unknown card. `None` ends the session.
    fn register(
        &mut self,
        card_number: &str,
        operator: &mut dyn Operator,
        session: &mut Session,
    ) -> Option<CardRecord> {
        session.enter(AuthState::Registering);
        operator.notify(&Notice::RegisteringNewCard);

        let record = match Registration::new(&self.policy).collect(card_number, operator) {
            Ok(record) => record,
            Err(RegistrationError::Aborted) => {
                info!(card = card_number, "Registration abandoned");
                session.outcome = SessionOutcome::Aborted;
                return None;
            }
            Err(RegistrationError::Invalid(e)) => {
                let text = format!("{} - {}", status::REGISTRATION_REJECTED, e);
                self.log(card_number, None, &text);
                operator.notify(&Notice::RegistrationRejected(e.clone()));
                operator.notify(&Notice::AccessDenied);
                session.outcome = SessionOutcome::RegistrationRejected(e);
                return None;
            }
        };

        match self.store.append(&record) {
            Ok(()) => {
                session.persisted = true;
                operator.notify(&Notice::RegistrationSuccessful);
            }
            Err(e) => {
                // The session carries on with the unsaved record
                warn!("Registration not persisted: {}", e);
                operator.notify(&Notice::StoreWriteFailed);
            }
        }

        session.enter(AuthState::Registered);
        Some(record)
    }

    /// Expiry check, PIN challenge and role authorization
    fn decide(
        &mut self,
        record: &CardRecord,
        operator: &mut dyn Operator,
        session: &mut Session,
    ) -> SessionOutcome {
        let name = Some(record.holder_name.clone());

        session.enter(AuthState::CheckingExpiry);
        if record.expiry.is_expired(self.clock.now().date()) {
            session.enter(AuthState::Expired);
            self.log(&record.card_number, name, status::DENIED_EXPIRED);
            operator.notify(&Notice::DeniedExpired);
            operator.notify(&Notice::AccessDenied);
            return SessionOutcome::DeniedExpired;
        }
        session.enter(AuthState::NotExpired);

        session.enter(AuthState::VerifyingPin);
        let verifier = PinVerifier::new(self.policy.max_attempts);
        if verifier.verify(&record.pin_digest, operator) == PinOutcome::Exhausted {
            session.enter(AuthState::Exhausted);
            self.log(&record.card_number, name, status::DENIED_INCORRECT_PIN);
            operator.notify(&Notice::DeniedIncorrectPin);
            operator.notify(&Notice::AccessDenied);
            return SessionOutcome::DeniedIncorrectPin;
        }
        session.enter(AuthState::Verified);

        session.enter(AuthState::Authorizing);
        self.log(&record.card_number, name, status::ACCESS_GRANTED);
        operator.notify(&Notice::Welcome {
            name: record.holder_name.clone(),
        });

        if record.role.is_admin() {
            session.enter(AuthState::AdminGranted);
            operator.notify(&Notice::AdminAccess);
            SessionOutcome::AdminGranted
        } else {
            session.enter(AuthState::UserGranted);
            operator.notify(&Notice::UserAccess);
            SessionOutcome::UserGranted
        }
    }

    /// Write an audit entry; failures are warned about, never fatal
    fn log(&mut self, card_number: &str, holder_name: Option<String>, status: &str) {
        let entry = AuditEntry::new(self.clock.now(), card_number, holder_name, status);
        info!(card = card_number, status, "Access decision");
        if let Err(e) = self.audit.record(&entry) {
            warn!("Audit entry lost: {}", e);
        }
    }
}
