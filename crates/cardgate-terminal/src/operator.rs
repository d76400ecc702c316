//! The operator side of the terminal
//!
//! The authenticator never touches stdin/stdout directly. It asks an
//! [`Operator`] for raw strings and hands it [`Notice`]s to display.

use std::collections::VecDeque;
use std::fmt;

use cardgate_core::CardError;

/// Input requested from the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    CardNumber,
    HolderName,
    ExpiryDate,
    NewPin,
    Role,
    Pin,
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::CardNumber => "Insert card (enter card number): ",
            Prompt::HolderName => "Enter your name: ",
            Prompt::ExpiryDate => "Enter expiry date (MM/YY): ",
            Prompt::NewPin => "Set a numeric PIN: ",
            Prompt::Role => "Enter role (admin/user): ",
            Prompt::Pin => "Enter PIN: ",
        }
    }
}

/// Status text shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidCardNumber(CardError),
    RegisteringNewCard,
    RegistrationRejected(CardError),
    RegistrationSuccessful,
    StoreWriteFailed,
    IncorrectPin { attempts_left: u32 },
    DeniedExpired,
    DeniedIncorrectPin,
    Welcome { name: String },
    AdminAccess,
    UserAccess,
    AccessDenied,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidCardNumber(e) => write!(f, "Invalid card: {}.", e),
            Notice::RegisteringNewCard => f.write_str("Card not found. Registering new card."),
            Notice::RegistrationRejected(e) => write!(f, "Registration rejected: {}.", e),
            Notice::RegistrationSuccessful => f.write_str("Registration successful."),
            Notice::StoreWriteFailed => f.write_str("Error: Unable to write to file."),
            Notice::IncorrectPin { attempts_left } => {
                write!(f, "Incorrect PIN. Attempts left: {}", attempts_left)
            }
            Notice::DeniedExpired => f.write_str("Access Denied: Card expired."),
            Notice::DeniedIncorrectPin => f.write_str("Access Denied: Incorrect PIN."),
            Notice::Welcome { name } => write!(f, "Access Granted. Welcome, {}!", name),
            Notice::AdminAccess => {
                f.write_str("Admin Access: You can manage users or system setting.")
            }
            Notice::UserAccess => f.write_str("User Access: Limited privileges granted."),
            Notice::AccessDenied => f.write_str("Access Denied."),
        }
    }
}

/// Source of operator input and sink for status text
pub trait Operator {
    /// Ask for one value. `None` once input is exhausted.
    fn ask(&mut self, prompt: Prompt) -> Option<String>;

    fn notify(&mut self, notice: &Notice);
}

/// Operator that replays canned answers and records what it was told
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    prompts: Vec<Prompt>,
    notices: Vec<Notice>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Prompts asked so far, in order
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Answers that were never asked for
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn ask(&mut self, prompt: Prompt) -> Option<String> {
        self.prompts.push(prompt);
        self.answers.pop_front()
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
