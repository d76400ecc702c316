//! cardgate terminal - card access control at a single terminal
//!
//! This crate runs the terminal side of cardgate:
//! - Registration of unknown cards
//! - Expiry and PIN checks with a per-session attempt limit
//! - Role-based authorization
//! - Configuration and the console operator
//!
//! Storage and audit formats live in `cardgate-core`.

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod operator;

pub use auth::{AuthPolicy, AuthState, Authenticator, Session, SessionOutcome};
pub use config::TerminalConfig;
pub use console::ConsoleOperator;
pub use error::{Result, TerminalError};
pub use operator::{Notice, Operator, Prompt, ScriptedOperator};
