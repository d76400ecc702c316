//! Audit trail of access decisions
//!
//! One line per decision, appended to a text file:
//!
//! ```text
//! [2025-06-01 09:30:00] Card: 1111222233334444 | Name: Alice | Status: Access Granted
//! ```
//!
//! The `Name:` segment is left out while the holder is unknown. The log is
//! write-only from the system's point of view.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::AuditError;

/// Default audit log file name
pub const DEFAULT_AUDIT_FILE: &str = "audit.log";

/// Timestamp format of audit lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status texts written by the authenticator
pub mod status {
    pub const ACCESS_GRANTED: &str = "Access Granted";
    pub const DENIED_EXPIRED: &str = "Access Denied - Expired";
    pub const DENIED_INCORRECT_PIN: &str = "Access Denied - Incorrect PIN";
    pub const DENIED_INVALID_CARD: &str = "Access Denied - Invalid Card Number";
    pub const REGISTRATION_REJECTED: &str = "Registration Rejected";
}

/// A single audit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub card_number: String,
    pub holder_name: Option<String>,
    pub status: String,
}

impl AuditEntry {
    pub fn new(
        timestamp: NaiveDateTime,
        card_number: impl Into<String>,
        holder_name: Option<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            card_number: card_number.into(),
            holder_name: holder_name.filter(|name| !name.is_empty()),
            status: status.into(),
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Card: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.card_number
        )?;
        if let Some(name) = &self.holder_name {
            write!(f, " | Name: {}", name)?;
        }
        write!(f, " | Status: {}", self.status)
    }
}

/// Append-only audit sink
pub trait AuditLog {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError>;
}

/// Audit log backed by a text file
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        let write_error = |source| AuditError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;

        writeln!(file, "{}", entry).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        debug!(card = %entry.card_number, status = %entry.status, "Audit entry written");
        Ok(())
    }
}

/// In-memory audit log, mostly for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_line_with_name() {
        let entry = AuditEntry::new(
            at(9, 30, 0),
            "1111222233334444",
            Some("Alice".to_string()),
            status::ACCESS_GRANTED,
        );
        assert_eq!(
            entry.to_string(),
            "[2025-06-01 09:30:00] Card: 1111222233334444 | Name: Alice | Status: Access Granted"
        );
    }

    #[test]
    fn test_line_without_name() {
        let entry = AuditEntry::new(at(23, 5, 9), "9999", None, status::REGISTRATION_REJECTED);
        assert_eq!(
            entry.to_string(),
            "[2025-06-01 23:05:09] Card: 9999 | Status: Registration Rejected"
        );

        // An empty name counts as unknown
        let entry = AuditEntry::new(at(23, 5, 9), "9999", Some(String::new()), "x");
        assert_eq!(entry.holder_name, None);
    }

    #[test]
    fn test_file_log_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let mut log = FileAuditLog::new(&path);

        log.record(&AuditEntry::new(at(1, 0, 0), "1", None, "first")).unwrap();
        log.record(&AuditEntry::new(at(2, 0, 0), "2", None, "second")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Status: first"));
        assert!(lines[1].ends_with("Status: second"));
    }

    #[test]
    fn test_file_log_write_failure() {
        let dir = tempdir().unwrap();
        // Path is a directory, so opening it for append fails
        let mut log = FileAuditLog::new(dir.path());
        let err = log
            .record(&AuditEntry::new(at(1, 0, 0), "1", None, "x"))
            .unwrap_err();
        assert!(matches!(err, AuditError::Write { .. }));
    }
}
