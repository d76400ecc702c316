//! Card record storage
//!
//! Records are kept one per line in a flat text file:
//!
//! ```text
//! cardNumber,holderName,MM/YY,pinDigest,role
//! ```
//!
//! The store is append-only. There is no update, no delete and no duplicate
//! check; lookup returns the first matching line.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::card::CardRecord;
use crate::error::StoreError;

/// Default record store file name
pub const DEFAULT_STORE_FILE: &str = "cardsDetails.txt";

/// Keyed persistence for card records
pub trait RecordStore {
    /// Find the first record with exactly this card number.
    ///
    /// A missing or unreadable store behaves like an empty one.
    fn lookup(&self, card_number: &str) -> Option<CardRecord>;

    /// Append a record. Durable once this returns `Ok`.
    fn append(&mut self, record: &CardRecord) -> Result<(), StoreError>;
}

/// Flat-file record store
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every well-formed record in file order.
    ///
    /// Malformed lines, including lines that are not valid UTF-8, are
    /// skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<CardRecord>, StoreError> {
        let contents = match self.read_contents()? {
            Some(contents) => contents,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (index, raw) in contents.split(|&b| b == b'\n').enumerate() {
            let decoded = std::str::from_utf8(raw)
                .map_err(|e| e.to_string())
                .and_then(|line| {
                    if line.trim().is_empty() {
                        Ok(None)
                    } else {
                        CardRecord::from_line(line).map(Some)
                    }
                });
            match decoded {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(reason) => {
                    let err = StoreError::Malformed { line: index + 1, reason };
                    warn!(path = ?self.path, "Skipping record: {}", err);
                }
            }
        }
        Ok(records)
    }

    /// Read the raw store bytes, `None` if it does not exist yet
    fn read_contents(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for FlatFileStore {
    fn lookup(&self, card_number: &str) -> Option<CardRecord> {
        let records = match self.load_all() {
            Ok(records) => records,
            Err(e) => {
                warn!("Treating record store as empty: {}", e);
                return None;
            }
        };

        let found = records.into_iter().find(|r| r.card_number == card_number);
        debug!(card = card_number, found = found.is_some(), "Record lookup");
        found
    }

    fn append(&mut self, record: &CardRecord) -> Result<(), StoreError> {
        let existing = match self.read_contents() {
            Ok(contents) => contents.unwrap_or_default(),
            Err(StoreError::Unreadable { source, .. }) => return Err(self.write_error(source)),
            Err(e) => return Err(e),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        // Existing bytes are carried over untouched
        let mut contents = existing;
        if !contents.is_empty() && !contents.ends_with(b"\n") {
            contents.push(b'\n');
        }
        contents.extend_from_slice(record.to_line().as_bytes());
        contents.push(b'\n');

        // Write to temp file first, then rename for atomicity
        let temp_path = self.temp_path();
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(&contents)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.write_error(e));
        }

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.write_error(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.write_error(e)
        })?;

        debug!(card = %record.card_number, path = ?self.path, "Record appended");
        Ok(())
    }
}
