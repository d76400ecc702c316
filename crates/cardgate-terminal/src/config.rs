//! Terminal configuration
//!
//! Values are resolved in order: built-in defaults, then a JSON config
//! file, then command-line overrides applied by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cardgate_core::audit::DEFAULT_AUDIT_FILE;
use cardgate_core::store::DEFAULT_STORE_FILE;

use crate::auth::AuthPolicy;
use crate::error::{Result, TerminalError};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under the platform config dir
const CONFIG_DIR_NAME: &str = "cardgate";

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Card record store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Audit log file
    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: PathBuf,

    /// Session limits
    #[serde(flatten)]
    pub policy: AuthPolicy,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_AUDIT_FILE)
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            audit_log_path: default_audit_log_path(),
            policy: AuthPolicy::default(),
        }
    }
}

impl TerminalConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and any problem with it falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn load_default() -> Self {
        let path = match Self::default_file_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        Self::from_file(&path).unwrap_or_else(|e| {
            warn!("Ignoring config file {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Check that limits are usable
    pub fn validate(&self) -> Result<()> {
        let policy = &self.policy;
        if policy.max_attempts == 0 {
            return Err(TerminalError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if policy.max_card_number_len == 0 {
            return Err(TerminalError::Config(
                "max_card_number_len must be at least 1".to_string(),
            ));
        }
        if policy.min_pin_len == 0 || policy.min_pin_len > policy.max_pin_len {
            return Err(TerminalError::Config(format!(
                "PIN length bounds {}-{} are inconsistent",
                policy.min_pin_len, policy.max_pin_len
            )));
        }
        Ok(())
    }
}
