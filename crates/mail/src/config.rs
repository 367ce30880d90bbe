//! Configuration loading for mail transfers
//!
//! Credentials are loaded from (in order of priority):
//! 1. JSON file (~/.config/ferry/graph-credentials.json)
//! 2. Runtime environment variables (fallback)
//!
//! Transfer settings live in ~/.config/ferry/settings.json; every field has a
//! default, so a missing or partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audit::DEFAULT_DELIMITER;
use crate::transfer::{ConfirmMode, DEFAULT_BATCH_THRESHOLD, DEFAULT_WAIT_TIME, TransferOptions};

/// Credentials filename in the Ferry config directory
const CREDENTIALS_FILE: &str = "graph-credentials.json";

/// Settings filename in the Ferry config directory
pub const SETTINGS_FILE: &str = "settings.json";

const ACCESS_TOKEN_ENV: &str = "FERRY_ACCESS_TOKEN";
const ACTING_USER_ENV: &str = "FERRY_ACTING_USER";

/// Bearer token and identity for Microsoft Graph access
///
/// Acquiring the token is left to the operator (e.g. `az account get-access-token`).
#[derive(Clone, Deserialize)]
pub struct GraphCredentials {
    pub access_token: String,
    /// Identity recorded in audit logs. Resolved via `/me` when absent.
    #[serde(default)]
    pub acting_user: Option<String>,
    /// Override for the Graph endpoint, e.g. a national cloud
    #[serde(default)]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("access_token", &"<redacted>")
            .field("acting_user", &self.acting_user)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GraphCredentials {
    /// Load credentials using the following priority:
    /// 1. JSON file (~/.config/ferry/graph-credentials.json)
    /// 2. Runtime environment variables
    pub fn load() -> Result<Self> {
        if config::config_exists(CREDENTIALS_FILE) {
            let creds: GraphCredentials = config::load_json(CREDENTIALS_FILE)?;
            return creds.validated();
        }

        Self::from_env()
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let creds: GraphCredentials = config::load_json_file(path)?;
        creds.validated()
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let creds: GraphCredentials =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        creds.validated()
    }

    /// Load credentials from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .with_context(|| format!("{} environment variable not set", ACCESS_TOKEN_ENV))?;
        let acting_user = std::env::var(ACTING_USER_ENV).ok().filter(|u| !u.is_empty());

        Self {
            access_token,
            acting_user,
            base_url: None,
        }
        .validated()
    }

    /// Get the default credentials file path (~/.config/ferry/graph-credentials.json)
    pub fn default_credentials_path() -> Option<PathBuf> {
        config::config_path(CREDENTIALS_FILE)
    }

    /// Check if credentials are available (file or env var)
    pub fn is_available() -> bool {
        config::config_exists(CREDENTIALS_FILE) || std::env::var(ACCESS_TOKEN_ENV).is_ok()
    }

    fn validated(mut self) -> Result<Self> {
        self.access_token = self.access_token.trim().to_string();
        anyhow::ensure!(!self.access_token.is_empty(), "Access token is empty");
        Ok(self)
    }
}

/// Persisted defaults for `ferry move`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Batch size threshold in bytes
    pub batch_size: u64,
    pub wait_time_secs: u64,
    pub check_target_empty: bool,
    /// Ask before each batch after the first
    pub confirm: bool,
    /// Audit log path. No audit log when unset.
    pub audit_log: Option<PathBuf>,
    pub delimiter: char,
    pub quota_timeout_secs: Option<u64>,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_THRESHOLD,
            wait_time_secs: DEFAULT_WAIT_TIME.as_secs(),
            check_target_empty: true,
            confirm: true,
            audit_log: None,
            delimiter: DEFAULT_DELIMITER,
            quota_timeout_secs: None,
        }
    }
}

impl TransferSettings {
    /// Load settings.json, falling back to defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        config::load_json_or_default(SETTINGS_FILE)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings JSON")
    }

    /// Write settings.json, returning its path
    pub fn save(&self) -> Result<PathBuf> {
        config::save_json(SETTINGS_FILE, self)
    }

    pub fn settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    /// Orchestrator options for these settings
    pub fn to_options(&self) -> TransferOptions {
        TransferOptions {
            threshold: self.batch_size,
            wait_time: Duration::from_secs(self.wait_time_secs),
            check_target_empty: self.check_target_empty,
            confirm: if self.confirm {
                ConfirmMode::Interactive
            } else {
                ConfirmMode::Automatic
            },
            quota_timeout: self.quota_timeout_secs.map(Duration::from_secs),
        }
    }
}
