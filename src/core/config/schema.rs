//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Config File
//!
//! Located at (in order of precedence):
//! 1. `--config <path>` if given
//! 2. `$GHEXPORT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/ghexport/config.toml`
//! 4. `~/.ghexport/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad file is
//! reported before any request is made.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::Scope;
use crate::output::Delimiter;

/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Export configuration (user scope).
///
/// # Example
///
/// ```toml
/// owner = "rust-lang"
/// repo = "cargo"
/// delimiter = "tab"
/// per_page = 50
/// header = true
/// api_base = "https://github.example.com/api/v3"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Default repository owner
    pub owner: Option<String>,

    /// Default repository name
    pub repo: Option<String>,

    /// Field delimiter ("comma" or "tab")
    pub delimiter: Option<Delimiter>,

    /// Items requested per page (1-100)
    pub per_page: Option<u8>,

    /// Write a header row before the data rows
    pub header: Option<bool>,

    /// REST API base URL (GitHub Enterprise)
    pub api_base: Option<String>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Either may be set without the other
        if let Some(owner) = &self.owner {
            Scope::check_owner(owner)
                .map_err(|e| ConfigError::InvalidValue(format!("owner: {}", e)))?;
        }
        if let Some(repo) = &self.repo {
            Scope::check_repo(repo)
                .map_err(|e| ConfigError::InvalidValue(format!("repo: {}", e)))?;
        }

        if let Some(per_page) = self.per_page {
            validate_per_page(per_page)?;
        }

        if let Some(api_base) = &self.api_base {
            validate_api_base(api_base)?;
        }

        Ok(())
    }
}

/// Check a page size against the API limits.
pub fn validate_per_page(per_page: u8) -> Result<(), ConfigError> {
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(ConfigError::InvalidValue(format!(
            "per_page must be between 1 and {}, got {}",
            MAX_PER_PAGE, per_page
        )));
    }
    Ok(())
}

/// Check that an API base is an http(s) URL.
pub fn validate_api_base(api_base: &str) -> Result<(), ConfigError> {
    let rest = api_base
        .strip_prefix("https://")
        .or_else(|| api_base.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue(format!(
            "api_base must be an http(s) URL, got '{}'",
            api_base
        ))),
    }
}
