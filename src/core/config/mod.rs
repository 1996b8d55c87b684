//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! ghexport reads one optional TOML file holding defaults for the
//! export (owner, repository, delimiter, page size, API base).
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags and environment (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. The explicit `--config` path (must exist)
//! 2. `$GHEXPORT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/ghexport/config.toml`
//! 4. `~/.ghexport/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use ghexport::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Owner: {}", config.owner());
//! println!("Per page: {}", config.per_page());
//! ```

pub mod schema;

pub use schema::{validate_api_base, validate_per_page, FileConfig, MAX_PER_PAGE};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::forge::github::DEFAULT_API_BASE;
use crate::output::Delimiter;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GHEXPORT_CONFIG";

/// Default owner when neither config nor flags name one.
pub const DEFAULT_OWNER: &str = "golang";

/// Default repository when neither config nor flags name one.
pub const DEFAULT_REPO: &str = "go";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// The process environment consulted when searching for a config file.
///
/// Kept as a value so that lookup can be tested without mutating the
/// real environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigEnv {
    /// `$GHEXPORT_CONFIG`
    pub config_var: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// The user's home directory
    pub home: Option<PathBuf>,
}

impl ConfigEnv {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            config_var: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }

    /// Candidate config paths in search order.
    fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = &self.config_var {
            paths.push(path.clone());
        }
        if let Some(xdg) = &self.xdg_config_home {
            paths.push(xdg.join("ghexport/config.toml"));
        }
        if let Some(home) = &self.home {
            paths.push(home.join(".ghexport/config.toml"));
        }
        paths
    }
}

/// Configuration with defaults applied.
///
/// Accessors return the configured value or the built-in default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values read from the config file
    pub file: FileConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the explicit path or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated, or if `explicit` names a missing file. Missing default
    /// locations are not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(explicit, &ConfigEnv::from_process())
    }

    /// Configuration from already-parsed values, not tied to a file.
    pub fn from_file(file: FileConfig) -> Self {
        Self { file, path: None }
    }

    /// Load configuration using the given environment snapshot.
    pub fn load_with(
        explicit: Option<&Path>,
        env: &ConfigEnv,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::search(env, &mut warnings),
        };

        let file = match &path {
            Some(path) => Self::read_config(path)?,
            None => FileConfig::default(),
        };

        file.validate()?;

        Ok(ConfigLoadResult {
            config: Config { file, path },
            warnings,
        })
    }

    /// Find the first existing config file among the default locations.
    fn search(env: &ConfigEnv, warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        if let Some(path) = &env.config_var {
            if !path.exists() {
                warnings.push(ConfigWarning {
                    message: format!("${} points to a missing file, ignoring", CONFIG_ENV_VAR),
                    path: path.clone(),
                });
            }
        }

        env.candidates().into_iter().find(|p| p.is_file())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Repository owner. Defaults to "golang".
    pub fn owner(&self) -> &str {
        self.file.owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// Repository name. Defaults to "go".
    pub fn repo(&self) -> &str {
        self.file.repo.as_deref().unwrap_or(DEFAULT_REPO)
    }

    /// Output delimiter. Defaults to comma.
    pub fn delimiter(&self) -> Delimiter {
        self.file.delimiter.unwrap_or_default()
    }

    /// Page size. Defaults to the API maximum.
    pub fn per_page(&self) -> u8 {
        self.file.per_page.unwrap_or(MAX_PER_PAGE)
    }

    /// Whether to write a header row. Defaults to `false`.
    pub fn header(&self) -> bool {
        self.file.header.unwrap_or(false)
    }

    /// API base URL, without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.file
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
