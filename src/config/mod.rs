//! Configuration management for jira-helper.
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! environment variables. A missing API token is finally looked up in the
//! OS keyring.

mod server;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use server::{ServerConfig, API_TOKEN_HELP_URL};
pub use settings::{parse_list, FieldSettings};

/// Application directory name used under the platform config/data dirs.
pub const APP_DIR: &str = "jira-helper";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The config file exists but could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Required connection settings are missing.
    #[error(
        "missing JIRA settings: {0}. Define JIRA_URL, JIRA_API_USER and JIRA_API_TOKEN. \
         Visit {url} to create an API token if you have not already done so.",
        url = API_TOKEN_HELP_URL
    )]
    MissingCredentials(String),

    /// A setting has an invalid value.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// JIRA connection details.
    #[serde(default)]
    pub server: ServerConfig,
    /// Menu choices for fields and query building.
    #[serde(default)]
    pub fields: FieldSettings,
}

impl Config {
    /// Load configuration from the default file, the environment and the keyring.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());

        if config.server.token.is_empty() && !config.server.user.is_empty() {
            match crate::api::auth::get_token(&config.server.user) {
                Ok(token) => {
                    debug!("Using API token from OS keyring");
                    config.server.token = token;
                }
                Err(e) => debug!("No API token in keyring: {}", e),
            }
        }

        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if !config.server.token.is_empty() {
            warn!("API token found in config file; prefer JIRA_API_TOKEN or the OS keyring");
        }
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Override settings from environment-style lookups.
    ///
    /// List settings are comma-separated. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("JIRA_URL") {
            self.server.url = url;
        }
        if let Some(user) = get("JIRA_API_USER") {
            self.server.user = user;
        }
        if let Some(token) = get("JIRA_API_TOKEN") {
            self.server.token = token;
        }

        let lists: [(&str, &mut Vec<String>); 5] = [
            ("JIRA_PROJECTS", &mut self.fields.projects),
            ("JIRA_ISSUE_TYPES", &mut self.fields.issue_types),
            ("JIRA_STATUS_TYPES", &mut self.fields.status_types),
            ("JIRA_RETURN_FIELDS", &mut self.fields.return_fields),
            ("JIRA_ORDER_BY_FIELDS", &mut self.fields.orderby_fields),
        ];
        for (key, target) in lists {
            if let Some(value) = get(key) {
                *target = parse_list(&value);
            }
        }
    }

    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }
}
