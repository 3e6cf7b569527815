//! Centralized error types for jira-helper.
//!
//! This module aggregates the per-layer errors into one type with
//! user-friendly messages. Query rejections and unexpected HTTP statuses are
//! not errors; they are reported as search outcomes.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::{ConfigError, API_TOKEN_HELP_URL};
use crate::prompt::PromptError;
use crate::store::StoreError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Persistence errors.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Interactive prompt errors.
    #[error("{0}")]
    Prompt(#[from] PromptError),

    /// IO errors (terminal, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::MissingCredentials(missing) => {
                    format!("Please define {} before searching.", missing)
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::Network(_) => {
                    "Connection failed. Please check your network and JIRA URL.".to_string()
                }
                ApiError::InvalidResponse(msg) => {
                    format!("Unexpected response from JIRA: {}", msg)
                }
                ApiError::InvalidUrl(url) => format!("Invalid JIRA URL: {}", url),
                ApiError::Keyring(_) => "Could not access the OS keyring.".to_string(),
            },
            AppError::Store(e) => match e {
                StoreError::Corrupt { path, .. } => format!(
                    "Saved data in {} is corrupt. Fix or remove the file.",
                    path.display()
                ),
                other => format!("Could not access saved data: {}", other),
            },
            AppError::Prompt(_) => "Could not read your answer from the terminal.".to_string(),
            AppError::Io(e) => format!("Terminal error: {}", e),
        }
    }

    /// Check if this error prevents the REPL from starting or continuing.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Api(ApiError::InvalidUrl(_))
                | AppError::Store(StoreError::NoDataDir)
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::MissingCredentials(_)) => Some(
                "Set JIRA_URL, JIRA_API_USER and JIRA_API_TOKEN, or add them to the config file.",
            ),
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Check config.toml in the jira-helper configuration directory.")
            }
            AppError::Api(ApiError::Network(_)) => {
                Some("Check your internet connection and JIRA URL.")
            }
            _ => None,
        }
    }

    /// Where to get an API token, shown with credential errors.
    pub fn help_url(&self) -> Option<&'static str> {
        matches!(self, AppError::Config(ConfigError::MissingCredentials(_)))
            .then_some(API_TOKEN_HELP_URL)
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
