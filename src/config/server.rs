//! JIRA server connection configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Where API tokens for JIRA Cloud are created.
pub const API_TOKEN_HELP_URL: &str =
    "https://id.atlassian.com/manage-profile/security/api-tokens";

/// Connection details for a JIRA server.
///
/// All three values are required before a search session can be built.
/// The token is usually supplied through the environment or the OS keyring
/// rather than the config file.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// The JIRA server base URL (e.g., "https://company.atlassian.net").
    #[serde(default)]
    pub url: String,

    /// The API user, usually an email address.
    #[serde(default)]
    pub user: String,

    /// The API token paired with `user`.
    #[serde(default, skip_serializing)]
    pub token: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new(url: impl Into<String>, user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            token: token.into(),
        }
    }

    /// Names of the environment settings that are still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.trim().is_empty() {
            missing.push("JIRA_URL");
        }
        if self.user.trim().is_empty() {
            missing.push("JIRA_API_USER");
        }
        if self.token.trim().is_empty() {
            missing.push("JIRA_API_TOKEN");
        }
        missing
    }

    /// Validate the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if any value is empty, or a
    /// `ConfigError::ValidationError` if the URL has no HTTP scheme.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing.join(", ")));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "server URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServerConfig {
        ServerConfig::new(
            "https://company.atlassian.net",
            "user@company.com",
            "secret_token",
        )
    }

    #[test]
    fn test_valid_server_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_http_url_accepted() {
        let mut server = valid();
        server.url = "http://localhost:8080".to_string();
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_missing_values_are_all_reported() {
        let server = ServerConfig::default();
        let err = server.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JIRA_URL"));
        assert!(msg.contains("JIRA_API_USER"));
        assert!(msg.contains("JIRA_API_TOKEN"));
        assert!(msg.contains(API_TOKEN_HELP_URL));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let mut server = valid();
        server.token = "   ".to_string();
        assert_eq!(server.missing(), vec!["JIRA_API_TOKEN"]);
        assert!(matches!(
            server.validate(),
            Err(ConfigError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        let mut server = valid();
        server.url = "company.atlassian.net".to_string();
        let err = server.validate().unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let debug_output = format!("{:?}", valid());
        assert!(!debug_output.contains("secret_token"));
        assert!(debug_output.contains("<redacted>"));
    }

    #[test]
    fn test_token_not_serialized() {
        let toml_str = toml::to_string(&valid()).unwrap();
        assert!(!toml_str.contains("secret_token"));
        let parsed: ServerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.url, "https://company.atlassian.net");
        assert!(parsed.token.is_empty());
    }
}
