//! Authentication handling for the JIRA API.
//!
//! JIRA Cloud uses Basic Auth with the API user and an API token. The token
//! can be kept in the OS keyring instead of the environment.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::error::{ApiError, Result};

/// The keyring service name for jira-helper tokens.
const KEYRING_SERVICE: &str = "jira-helper";

/// Authentication credentials for JIRA.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The API user.
    user: String,
    /// The Base64-encoded authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from user and token.
    ///
    /// The token is immediately encoded and the raw token is not stored.
    pub fn new(user: &str, token: &str) -> Self {
        Self {
            user: user.to_string(),
            auth_header: build_auth_header(user, token),
        }
    }

    /// Get the complete "Basic ..." header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the API user.
    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Encode "user:token" in Base64 and prepend "Basic ".
fn build_auth_header(user: &str, token: &str) -> String {
    let credentials = format!("{}:{}", user, token);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

/// Retrieve the API token stored in the OS keyring for `user`.
///
/// # Errors
///
/// Returns `ApiError::Keyring` if the keyring is unavailable or has no entry.
pub fn get_token(user: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, user)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("test_user", "test_token");
        // test_user:test_token
        assert_eq!(header, "Basic dGVzdF91c2VyOnRlc3RfdG9rZW4=");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("user@example.com", "secret_token");
        assert_eq!(auth.user(), "user@example.com");

        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "user@example.com:secret_token");
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::new("user@example.com", "secret_token");
        let debug_output = format!("{:?}", auth);
        assert!(!debug_output.contains("secret_token"));
    }
}
