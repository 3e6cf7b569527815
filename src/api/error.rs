//! API error types for the JIRA client.
//!
//! Only transport and decoding failures are errors. A rejected query (HTTP
//! 400) or any other non-success status is a normal search outcome, see
//! [`SearchResponse`](super::SearchResponse).

use thiserror::Error;

/// Errors that can occur when talking to the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response could not be decoded into the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
