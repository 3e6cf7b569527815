//! JIRA API client implementation.
//!
//! Wraps a `reqwest` client bound to Basic Auth credentials and issues the
//! JQL search request against the REST API v2.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::ErrorEnvelope;
use crate::config::ServerConfig;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the JQL search endpoint.
const SEARCH_PATH: &str = "/rest/api/2/search";

/// Classified response of a search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// HTTP success with a JSON body.
    Success(Value),
    /// HTTP 400 carrying the server's error messages.
    Rejected(Vec<String>),
    /// Anything else, kept for the operator to inspect.
    Unexpected {
        /// The HTTP status code.
        status: u16,
        /// The response content type, if any.
        content_type: Option<String>,
        /// The raw response body.
        body: String,
    },
}

/// The JIRA API client.
///
/// One instance is built per REPL run and reused for every request.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl JiraClient {
    /// Build an authenticated session from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL, user or token is missing,
    /// and an API error if the URL is malformed or the HTTP client cannot be
    /// built.
    #[instrument(skip(server), fields(url = %server.url, user = %server.user))]
    pub fn connect(server: &ServerConfig) -> crate::error::Result<Self> {
        server.validate()?;
        let client = Self::with_credentials(&server.url, &server.user, &server.token)?;
        info!("JIRA session created");
        Ok(client)
    }

    /// Create a new JIRA client with explicit credentials.
    ///
    /// Does not check that the values are non-empty; use [`JiraClient::connect`]
    /// for that.
    pub fn with_credentials(base_url: &str, user: &str, token: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            client: Self::build_http_client()?,
            base_url,
            auth: Auth::new(user, token),
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Network)
    }

    /// Search for issues using JQL.
    ///
    /// # Arguments
    ///
    /// * `jql` - The JQL query string
    /// * `fields` - Top-level field ids to request; empty means server default
    ///
    /// # Errors
    ///
    /// Only network failures and undecodable success bodies are errors.
    /// Rejected queries and unexpected statuses are returned as
    /// [`SearchResponse`] variants.
    #[instrument(skip(self, fields), fields(jql = %jql))]
    pub async fn search(&self, jql: &str, fields: &[String]) -> Result<SearchResponse> {
        let url = search_url(&self.base_url, jql, fields);
        debug!(%url, "Searching issues");

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        classify_response(status, content_type, body)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API user this session authenticates as.
    pub fn user(&self) -> &str {
        self.auth.user()
    }
}

/// Build the search URL with the escaped JQL and optional field list.
pub fn search_url(base_url: &str, jql: &str, fields: &[String]) -> String {
    let mut url = format!(
        "{}{}?jql={}",
        base_url,
        SEARCH_PATH,
        urlencoding::encode(jql)
    );
    if !fields.is_empty() {
        url.push_str("&fields=");
        url.push_str(&fields.join(","));
    }
    url
}

/// Classify a search response by status and content type.
fn classify_response(
    status: StatusCode,
    content_type: Option<String>,
    body: String,
) -> Result<SearchResponse> {
    let is_json = content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("json"));

    if status.is_success() && is_json {
        let value = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
        return Ok(SearchResponse::Success(value));
    }

    if status == StatusCode::BAD_REQUEST {
        if let Ok(errors) = serde_json::from_str::<ErrorEnvelope>(&body) {
            let messages = errors.error_messages;
            debug!(count = messages.len(), "Query rejected by server");
            return Ok(SearchResponse::Rejected(messages));
        }
    }

    warn!(status = status.as_u16(), "Unexpected search response");
    Ok(SearchResponse::Unexpected {
        status: status.as_u16(),
        content_type,
        body,
    })
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_search_url_escapes_jql() {
        let url = search_url(
            "https://jira.example.com",
            "project = AB AND summary ~ \"a&b\"",
            &fields(&["status", "assignee"]),
        );
        assert_eq!(
            url,
            "https://jira.example.com/rest/api/2/search?jql=project%20%3D%20AB%20AND%20summary%20~%20%22a%26b%22&fields=status,assignee"
        );
    }

    #[test]
    fn test_search_url_without_fields() {
        let url = search_url("https://jira.example.com", "key = AB-1", &[]);
        assert!(!url.contains("fields="));
    }

    #[test]
    fn test_connect_requires_credentials() {
        let server = ServerConfig::new("https://jira.example.com", "", "token");
        let err = JiraClient::connect(&server).unwrap_err();
        assert!(err.is_critical());
        assert!(err.to_string().contains("JIRA_API_USER"));
    }

    #[test]
    fn test_with_credentials_rejects_bad_url() {
        let result = JiraClient::with_credentials("http://", "user", "token");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_classify_non_json_success_is_unexpected() {
        let response = classify_response(
            StatusCode::OK,
            Some("text/html".to_string()),
            "<html>login</html>".to_string(),
        )
        .unwrap();
        assert!(matches!(
            response,
            SearchResponse::Unexpected { status: 200, .. }
        ));
    }

    #[test]
    fn test_classify_malformed_json_is_error() {
        let result = classify_response(
            StatusCode::OK,
            Some("application/json;charset=UTF-8".to_string()),
            "{not json".to_string(),
        );
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_search_success() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "test_user", "test_token")?;

        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", "project = AB"))
            .and(query_param("fields", "status,summary"))
            .and(basic_auth("test_user", "test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": 0,
                "maxResults": 50,
                "total": 1,
                "issues": [{"key": "AB-1", "fields": {"summary": "First"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client
            .search("project = AB", &fields(&["status", "summary"]))
            .await?;

        match response {
            SearchResponse::Success(value) => assert_eq!(value["total"], json!(1)),
            other => panic!("Expected success, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_search_bad_request_is_rejected() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "test_user", "test_token")?;

        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorMessages": ["Field 'foo' does not exist"],
                "errors": {"jql": "bad clause"}
            })))
            .mount(&mock_server)
            .await;

        let response = client.search("foo = 1", &[]).await?;
        assert_eq!(
            response,
            SearchResponse::Rejected(vec!["Field 'foo' does not exist".to_string()])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_unauthorized_is_unexpected() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "test_user", "bad")?;

        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&mock_server)
            .await;

        let response = client.search("project = AB", &[]).await?;
        match response {
            SearchResponse::Unexpected { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("Expected unexpected response, got {:?}", other),
        }
        Ok(())
    }
}
