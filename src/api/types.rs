//! JIRA API response types.
//!
//! Issue fields are kept as raw JSON because the set of returned fields is
//! chosen at runtime and may include custom fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One issue as filtered for display.
///
/// Keys are `key` followed by the requested field names or dotted paths, in
/// request order.
pub type IssueRecord = Map<String, Value>;

/// Search result envelope from a JQL query.
///
/// Returned by `GET /rest/api/2/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u64,
    /// Maximum results returned per page.
    #[serde(default)]
    pub max_results: u64,
    /// Total number of matching issues.
    #[serde(default)]
    pub total: u64,
    /// The issues in this page.
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

impl SearchEnvelope {
    /// Pagination metadata of this envelope.
    pub fn page(&self) -> PageInfo {
        PageInfo {
            start_at: self.start_at,
            max_results: self.max_results,
            total: self.total,
        }
    }
}

/// A JIRA issue as returned by search, with untyped fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawIssue {
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// The returned fields keyed by field id.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Pagination metadata of a search page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
}

/// Error body returned with HTTP 400.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Human-readable error messages. Field-specific `errors` are ignored.
    #[serde(default)]
    pub error_messages: Vec<String>,
}
