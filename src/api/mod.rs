//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST API.

pub(crate) mod auth;
mod client;
pub mod error;
pub mod types;

pub use auth::Auth;
pub use client::{search_url, JiraClient, SearchResponse};
pub use error::ApiError;
pub use types::{IssueRecord, PageInfo, RawIssue, SearchEnvelope};
