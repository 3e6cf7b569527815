//! Running a JQL search and shaping its result.

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::projector::project;
use crate::api::error::{ApiError, Result};
use crate::api::{IssueRecord, JiraClient, PageInfo, SearchEnvelope, SearchResponse};

/// The single lightweight field requested for count-only searches.
const COUNT_FIELD: &str = "created";

/// What to ask the server for and how to shape the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// The JQL query text.
    pub jql: String,
    /// Requested fields, possibly dotted (e.g. "status.name").
    pub fields: Vec<String>,
    /// Return only the total number of matches.
    pub count_only: bool,
    /// Return the envelope unmodified.
    pub raw: bool,
}

/// A successful search result.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutput {
    /// Number of matching issues.
    Count(u64),
    /// The parsed envelope, unmodified.
    Raw { page: PageInfo, envelope: Value },
    /// Issues projected onto the requested fields.
    Records {
        page: PageInfo,
        records: Vec<IssueRecord>,
    },
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The server answered and the result was shaped as requested.
    Completed(SearchOutput),
    /// The server rejected the query (HTTP 400).
    Rejected(Vec<String>),
    /// The server answered with something else; needs operator inspection.
    Unexpected {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
}

/// Top-level field ids to request for possibly dotted `fields`.
///
/// Each field is cut at its first dot; duplicates are dropped keeping the
/// first occurrence.
pub fn top_level_fields(fields: &[String]) -> Vec<String> {
    let mut top: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        let head = field.split('.').next().unwrap_or(field).trim();
        if !head.is_empty() && !top.iter().any(|f| f == head) {
            top.push(head.to_string());
        }
    }
    top
}

/// Execute a search request.
///
/// # Errors
///
/// Network failures and malformed success bodies are errors. A rejected
/// query or unexpected status is reported through [`SearchOutcome`].
#[instrument(
    skip(client, request),
    fields(jql = %request.jql, count_only = request.count_only, raw = request.raw)
)]
pub async fn search(client: &JiraClient, request: &SearchRequest) -> Result<SearchOutcome> {
    let requested: Vec<String> = if request.count_only {
        vec![COUNT_FIELD.to_string()]
    } else {
        request.fields.clone()
    };
    let top = top_level_fields(&requested);
    debug!(fields = ?top, "Requesting fields");

    let body = match client.search(&request.jql, &top).await? {
        SearchResponse::Success(body) => body,
        SearchResponse::Rejected(messages) => return Ok(SearchOutcome::Rejected(messages)),
        SearchResponse::Unexpected {
            status,
            content_type,
            body,
        } => {
            return Ok(SearchOutcome::Unexpected {
                status,
                content_type,
                body,
            })
        }
    };

    let output = shape(body, request.count_only, request.raw, &requested)?;
    if let SearchOutput::Records { page, records } = &output {
        info!(total = page.total, returned = records.len(), "Search completed");
    }
    Ok(SearchOutcome::Completed(output))
}

/// Shape a successful response body according to the request flags.
fn shape(body: Value, count_only: bool, raw: bool, fields: &[String]) -> Result<SearchOutput> {
    if count_only {
        let total = body
            .get("total")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::InvalidResponse("missing integer `total`".to_string()))?;
        return Ok(SearchOutput::Count(total));
    }

    let envelope: SearchEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected search envelope: {}", e)))?;
    let page = envelope.page();

    if raw {
        return Ok(SearchOutput::Raw {
            page,
            envelope: body,
        });
    }

    Ok(SearchOutput::Records {
        page,
        records: project(&envelope, fields),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_body() -> Value {
        json!({
            "startAt": 0,
            "maxResults": 50,
            "total": 2,
            "issues": [
                {"key": "AB-1", "fields": {"status": {"name": "Open"}, "assignee": null}},
                {"key": "AB-2", "fields": {"status": {"name": "Done"}, "assignee": {"displayName": "Ann"}}}
            ]
        })
    }

    async fn server_with(body: Value, expected_fields: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("fields", expected_fields))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[test]
    fn test_top_level_fields_dedup_in_order() {
        assert_eq!(
            top_level_fields(&fields(&[
                "status.name",
                "summary",
                "status.statusCategory.key",
                "assignee.displayName",
                "summary"
            ])),
            fields(&["status", "summary", "assignee"])
        );
        assert!(top_level_fields(&[]).is_empty());
    }

    #[test]
    fn test_count_only_does_not_project() {
        let output = shape(sample_body(), true, false, &fields(&["status.name"])).unwrap();
        assert_eq!(output, SearchOutput::Count(2));
    }

    #[test]
    fn test_count_only_requires_total() {
        let result = shape(json!({"issues": []}), true, false, &[]);
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_raw_returns_body_unmodified() {
        let body = sample_body();
        let output = shape(body.clone(), false, true, &fields(&["status.name"])).unwrap();
        match output {
            SearchOutput::Raw { page, envelope } => {
                assert_eq!(page.total, 2);
                assert_eq!(envelope, body);
            }
            other => panic!("Expected raw output, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_envelope_is_error() {
        let result = shape(json!({"issues": "nope"}), false, false, &[]);
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_search_projects_records() -> anyhow::Result<()> {
        let mock_server = server_with(sample_body(), "status,assignee").await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "user", "token")?;
        let request = SearchRequest {
            jql: "project = AB".to_string(),
            fields: fields(&["status.name", "assignee.displayName"]),
            ..SearchRequest::default()
        };

        let outcome = search(&client, &request).await?;

        let (page, records) = match outcome {
            SearchOutcome::Completed(SearchOutput::Records { page, records }) => (page, records),
            other => panic!("Expected records, got {:?}", other),
        };
        assert_eq!(page.total, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["assignee.displayName"], Value::Null);
        assert_eq!(records[1]["assignee.displayName"], json!("Ann"));
        assert_eq!(records[1]["status.name"], json!("Done"));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_count_only_requests_single_field() -> anyhow::Result<()> {
        let mock_server = server_with(sample_body(), "created").await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "user", "token")?;
        let request = SearchRequest {
            jql: "project = AB".to_string(),
            fields: fields(&["status.name", "summary"]),
            count_only: true,
            raw: true,
        };

        let outcome = search(&client, &request).await?;
        assert_eq!(outcome, SearchOutcome::Completed(SearchOutput::Count(2)));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_rejected_query() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorMessages": ["Field 'foo' does not exist"],
                "errors": {}
            })))
            .mount(&mock_server)
            .await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "user", "token")?;
        let request = SearchRequest {
            jql: "foo = bar".to_string(),
            ..SearchRequest::default()
        };

        let outcome = search(&client, &request).await?;
        assert_eq!(
            outcome,
            SearchOutcome::Rejected(vec!["Field 'foo' does not exist".to_string()])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_server_error_is_unexpected() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;
        let client = JiraClient::with_credentials(&mock_server.uri(), "user", "token")?;

        let outcome = search(&client, &SearchRequest::default()).await?;
        assert!(matches!(
            outcome,
            SearchOutcome::Unexpected { status: 503, .. }
        ));
        Ok(())
    }
}
