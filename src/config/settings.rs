//! Allowed values offered by the interactive menus.

use serde::{Deserialize, Serialize};

/// Menu choices for query building and field selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldSettings {
    /// Project keys offered by the query builder.
    pub projects: Vec<String>,
    /// Issue type names offered by the query builder.
    pub issue_types: Vec<String>,
    /// Status names offered by the query builder.
    pub status_types: Vec<String>,
    /// Fields (optionally dotted, e.g. "status.name") that may be returned.
    pub return_fields: Vec<String>,
    /// Fields that may appear in an ORDER BY clause.
    pub orderby_fields: Vec<String>,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            issue_types: Vec::new(),
            status_types: Vec::new(),
            return_fields: [
                "summary",
                "status.name",
                "assignee.displayName",
                "reporter.displayName",
                "creator.displayName",
                "priority.name",
                "issuetype.name",
                "project.key",
                "labels",
                "created",
                "updated",
                "duedate",
                "description",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            orderby_fields: [
                "created",
                "created DESC",
                "updated",
                "updated DESC",
                "priority",
                "priority DESC",
                "status",
                "assignee",
                "key",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Split a comma-separated setting into trimmed, non-empty items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
