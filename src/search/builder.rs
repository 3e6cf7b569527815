//! Composing JQL from menu picks.

/// Values picked for each JQL clause; empty lists are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCriteria {
    pub projects: Vec<String>,
    pub issue_types: Vec<String>,
    pub statuses: Vec<String>,
}

impl QueryCriteria {
    /// Render the picks as `field in (...)` clauses joined with AND.
    ///
    /// Returns `None` if nothing was picked.
    pub fn to_jql(&self) -> Option<String> {
        let clauses: Vec<String> = [
            ("project", &self.projects),
            ("issuetype", &self.issue_types),
            ("status", &self.statuses),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| in_clause(field, values))
        .collect();

        (!clauses.is_empty()).then(|| clauses.join(" AND "))
    }
}

/// `field in ("a", "b")`.
fn in_clause(field: &str, values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("{} in ({})", field, quoted.join(", "))
}

/// Double-quote a JQL value, escaping backslashes and quotes.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Whether the query already has an ORDER BY clause (case-insensitive).
fn has_order_by(jql: &str) -> bool {
    jql.to_lowercase().contains("order by")
}

/// Append `ORDER BY` with `orderby_fields` unless the query already has one.
pub fn with_order_by(jql: &str, orderby_fields: &[String]) -> String {
    if orderby_fields.is_empty() || has_order_by(jql) {
        return jql.to_string();
    }
    format!("{} ORDER BY {}", jql, orderby_fields.join(", "))
}
