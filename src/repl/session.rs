//! In-memory state of one REPL run.

use serde::Serialize;

/// Settings the command handlers read and change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Fields shown for each issue, possibly dotted.
    pub return_fields: Vec<String>,
    /// Fields appended as `ORDER BY` when a query has none.
    pub orderby_fields: Vec<String>,
    /// Only report the number of matches.
    pub count_only: bool,
    /// Show the response envelope unmodified.
    pub raw_json: bool,
    /// The last query run, without an appended ORDER BY.
    pub last_jql: String,
}

impl SessionState {
    /// Flip count-only mode, returning the new value.
    pub fn toggle_count_only(&mut self) -> bool {
        self.count_only = !self.count_only;
        self.count_only
    }

    /// Flip raw JSON mode, returning the new value.
    pub fn toggle_raw_json(&mut self) -> bool {
        self.raw_json = !self.raw_json;
        self.raw_json
    }

    /// Replace the return fields unless `fields` is empty.
    pub fn set_return_fields(&mut self, fields: Vec<String>) -> bool {
        replace_if_chosen(&mut self.return_fields, fields)
    }

    /// Replace the order-by fields unless `fields` is empty.
    pub fn set_orderby_fields(&mut self, fields: Vec<String>) -> bool {
        replace_if_chosen(&mut self.orderby_fields, fields)
    }
}

fn replace_if_chosen(target: &mut Vec<String>, fields: Vec<String>) -> bool {
    if fields.is_empty() {
        return false;
    }
    *target = fields;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggles() {
        let mut state = SessionState::default();
        assert!(state.toggle_count_only());
        assert!(!state.toggle_count_only());
        assert!(state.toggle_raw_json());
        assert!(state.raw_json);
    }

    #[test]
    fn test_empty_selection_keeps_previous_fields() {
        let mut state = SessionState {
            return_fields: vec!["summary".to_string()],
            ..SessionState::default()
        };
        assert!(!state.set_return_fields(Vec::new()));
        assert_eq!(state.return_fields, vec!["summary".to_string()]);

        assert!(state.set_orderby_fields(vec!["created DESC".to_string()]));
        assert_eq!(state.orderby_fields, vec!["created DESC".to_string()]);
    }

    #[test]
    fn test_serializes_for_info_display() {
        let state = SessionState {
            return_fields: vec!["status.name".to_string()],
            last_jql: "project = AB".to_string(),
            ..SessionState::default()
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "return_fields": ["status.name"],
                "orderby_fields": [],
                "count_only": false,
                "raw_json": false,
                "last_jql": "project = AB"
            })
        );
    }
}
