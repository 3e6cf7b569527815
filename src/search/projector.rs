//! Flattening of raw search results into issue records.

use serde_json::{Map, Value};

use crate::api::{IssueRecord, SearchEnvelope};

/// Project each issue of `envelope` onto `fields`.
///
/// Simple fields are copied from `issue.fields`. Dotted fields such as
/// `status.name` are resolved by walking nested objects. Anything that
/// cannot be found resolves to `null`. Record keys are `key`, then simple
/// fields, then dotted fields, each in input order.
pub fn project(envelope: &SearchEnvelope, fields: &[String]) -> Vec<IssueRecord> {
    let (nested, simple): (Vec<&String>, Vec<&String>) =
        fields.iter().partition(|f| f.contains('.'));

    envelope
        .issues
        .iter()
        .map(|issue| {
            let mut record = Map::new();
            record.insert("key".to_string(), Value::String(issue.key.clone()));

            for field in &simple {
                let value = issue.fields.get(field.as_str()).cloned().unwrap_or(Value::Null);
                record.insert(field.to_string(), value);
            }

            for field in &nested {
                record.insert(field.to_string(), resolve_path(&issue.fields, field));
            }

            record
        })
        .collect()
}

/// Resolve a dotted path against an issue's fields.
fn resolve_path(fields: &Map<String, Value>, path: &str) -> Value {
    let mut segments = path.split('.');
    let Some(head) = segments.next() else {
        return Value::Null;
    };

    let mut current = match fields.get(head) {
        None | Some(Value::Null) => return Value::Null,
        Some(value) => value,
    };

    for segment in segments {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }

    match current {
        Value::Object(map) if map.is_empty() => Value::Null,
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> SearchEnvelope {
        serde_json::from_value(value).unwrap()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nested_fields_with_null_parent() {
        let envelope = envelope(json!({
            "issues": [{
                "key": "AB-1",
                "fields": {"status": {"name": "Open"}, "assignee": null}
            }]
        }));

        let records = project(&envelope, &fields(&["status.name", "assignee.displayName"]));

        assert_eq!(
            Value::Object(records[0].clone()),
            json!({"key": "AB-1", "status.name": "Open", "assignee.displayName": null})
        );
    }

    #[test]
    fn test_simple_fields_copied_exactly() {
        let envelope = envelope(json!({
            "issues": [{
                "key": "AB-2",
                "fields": {
                    "summary": "Fix login",
                    "labels": ["auth", "web"],
                    "priority": {"name": "High"}
                }
            }]
        }));

        let records = project(&envelope, &fields(&["summary", "labels", "priority", "duedate"]));
        let record = &records[0];

        assert_eq!(record["summary"], json!("Fix login"));
        assert_eq!(record["labels"], json!(["auth", "web"]));
        assert_eq!(record["priority"], json!({"name": "High"}));
        assert_eq!(record["duedate"], Value::Null);
    }

    #[test]
    fn test_key_order_is_key_simple_then_nested() {
        let envelope = envelope(json!({
            "issues": [{"key": "AB-3", "fields": {}}]
        }));

        let records = project(
            &envelope,
            &fields(&["status.name", "summary", "assignee.displayName", "created"]),
        );
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec!["key", "summary", "created", "status.name", "assignee.displayName"]
        );
    }

    #[test]
    fn test_missing_nested_segments_resolve_to_null() {
        let envelope = envelope(json!({
            "issues": [{
                "key": "AB-4",
                "fields": {
                    "status": {"name": "Done", "statusCategory": {"key": "done"}},
                    "summary": "plain text"
                }
            }]
        }));

        let records = project(
            &envelope,
            &fields(&[
                "status.statusCategory.key",
                "status.missing",
                "status.statusCategory.missing.deeper",
                "summary.length",
                "reporter.displayName",
            ]),
        );
        let record = &records[0];

        assert_eq!(record["status.statusCategory.key"], json!("done"));
        assert_eq!(record["status.missing"], Value::Null);
        assert_eq!(record["status.statusCategory.missing.deeper"], Value::Null);
        assert_eq!(record["summary.length"], Value::Null);
        assert_eq!(record["reporter.displayName"], Value::Null);
    }

    #[test]
    fn test_empty_object_normalized_to_null() {
        let envelope = envelope(json!({
            "issues": [{"key": "AB-5", "fields": {"status": {"meta": {}}}}]
        }));

        let records = project(&envelope, &fields(&["status.meta"]));
        assert_eq!(records[0]["status.meta"], Value::Null);
    }

    #[test]
    fn test_record_order_matches_issue_order() {
        let envelope = envelope(json!({
            "issues": [
                {"key": "AB-9", "fields": {}},
                {"key": "AB-1", "fields": {}},
                {"key": "AB-5", "fields": {}}
            ]
        }));

        let keys: Vec<Value> = project(&envelope, &[])
            .into_iter()
            .map(|r| r["key"].clone())
            .collect();
        assert_eq!(keys, vec![json!("AB-9"), json!("AB-1"), json!("AB-5")]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let envelope = envelope(json!({
            "issues": [{
                "key": "AB-6",
                "fields": {"status": {"name": "Open"}, "summary": "Twice"}
            }]
        }));
        let requested = fields(&["summary", "status.name"]);

        assert_eq!(project(&envelope, &requested), project(&envelope, &requested));
    }
}
