//! Resolution of PATCH payloads into column assignments.
//!
//! A request body that cannot be read as a JSON object (or `null`) asks for the
//! `completed` flag to be toggled. An object is inspected for `body` and
//! `completed` only, each honored when it has the expected type.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRequest {
    Toggle,
    Fields(UpdatePayload),
}

impl UpdateRequest {
    pub fn from_body(content_type: Option<&str>, bytes: &[u8]) -> Self {
        if !content_type.is_some_and(is_json) {
            return Self::Toggle;
        }
        // `null` reads as an empty object, not as an unreadable body
        match serde_json::from_slice::<Option<Map<String, Value>>>(bytes) {
            Ok(fields) => Self::Fields(fields.map(UpdatePayload::from).unwrap_or_default()),
            Err(_) => Self::Toggle,
        }
    }
}

/// Updatable fields that were present with the right JSON type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePayload {
    pub body: Option<String>,
    pub completed: Option<bool>,
}

impl UpdatePayload {
    /// Column writes in statement order: `body` first, then `completed`.
    /// An empty `body` contributes nothing.
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::with_capacity(2);
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            out.push(Assignment::Body(body.to_string()));
        }
        if let Some(completed) = self.completed {
            out.push(Assignment::Completed(completed));
        }
        out
    }
}

impl From<Map<String, Value>> for UpdatePayload {
    fn from(mut fields: Map<String, Value>) -> Self {
        let body = match fields.remove("body") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let completed = fields.get("completed").and_then(Value::as_bool);
        Self { body, completed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Body(String),
    Completed(bool),
}

impl Assignment {
    pub fn column(&self) -> &'static str {
        match self {
            Assignment::Body(_) => "body",
            Assignment::Completed(_) => "completed",
        }
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.to_ascii_lowercase().ends_with("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    fn fields(raw: &str) -> UpdatePayload {
        match UpdateRequest::from_body(JSON, raw.as_bytes()) {
            UpdateRequest::Fields(p) => p,
            UpdateRequest::Toggle => panic!("expected fields for {raw}"),
        }
    }

    #[test]
    fn missing_or_unreadable_body_toggles() {
        assert_eq!(UpdateRequest::from_body(None, b""), UpdateRequest::Toggle);
        assert_eq!(UpdateRequest::from_body(JSON, b""), UpdateRequest::Toggle);
        assert_eq!(UpdateRequest::from_body(JSON, b"{not json"), UpdateRequest::Toggle);
        assert_eq!(UpdateRequest::from_body(JSON, b"[1, 2]"), UpdateRequest::Toggle);
        // a valid object sent without a JSON content type is never read
        assert_eq!(UpdateRequest::from_body(Some("text/plain"), br#"{"completed":true}"#), UpdateRequest::Toggle);
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let req = UpdateRequest::from_body(Some("Application/JSON; charset=utf-8"), br#"{"completed":false}"#);
        assert_eq!(req, UpdateRequest::Fields(UpdatePayload { body: None, completed: Some(false) }));
    }

    #[test]
    fn empty_object_is_fields_not_toggle() {
        let p = fields("{}");
        assert_eq!(p, UpdatePayload::default());
        assert!(p.assignments().is_empty());
    }

    #[test]
    fn null_is_an_empty_object() {
        let p = fields("null");
        assert_eq!(p, UpdatePayload::default());
        assert!(p.assignments().is_empty());
    }

    #[test]
    fn wrong_types_and_unknown_keys_are_dropped() {
        let p = fields(r#"{"body": 42, "completed": "yes", "id": 9, "title": "x"}"#);
        assert_eq!(p, UpdatePayload::default());
    }

    #[test]
    fn empty_body_contributes_nothing() {
        let p = fields(r#"{"body": ""}"#);
        assert_eq!(p.body.as_deref(), Some(""));
        assert!(p.assignments().is_empty());

        let p = fields(r#"{"body": "", "completed": true}"#);
        assert_eq!(p.assignments(), vec![Assignment::Completed(true)]);
    }

    #[test]
    fn assignments_are_body_then_completed() {
        let p = fields(r#"{"completed": false, "body": "x"}"#);
        let a = p.assignments();
        assert_eq!(a, vec![Assignment::Body("x".into()), Assignment::Completed(false)]);
        assert_eq!(a.iter().map(Assignment::column).collect::<Vec<_>>(), ["body", "completed"]);
    }
}
