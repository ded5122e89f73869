use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned row id. Zero means "not assigned yet".
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn is_unset(&self) -> bool { self.0 == 0 }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(skip_serializing_if = "TodoId::is_unset")]
    pub id: TodoId,
    pub completed: bool,
    pub body: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

impl CreateTodo {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into(), completed: false }
    }
}

/// An explicit `null` leaves the field at its default, same as omitting it.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_treats_null_as_absent() {
        let input: CreateTodo = serde_json::from_str(r#"{"body": null, "completed": null}"#).unwrap();
        assert_eq!(input.body, "");
        assert!(!input.completed);

        let input: CreateTodo = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(input.body, "");
        assert!(input.completed);
    }

    #[test]
    fn create_payload_still_rejects_wrong_types() {
        assert!(serde_json::from_str::<CreateTodo>(r#"{"body": 5}"#).is_err());
        assert!(serde_json::from_str::<CreateTodo>(r#"{"body": "x", "completed": "yes"}"#).is_err());
    }

    #[test]
    fn unset_id_is_omitted_from_json() {
        let todo = Todo { id: TodoId::default(), completed: false, body: "x".into(), created_at: Utc::now() };
        assert_eq!(serde_json::to_value(&todo).unwrap(), serde_json::json!({ "completed": false, "body": "x" }));
    }
}
