//! Form-library error shape built from server validation payloads.
//!
//! Validation failures come back as
//! `{"message": "...", "errors": {"children": {"field": {"errors": ["..."]}}}}`.
//! Forms want a flat `field -> message` map plus one whole-form entry stored
//! under [`FORM_ERROR`].

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::ApiError;

/// Reserved key holding the whole-form error.
pub const FORM_ERROR: &str = "FINAL_FORM/form-error";

/// Per-field errors plus the whole-form error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorShape {
    pub fields: BTreeMap<String, String>,
    pub form_error: Option<String>,
}

impl ErrorShape {
    pub fn form_only(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            form_error: Some(message.into()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The shape as a JSON object, whole-form key included.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (field, message) in &self.fields {
            map.insert(field.clone(), Value::String(message.clone()));
        }
        map.insert(
            FORM_ERROR.to_string(),
            self.form_error.clone().map(Value::String).unwrap_or(Value::Null),
        );
        Value::Object(map)
    }
}

impl Serialize for ErrorShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (field, message) in &self.fields {
            map.serialize_entry(field, message)?;
        }
        map.serialize_entry(FORM_ERROR, &self.form_error)?;
        map.end()
    }
}

/// Flatten a server error object into an `ErrorShape`.
///
/// Each child keeps only its first message; children with no messages are
/// dropped.
pub fn build_error(error: &Value) -> ErrorShape {
    let fields = error
        .pointer("/errors/children")
        .and_then(Value::as_object)
        .map(|children| {
            children
                .iter()
                .filter_map(|(field, child)| {
                    let first = child.get("errors")?.as_array()?.first()?;
                    let message = match first {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    Some((field.clone(), message))
                })
                .collect()
        })
        .unwrap_or_default();

    ErrorShape {
        fields,
        form_error: error.get("message").and_then(Value::as_str).map(str::to_string),
    }
}

impl From<&ApiError> for ErrorShape {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Http { body, .. } if body.is_object() => build_error(body),
            other => ErrorShape::form_only(other.message()),
        }
    }
}
