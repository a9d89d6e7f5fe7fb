//! # Error Response
//!
//! The uniform error body shared by the server handler and the client proxy:
//!
//! ```json
//! { "status": 400, "message": "validation failed", "fields": { "email": ["must not be empty"] } }
//! ```
//!
//! Field messages are collected through an [`ErrorResponseBuilder`], which only ever
//! appends. Once built, an [`ErrorResponse`] is a read-only value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status, top-level message and per-field validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    /// An error body without field information.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Start collecting field errors for a response with the given status.
    pub fn builder(status: u16) -> ErrorResponseBuilder {
        ErrorResponseBuilder {
            inner: Self {
                status,
                message: None,
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Every field path with all of its messages, in arrival order.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// All messages recorded for `path`, empty when the path is unknown.
    pub fn field_messages(&self, path: &str) -> &[String] {
        self.fields.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message recorded for `path`, if any.
    pub fn first_field_value(&self, path: &str) -> Option<&str> {
        self.fields
            .get(path)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Append-only collector used while validating a request.
#[derive(Debug, Clone)]
pub struct ErrorResponseBuilder {
    inner: ErrorResponse,
}

impl ErrorResponseBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.inner.message = Some(message.into());
        self
    }

    /// Add a message for `path`; repeated paths accumulate.
    pub fn add_field(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.push_field(path, message);
        self
    }

    /// Non-consuming variant of [`add_field`](Self::add_field) for loops.
    pub fn push_field(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.inner
            .fields
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    pub fn build(self) -> ErrorResponse {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_accumulate_in_arrival_order() {
        let response = ErrorResponse::builder(400)
            .message("validation failed")
            .add_field("email", "must not be empty")
            .add_field("name", "too long")
            .add_field("email", "not a valid email")
            .build();

        assert_eq!(
            response.field_messages("email"),
            ["must not be empty", "not a valid email"]
        );
        assert_eq!(response.first_field_value("email"), Some("must not be empty"));
        assert_eq!(response.first_field_value("name"), Some("too long"));
        assert!(response.has_field("name"));
        assert!(!response.has_field("url"));
        assert_eq!(response.first_field_value("url"), None);
        assert!(response.field_messages("url").is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let response = ErrorResponse::builder(400)
            .add_field("email", "required")
            .build();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "status": 400, "message": null, "fields": { "email": ["required"] } })
        );
    }

    #[test]
    fn test_deserialize_tolerates_missing_fields() {
        let response: ErrorResponse =
            serde_json::from_str(r#"{ "status": 500, "message": "boom" }"#).unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(response.message(), Some("boom"));
        assert!(!response.has_fields());
    }
}
