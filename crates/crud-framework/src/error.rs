//! # Framework Errors
//!
//! One error taxonomy for both halves of the CRUD contract. The server handler returns
//! these from its operations and renders them as [`ErrorResponse`] bodies; the client
//! proxy produces them when translating non-2xx responses.

use crate::error_response::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Failures reported by a storage capability.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The query cannot be answered as asked (e.g. an unknown sort field).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The backend could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors produced by the resource handler and the resource proxy.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    /// The id (or the parent id) does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request parameters or body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failed; the response carries every field message.
    #[error("Validation failed: {} field(s)", .0.fields().len())]
    Validation(ErrorResponse),

    /// A 5xx answer, an unexpected status or a transport failure (`status` is `None`).
    #[error(
        "Upstream failure ({}): {body}",
        .status.map_or_else(|| "transport".to_string(), |s| s.to_string())
    )]
    Upstream {
        status: Option<u16>,
        body: String,
    },

    /// A body from a presumed-conformant peer did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CrudError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        CrudError::NotFound(what.to_string())
    }

    /// The status code the server answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudError::NotFound(_) => StatusCode::NOT_FOUND,
            CrudError::BadRequest(_) | CrudError::Validation(_) => StatusCode::BAD_REQUEST,
            CrudError::Storage(StorageError::InvalidQuery(_)) => StatusCode::BAD_REQUEST,
            CrudError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            CrudError::Decode(_) | CrudError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The validation body, when this is a [`CrudError::Validation`].
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            CrudError::Validation(response) => Some(response),
            _ => None,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            CrudError::Validation(response) => response,
            other => ErrorResponse::new(status.as_u16(), other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for CrudError {
    fn from(err: serde_json::Error) -> Self {
        CrudError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(CrudError::not_found("company 1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CrudError::BadRequest("page".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrudError::Storage(StorageError::InvalidQuery("sort".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrudError::Storage(StorageError::Unavailable("closed".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_display() {
        let err = CrudError::Upstream {
            status: Some(503),
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "Upstream failure (503): down");

        let err = CrudError::Upstream {
            status: None,
            body: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "Upstream failure (transport): connection refused");
    }
}
