//! Field validation of edit DTOs, reported as an [`ErrorResponse`].

use crate::error::CrudError;
use crate::error_response::ErrorResponse;
use axum::http::StatusCode;
use garde::Validate;

pub const VALIDATION_FAILED: &str = "Validation failed";

/// Run the `garde` rules of `value`.
pub fn validate<T>(value: &T) -> Result<(), CrudError>
where
    T: Validate<Context = ()>,
{
    value
        .validate()
        .map_err(|report| CrudError::Validation(error_response_from_report(&report)))
}

/// One field entry per failed rule, keyed by the field path.
pub fn error_response_from_report(report: &garde::Report) -> ErrorResponse {
    let mut builder =
        ErrorResponse::builder(StatusCode::BAD_REQUEST.as_u16()).message(VALIDATION_FAILED);

    for (path, error) in report.iter() {
        let field = path.to_string();
        let field = if field.is_empty() {
            "value".to_string()
        } else {
            field
        };
        builder.push_field(field, error.message());
    }

    builder.build()
}
