//! Conversion of `AppError` into HTTP responses.
//!
//! Client errors carry their structured fields in `details`. Infrastructure
//! failures are logged with their source and answered with a fixed message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, None)
    }
}

/// Maps an `AppError` variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. }
        | AppError::UnknownField { .. }
        | AppError::TypeMismatch { .. }
        | AppError::InvalidSort { .. }
        | AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an `AppError` variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_IDENTITY",
        AppError::UnknownField { .. } => "UNKNOWN_FIELD",
        AppError::TypeMismatch { .. } => "TYPE_MISMATCH",
        AppError::InvalidSort { .. } => "INVALID_SORT",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            "INTERNAL_ERROR"
        }
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::new(code, format!("{} with {}={} not found", entity, field, value))
            .with_details(json!({ "entity": entity, "field": field, "value": value })),
        AppError::Duplicate {
            entity,
            field,
            value,
        } => ErrorResponse::new(
            code,
            format!("A {} with {} '{}' already exists", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field })),
        AppError::UnknownField { field } => {
            ErrorResponse::new(code, error.to_string()).with_details(json!({ "field": field }))
        }
        AppError::TypeMismatch {
            field,
            expected,
            found,
        } => ErrorResponse::new(code, error.to_string())
            .with_details(json!({ "field": field, "expected": expected, "found": found })),
        AppError::InvalidSort { sort } => {
            ErrorResponse::new(code, error.to_string()).with_details(json!({ "sort": sort }))
        }
        AppError::Validation { field, reason } => ErrorResponse::new(code, reason.as_str())
            .with_details(json!({ "field": field })),
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, error.to_string()).with_details(json!(errors))
        }
        AppError::BadRequest { message } | AppError::Unauthorized { message } => {
            ErrorResponse::new(code, message.as_str())
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Storage temporarily unavailable")
        }
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            ErrorResponse::new(code, "An internal error occurred")
        }
    }
}

/// Builds the error response, attaching `request_id` when known.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let status = error_to_status_code(&error);
    if status.is_server_error() {
        tracing::error!(error = ?error, request_id = ?request_id, "Request failed");
    }

    let mut body = error_body(&error);
    if let Some(id) = request_id {
        body = body.with_request_id(id);
    }
    (status, Json(body)).into_response()
}
