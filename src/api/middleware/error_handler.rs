//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure leaves the API as an `ErrorResponse` JSON body. Handler
//! errors go through `IntoResponse for AppError`; plain-text errors produced
//! by axum itself (unknown route, wrong method) are rewritten by
//! `global_error_handler`.

use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::request_id::REQUEST_ID_HEADER;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Status code and public body for an error.
///
/// Internal failures are logged here and reported without their cause.
fn render(error: &AppError) -> (StatusCode, ErrorResponse) {
    match error {
        AppError::NotFound { entity, field, value } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found_error(entity, field, value),
        ),
        AppError::Duplicate { entity, field, value } => (
            StatusCode::CONFLICT,
            ErrorResponse::duplicate_error(entity, field, value),
        ),
        AppError::Conflict { message } => {
            (StatusCode::CONFLICT, ErrorResponse::new("CONFLICT", message))
        }
        AppError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_error(field, reason),
        ),
        AppError::ValidationErrors { errors } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::validation_errors(errors),
        ),
        AppError::BadRequest { message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_REQUEST", message),
        ),
        AppError::UnprocessableContent { message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse::new("UNPROCESSABLE_CONTENT", message),
        ),
        AppError::Unauthorized { message } => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new("UNAUTHORIZED", message),
        ),
        AppError::Forbidden { message } => {
            (StatusCode::FORBIDDEN, ErrorResponse::new("FORBIDDEN", message))
        }
        AppError::Database { operation, source } => {
            tracing::error!(operation = %operation, error = ?source, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("DATABASE_ERROR", "Database operation failed")
                    .with_details(json!({ "operation": operation })),
            )
        }
        AppError::Configuration { key, source } => {
            tracing::error!(key = %key, error = ?source, "Configuration error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("CONFIGURATION_ERROR", "Server is misconfigured"),
            )
        }
        AppError::ConnectionPool { source } => {
            tracing::error!(error = ?source, "Connection pool error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
            )
        }
        AppError::Internal { source } => {
            tracing::error!(error = ?source, "Internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
            )
        }
    }
}

/// Maps an AppError variant to its HTTP status code.
///
/// | variant | status |
/// |---|---|
/// | NotFound | 404 |
/// | Duplicate, Conflict | 409 |
/// | Validation, ValidationErrors, BadRequest | 400 |
/// | UnprocessableContent | 422 |
/// | Unauthorized | 401 |
/// | Forbidden | 403 |
/// | ConnectionPool | 503 |
/// | Database, Configuration, Internal | 500 |
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::UnprocessableContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = render(&self);
        (status, Json(error_response)).into_response()
    }
}

fn fallback_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

/// Rewrites non-JSON error responses into `ErrorResponse`.
///
/// Responses that already carry JSON pass through untouched. The request
/// id header, when present, is copied into the body.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, 64 * 1024)
        .await
        .unwrap_or_else(|_| Bytes::new());
    let original = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let message = if original.is_empty() || status.is_server_error() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        original
    };

    let mut error_response = ErrorResponse::new(fallback_code(status), &message);
    if let Some(id) = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        error_response = error_response.with_request_id(id);
    }

    let mut rewritten = (status, Json(error_response)).into_response();
    if let Some(id) = parts.headers.get(REQUEST_ID_HEADER) {
        rewritten.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    }
    rewritten
}
