//! JSON response envelope.
//!
//! Every endpoint answers with `{success, data?, error?, message?, pagination?}`.
//! Failures carry the client-safe message of an [`AppError`]; server errors
//! are logged here and replaced by a generic text.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qayd_shared::{AppError, types::Pagination};
use serde::Serialize;
use tracing::error;
use validator::ValidationErrors;

/// Response body shared by all endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable outcome of a write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Page metadata of list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    fn ok(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message,
            pagination: None,
        }
    }
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(Envelope::ok(Some(data), None))).into_response()
}

/// 200 with a page of `data`.
pub fn page<T: Serialize>(data: Vec<T>, pagination: Pagination) -> Response {
    let mut body = Envelope::ok(Some(data), None);
    body.pagination = Some(pagination);
    (StatusCode::OK, Json(body)).into_response()
}

/// `status` with `data` and a message.
pub fn saved<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (
        status,
        Json(Envelope::ok(Some(data), Some(message.to_string()))),
    )
        .into_response()
}

/// 200 with only a message.
pub fn done(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(Envelope::<()>::ok(None, Some(message.to_string()))),
    )
        .into_response()
}

/// Failure response for `err`.
pub fn failure(err: AppError) -> Response {
    if err.is_server_error() {
        error!(error = %err, code = err.error_code(), "Request failed");
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Envelope::<()> {
        success: false,
        data: None,
        error: Some(err.public_message()),
        message: None,
        pagination: None,
    };
    (status, Json(body)).into_response()
}

/// 400 with `message`.
pub fn bad_request(message: impl Into<String>) -> Response {
    failure(AppError::Validation(message.into()))
}

/// 400 for request bodies that fail field validation.
pub fn invalid(errors: &ValidationErrors) -> Response {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map_or_else(|| "is invalid".to_string(), ToString::to_string);
            format!("{field} {reason}")
        })
        .collect();
    fields.sort();
    bad_request(fields.join("; "))
}

/// 400 for bodies that are not valid JSON for the endpoint.
pub fn rejected_body(rejection: &JsonRejection) -> Response {
    bad_request(rejection.body_text())
}

/// 400 for query strings that cannot be parsed.
pub fn rejected_query(rejection: &QueryRejection) -> Response {
    bad_request(rejection.body_text())
}
