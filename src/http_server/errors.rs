//! # HTTP Errors
//!
//! Maps service, auth and request-shape failures to status codes and JSON
//! bodies. Most errors render as `{"error", "code"}`; field validation and
//! refused deletes carry their own shapes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::auth::AuthError;
use crate::service::{FieldViolation, ServiceError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// Body, path or query string could not be decoded
    BadRequest(String),
    /// The blocking task running the handler panicked or was cancelled
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Serialize)]
struct ValidationResponse<'a> {
    error: &'static str,
    details: &'a [FieldViolation],
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Service(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Service(ServiceError::Auth(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Service(ServiceError::Validation(details)) => (
                status,
                Json(ValidationResponse {
                    error: "validation",
                    details: &details,
                }),
            )
                .into_response(),
            ApiError::Service(ServiceError::Conflict { message, ref_count }) => (
                status,
                Json(json!({
                    "message": message,
                    "code": "FK_CONSTRAINT",
                    "refCount": ref_count,
                })),
            )
                .into_response(),
            other => {
                let error = match other {
                    ApiError::Service(err) => err.to_string(),
                    ApiError::BadRequest(message) | ApiError::Internal(message) => message,
                };
                let body = ErrorResponse {
                    error,
                    code: status.as_u16(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
