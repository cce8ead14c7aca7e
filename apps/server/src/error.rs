//! HTTP error envelope for API handlers.
//!
//! Domain errors carry enough structure to pick a status code; everything
//! else collapses to a 500 with the message preserved in the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spendwise_core::errors::{DatabaseError, Error as CoreError};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error that renders as `{"error": {"code", "message"}}` with a matching
/// HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

fn core_status(err: &CoreError) -> (StatusCode, &'static str) {
    match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, "conflict"),
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
        CoreError::Database(DatabaseError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
        CoreError::Database(DatabaseError::UniqueViolation(_)) => {
            (StatusCode::CONFLICT, "conflict")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {message}");
        }
        let body = Json(ErrorBody {
            error: ErrorDetail { code, message },
        });
        (status, body).into_response()
    }
}
