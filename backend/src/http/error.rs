//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::FieldMapError;
use crate::db::repository::RepositoryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Underlying error text
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request: bad body, bad path parameter or rejected field
    BadRequest(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error. Repository errors carry their raw message;
    /// the operation context stays in the logs.
    pub fn body(&self) -> ApiError {
        match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg.as_str()),
            AppError::Repository(e) if e.is_not_found() => ApiError::new("NOT_FOUND", e.message()),
            AppError::Repository(e) => ApiError::new("REPOSITORY_ERROR", e.message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let AppError::Repository(e) = &self {
            if status.is_server_error() {
                warn!(status = status.as_u16(), "{}", e);
            }
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<FieldMapError> for AppError {
    fn from(err: FieldMapError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

// axum reports a missing content type as 415; every malformed body is a 400 here.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
