//! Mapping from crate errors to HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Error returned by handlers; rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    /// Request is missing a required field
    BadRequest(String),
    /// Failure from the core layer
    Core(Error),
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self::Core(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Core(Error::InvalidMarks) => StatusCode::BAD_REQUEST,
            Self::Core(Error::StudentNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(Error::DuplicateStudentId { .. }) => StatusCode::CONFLICT,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => message,
            Self::Core(e) => {
                if status.is_server_error() {
                    error!("Request failed: {}", e);
                }
                e.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
