//! HTTP error mapping.

use atlas_core::AtlasError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Handler error: an [`AtlasError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AtlasError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<AtlasError> for ApiError {
    fn from(err: AtlasError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AtlasError::Unauthorized(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AtlasError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AtlasError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AtlasError::NotFound { .. } => StatusCode::NOT_FOUND,
            AtlasError::Validation(_)
            | AtlasError::Serialization(_)
            | AtlasError::NoOpTransition { .. }
            | AtlasError::InvalidTransition { .. }
            | AtlasError::NotCompleted { .. } => StatusCode::BAD_REQUEST,
            AtlasError::Connection(_) | AtlasError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0 {
            // Field validation answers in plain text.
            AtlasError::Validation(message) => (status, message).into_response(),
            err => {
                if status.is_server_error() {
                    error!(error = %err, "Request failed");
                }
                (status, Json(json!({ "message": err.to_string() }))).into_response()
            }
        }
    }
}
