use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::error::StoreError;

/// Store failure surfaced over HTTP as `{"error": ...}`.
/// Validation maps to 400, missing entities to 404, everything else to 500.
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Write { .. }
            | StoreError::LockTimeout { .. }
            | StoreError::Encode(_)
            | StoreError::Closed => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(StoreError::Validation(message.into()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
