use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised while applying a partial update to the radar record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("{field} must be a {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
}

impl UpdateError {
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. } => field,
        }
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Update(#[from] UpdateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Update(error) => {
                tracing::warn!(field = error.field(), %error, "rejected radar update");
                let body = json!({
                    "status": "error",
                    "field": error.field(),
                    "message": error.to_string(),
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}
