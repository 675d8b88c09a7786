/**
 * API Error Mapping
 *
 * Maps coordinator errors onto HTTP responses. Every handler returns
 * `Result<T, ApiError>` and propagates coordinator errors with `?`; the
 * response body carries the error kind and message as JSON.
 */
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::shared::error::CollabError;

/// HTTP-facing wrapper around [`CollabError`]
#[derive(Debug)]
pub struct ApiError(pub CollabError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            CollabError::NotFound { .. } => StatusCode::NOT_FOUND,
            CollabError::Forbidden { .. } => StatusCode::FORBIDDEN,
            CollabError::AlreadyInFlight { .. } => StatusCode::CONFLICT,
            CollabError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            CollabError::Invalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn kind(&self) -> &'static str {
        match &self.0 {
            CollabError::NotFound { .. } => "not-found",
            CollabError::Forbidden { .. } => "forbidden",
            CollabError::AlreadyInFlight { .. } => "already-in-flight",
            CollabError::Upstream { .. } => "upstream",
            CollabError::Invalid { .. } => "invalid",
        }
    }
}

impl From<CollabError> for ApiError {
    fn from(error: CollabError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[Api] {} -> {}", self.0, status);
        } else {
            tracing::debug!("[Api] {} -> {}", self.0, status);
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
