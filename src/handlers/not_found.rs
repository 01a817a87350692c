use crate::types::error::ApiError;
use axum::response::{IntoResponse, Response};

/// Fallback handler for unknown routes
pub async fn not_found() -> Response {
    ApiError::NotFound("Not found".to_string()).into_response()
}
