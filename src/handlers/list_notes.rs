use crate::{
    app_state::AppState,
    backend::BackendError,
    types::{Note, error::ApiError},
};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

/// GET /notes/{uid} - All notes of a user, newest first
pub async fn list_notes(
    path: Result<Path<String>, PathRejection>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let Path(uid) = path?;
    tracing::info!("LIST notes: uid={}", uid);

    let notes = app_state
        .repository
        .list_notes(&uid)
        .await
        .map_err(|e| match e {
            BackendError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => {
                tracing::error!("Fetch notes error: {}", other);
                ApiError::Internal("Error fetching notes".to_string())
            }
        })?;

    Ok(Json(notes))
}
