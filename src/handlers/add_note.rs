use crate::{
    app_state::AppState,
    backend::BackendError,
    types::{AddNoteRequest, Note, NoteRecord, error::ApiError, timestamp_now},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

/// POST /notes/{uid} - Add a note stamped with the current time
pub async fn add_note(
    path: Result<Path<String>, PathRejection>,
    State(app_state): State<AppState>,
    payload: Result<Json<AddNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Path(uid) = path?;
    let Json(request) = payload?;
    tracing::info!("ADD note: uid={}", uid);

    // Stored and returned timestamps are the same value
    let record = NoteRecord {
        text: request.text,
        date: timestamp_now(),
    };

    let note = app_state
        .repository
        .add_note(&uid, record)
        .await
        .map_err(|e| match e {
            BackendError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => {
                tracing::error!("Save note error: {}", other);
                ApiError::Internal("Error saving note".to_string())
            }
        })?;

    Ok((StatusCode::CREATED, Json(note)))
}
