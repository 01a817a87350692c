use crate::{
    app_state::AppState,
    backend::BackendError,
    types::{RegisterRequest, UserRecord, UserResponse, error::ApiError, timestamp_now},
};
use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

/// POST /register - Create an account and its user document
pub async fn register(
    State(app_state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(request) = payload?;
    tracing::info!("REGISTER: email={}", request.email);

    let uid = app_state
        .identity
        .create_user(&request.email, &request.password)
        .await
        .map_err(|e| match e {
            BackendError::InvalidInput(msg) => {
                tracing::warn!("Register rejected for {}: {}", request.email, msg);
                ApiError::InvalidInput(msg)
            }
            other => {
                tracing::error!("Register error: {}", other);
                ApiError::Internal("Error registering user".to_string())
            }
        })?;

    let user = UserRecord {
        email: request.email.clone(),
        created_at: timestamp_now(),
    };

    if let Err(e) = app_state.repository.save_user(&uid, &user).await {
        tracing::error!("Register error: failed to store user {}: {}", uid, e);
        // Drop the account so the email can be registered again
        if let Err(rollback) = app_state.identity.delete_user(&uid).await {
            tracing::warn!("Failed to roll back account {}: {}", uid, rollback);
        }
        return Err(ApiError::Internal("Error registering user".to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: uid,
            display_name: request.email,
        }),
    ))
}
