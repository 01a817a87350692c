use crate::{
    app_state::AppState,
    backend::BackendError,
    config::LoginPolicy,
    types::{LoginRequest, UserResponse, error::ApiError},
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};

const LOGIN_ERROR: &str = "Error logging in";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /login - Resolve a user by email, verifying the password unless the
/// login policy is `lookup`
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        "LOGIN: email={}, policy={:?}",
        request.email,
        app_state.login_policy
    );

    let password = match app_state.login_policy {
        LoginPolicy::VerifyPassword => match request.password.as_deref() {
            Some(password) if !password.is_empty() => Some(password),
            _ => return Err(ApiError::InvalidInput("Password is required".to_string())),
        },
        LoginPolicy::Lookup => None,
    };

    let uid = app_state
        .repository
        .find_user_by_email(&request.email)
        .await
        .map_err(|e| {
            tracing::error!("Login error: {}", e);
            ApiError::Internal(LOGIN_ERROR.to_string())
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(password) = password {
        match app_state
            .identity
            .verify_password(&request.email, password)
            .await
        {
            Ok(verified) if verified == uid => {}
            Ok(verified) => {
                tracing::warn!(
                    "Login rejected: account {} does not own user document {}",
                    verified,
                    uid
                );
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(BackendError::InvalidCredentials) => {
                tracing::warn!("Login rejected for {}: invalid credentials", request.email);
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => {
                tracing::error!("Login error: {}", e);
                return Err(ApiError::Internal(LOGIN_ERROR.to_string()));
            }
        }
    }

    Ok(Json(UserResponse {
        id: uid,
        display_name: request.email,
    }))
}
