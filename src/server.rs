use crate::{app_state::AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router with all routes and middleware
///
/// This function is used by both main.rs and integration tests to ensure
/// the same server configuration is used in both production and tests.
pub fn create_app(app_state: AppState) -> Router {
    use handlers::{add_note, list_notes, login, not_found, register, root};

    Router::new()
        .route("/", get(root))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/notes/{uid}", get(list_notes).post(add_note))
        // Fallback for 404 Not Found
        .fallback(not_found)
        .with_state(app_state)
        // Any origin may call the API
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
