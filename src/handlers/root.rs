pub const LIVENESS_MESSAGE: &str = "n0t backend is live";

/// GET / - Liveness check
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}
