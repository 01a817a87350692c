/// Errors raised by the identity provider and document store clients
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Caller-supplied data was rejected (bad email, weak password, bad path segment)
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("failed to sign token assertion: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{service} returned {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("failed to decode {0}")]
    Decode(String),
}

impl BackendError {
    pub(crate) fn http(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        BackendError::Http {
            endpoint: endpoint.into(),
            source,
        }
    }
}
