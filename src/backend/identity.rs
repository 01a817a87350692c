use super::error::BackendError;

pub const INVALID_EMAIL_MESSAGE: &str = "The email address is improperly formatted.";
pub const WEAK_PASSWORD_MESSAGE: &str =
    "The password must be a string with at least 6 characters.";
pub const EMAIL_EXISTS_MESSAGE: &str = "The email address is already in use by another account.";
pub const MIN_PASSWORD_LEN: usize = 6;

/// Managed identity provider: creates and authenticates user accounts
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return the provider-assigned user id.
    /// Rejected input (malformed email, weak password, duplicate account)
    /// surfaces as [`BackendError::InvalidInput`].
    async fn create_user(&self, email: &str, password: &str) -> Result<String, BackendError>;

    async fn delete_user(&self, uid: &str) -> Result<(), BackendError>;

    /// Check an email/password pair and return the account's user id.
    /// Unknown email or wrong password surfaces as [`BackendError::InvalidCredentials`].
    async fn verify_password(&self, email: &str, password: &str) -> Result<String, BackendError>;
}
