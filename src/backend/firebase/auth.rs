use super::token::AccessTokens;
use crate::backend::error::BackendError;
use crate::backend::identity::{
    EMAIL_EXISTS_MESSAGE, INVALID_EMAIL_MESSAGE, IdentityProvider, WEAK_PASSWORD_MESSAGE,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Firebase Authentication over the Identity Toolkit REST API
pub struct FirebaseAuth {
    http: reqwest::Client,
    tokens: Arc<AccessTokens>,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Map an Identity Toolkit error response onto [`BackendError`].
///
/// The message carries an upper-case code, optionally followed by ` : detail`
/// (e.g. `WEAK_PASSWORD : Password should be at least 6 characters`).
fn map_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    let code = message.split(" : ").next().unwrap_or_default().trim();

    match code {
        "EMAIL_EXISTS" | "DUPLICATE_EMAIL" => {
            BackendError::InvalidInput(EMAIL_EXISTS_MESSAGE.to_string())
        }
        "INVALID_EMAIL" | "MISSING_EMAIL" => {
            BackendError::InvalidInput(INVALID_EMAIL_MESSAGE.to_string())
        }
        "WEAK_PASSWORD" | "MISSING_PASSWORD" | "INVALID_PASSWORD_HASH" => {
            BackendError::InvalidInput(WEAK_PASSWORD_MESSAGE.to_string())
        }
        "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            BackendError::InvalidCredentials
        }
        _ => BackendError::Upstream {
            service: "identitytoolkit",
            status,
            message,
        },
    }
}

impl FirebaseAuth {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<AccessTokens>,
        endpoint: &str,
        project_id: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            tokens,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key,
        }
    }

    fn project_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.endpoint, self.project_id, method
        )
    }

    async fn post(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::http(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Identity Toolkit returned {}: {}", status, body);
        Err(map_error(status.as_u16(), &body))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let url = self.project_url("accounts");
        tracing::debug!("Creating account for {}", email);

        let request = self
            .http
            .post(&url)
            .bearer_auth(self.tokens.bearer().await?)
            .json(&json!({ "email": email, "password": password }));

        let account: AccountResponse = self
            .post(request, &url)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("create account response: {}", e)))?;

        Ok(account.local_id)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), BackendError> {
        let url = self.project_url("accounts:delete");
        tracing::debug!("Deleting account {}", uid);

        let request = self
            .http
            .post(&url)
            .bearer_auth(self.tokens.bearer().await?)
            .json(&json!({ "localId": uid }));

        self.post(request, &url).await?;
        Ok(())
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let Some(api_key) = &self.api_key else {
            return Err(BackendError::Config(
                "password verification requires a Firebase web API key".to_string(),
            ));
        };
        let url = format!("{}/v1/accounts:signInWithPassword", self.endpoint);
        tracing::debug!("Verifying password for {}", email);

        let request = self
            .http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }));

        let account: AccountResponse = self
            .post(request, &url)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("sign-in response: {}", e)))?;

        Ok(account.local_id)
    }
}
