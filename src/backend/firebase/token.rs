use crate::backend::error::BackendError;
use crate::config::ServiceAccountKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
https://www.googleapis.com/auth/datastore \
https://www.googleapis.com/auth/identitytoolkit \
https://www.googleapis.com/auth/userinfo.email";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// OAuth2 bearer tokens for the Google APIs
pub struct AccessTokens {
    source: TokenSource,
    cached: Mutex<Option<CachedToken>>,
}

enum TokenSource {
    /// Exchange a signed JWT assertion for a token at the key's `token_uri`
    ServiceAccount {
        key: ServiceAccountKey,
        http: reqwest::Client,
    },
    /// Fixed token, e.g. `owner` for the local emulators
    Fixed(String),
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

impl AccessTokens {
    pub fn service_account(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            source: TokenSource::ServiceAccount { key, http },
            cached: Mutex::new(None),
        }
    }

    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Fixed(token.into()),
            cached: Mutex::new(None),
        }
    }

    /// Current access token, refreshed shortly before it expires
    pub async fn bearer(&self) -> Result<String, BackendError> {
        let (key, http) = match &self.source {
            TokenSource::Fixed(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount { key, http } => (key, http),
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        tracing::debug!("Requesting access token for {}", key.client_email);
        let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;

        let response = http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BackendError::http(&key.token_uri, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Token exchange failed with {}: {}", status, message);
            return Err(BackendError::Upstream {
                service: "oauth2",
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}

fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, BackendError> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}
