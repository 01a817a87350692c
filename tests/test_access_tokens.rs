use n0t_backend::backend::AccessTokens;
use n0t_backend::config::ServiceAccountKey;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_key(server: &MockServer) -> ServiceAccountKey {
    let mut key = ServiceAccountKey::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account.json"
    ))
    .unwrap();
    key.token_uri = format!("{}/token", server.uri());
    key
}

#[tokio::test]
async fn exchanges_signed_assertion_and_caches_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.test",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = AccessTokens::service_account(test_key(&server), reqwest::Client::new());
    assert_eq!(tokens.bearer().await.unwrap(), "ya29.test");
    // Served from cache, the mock expects exactly one exchange
    assert_eq!(tokens.bearer().await.unwrap(), "ya29.test");
}

#[tokio::test]
async fn rejected_assertion_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let tokens = AccessTokens::service_account(test_key(&server), reqwest::Client::new());
    assert!(matches!(
        tokens.bearer().await,
        Err(n0t_backend::BackendError::Upstream { status: 400, .. })
    ));
}
