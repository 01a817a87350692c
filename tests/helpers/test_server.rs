use n0t_backend::backend::{CollectionPath, Document, DocumentPath, Fields, Query};
use n0t_backend::{AppState, Backend, BackendError, DocumentStore, LoginPolicy, create_app};
use reqwest::{Client, Response};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Test server handle that automatically shuts down on drop
///
/// This starts a real HTTP server on a random port for integration testing.
/// The server uses the actual production code via create_app().
pub struct TestServer {
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    #[allow(dead_code)] // Keep handle alive to prevent task abort
    handle: JoinHandle<()>,
    pub client: Client,
    pub base_url: String,
}

impl TestServer {
    /// Start a test server with the in-memory backend
    pub async fn start(login_policy: LoginPolicy) -> Self {
        Self::start_with_backend(Backend::in_memory(), login_policy).await
    }

    pub async fn start_with_backend(backend: Backend, login_policy: LoginPolicy) -> Self {
        let app_state = AppState::new(backend, login_policy);

        // Use the ACTUAL production create_app function
        let app = create_app(app_state);

        // Bind to a random available port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        TestServer {
            shutdown_tx: Some(shutdown_tx),
            handle,
            client: Client::new(),
            base_url: format!("http://{}", addr),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// POST /register and return the new user id
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/register",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status(), 201, "registration should succeed");
        let body: Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Signal shutdown (ignore errors if already shut down)
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Document store whose every call fails like an unreachable upstream
pub struct FailingDocuments;

impl FailingDocuments {
    fn error() -> BackendError {
        BackendError::Upstream {
            service: "firestore",
            status: 503,
            message: "unavailable".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FailingDocuments {
    async fn set(&self, _path: &DocumentPath, _fields: Fields) -> Result<(), BackendError> {
        Err(Self::error())
    }

    async fn add(
        &self,
        _collection: &CollectionPath,
        _fields: Fields,
    ) -> Result<String, BackendError> {
        Err(Self::error())
    }

    async fn query(&self, _query: &Query) -> Result<Vec<Document>, BackendError> {
        Err(Self::error())
    }
}
