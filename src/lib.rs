// Library exports for the binary and integration tests
pub mod app_state;
pub mod backend;
pub mod config;
pub mod handlers;
pub mod repository;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use app_state::AppState;
pub use backend::{Backend, BackendError, DocumentStore, IdentityProvider};
pub use config::{BackendConfig, Config, LoginPolicy};
pub use repository::Repository;

// Re-export server creation function
pub use server::create_app;
