use crate::{
    backend::{Backend, IdentityProvider},
    config::LoginPolicy,
    repository::Repository,
};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub repository: Repository,
    pub login_policy: LoginPolicy,
}

impl AppState {
    pub fn new(backend: Backend, login_policy: LoginPolicy) -> Self {
        Self {
            identity: backend.identity,
            repository: Repository::new(backend.documents),
            login_policy,
        }
    }
}
