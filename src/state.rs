//! Shared application state for all routes. Read-only after startup.

use crate::config::ResourceRegistry;
use crate::credentials::CredentialStore;
use crate::token::TokenService;
use axum::extract::FromRef;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub registry: Arc<ResourceRegistry>,
    /// Backs `POST /register` and `POST /auth`.
    pub credentials: Arc<dyn CredentialStore>,
    pub static_events_path: Arc<PathBuf>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
