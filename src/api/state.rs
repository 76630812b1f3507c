//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::AuthService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service (login, validate, refresh, logout).
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Create new application state.
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
