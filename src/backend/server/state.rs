/**
 * Application State
 *
 * The shared state handed to every Axum handler. The coordinator carries
 * all session state internally; the HTTP layer only ever clones the Arc.
 */
use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::coordinator::SessionCoordinator;

/// Central state container for the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<SessionCoordinator>) -> Self {
        Self { coordinator }
    }
}

/// Lets handlers extract `State<Arc<SessionCoordinator>>` directly
impl FromRef<AppState> for Arc<SessionCoordinator> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.coordinator)
    }
}
