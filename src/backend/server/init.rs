/**
 * Server Initialization
 *
 * Wires configuration, the AI collaborator client and the session
 * coordinator into a ready-to-serve Axum app.
 */
use std::sync::Arc;

use axum::Router;

use crate::backend::ai::HttpAiCollaborator;
use crate::backend::coordinator::SessionCoordinator;
use crate::backend::routes::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Build the application from environment configuration
pub fn create_app() -> Router {
    let config = ServerConfig::from_env();
    create_app_with_config(config)
}

/// Build the application from an explicit configuration
pub fn create_app_with_config(config: ServerConfig) -> Router {
    tracing::info!(
        "[Init] AI collaborator endpoint: {}, log cap {}, suggestion cap {}",
        config.ai_base_url,
        config.coordinator.message_log_cap,
        config.coordinator.suggestion_cap
    );

    let ai = Arc::new(HttpAiCollaborator::new(&config.ai_base_url));
    let coordinator = Arc::new(SessionCoordinator::new(config.coordinator, ai));

    create_router(AppState::new(coordinator))
}
