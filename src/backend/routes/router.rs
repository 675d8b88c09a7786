/**
 * Router Configuration
 *
 * Assembles the session coordinator's HTTP surface. All routes live under
 * `/sessions/{id}`; the SSE subscription doubles as the join path.
 */
use axum::routing::{get, post};
use axum::Router;

use crate::backend::routes::session_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route(
            "/sessions/{session_id}/events",
            get(session_routes::subscribe_session),
        )
        .route(
            "/sessions/{session_id}/chat",
            post(session_routes::send_chat),
        )
        .route(
            "/sessions/{session_id}/status",
            post(session_routes::set_status),
        )
        .route(
            "/sessions/{session_id}/collaborators",
            get(session_routes::list_collaborators),
        )
        .route(
            "/sessions/{session_id}/messages",
            get(session_routes::list_messages),
        )
        .route(
            "/sessions/{session_id}/suggestions",
            get(session_routes::list_pending_suggestions)
                .post(session_routes::request_suggestions),
        )
        .route(
            "/sessions/{session_id}/suggestions/{suggestion_id}/accept",
            post(session_routes::accept_suggestion),
        )
        .route(
            "/sessions/{session_id}/suggestions/{suggestion_id}/reject",
            post(session_routes::reject_suggestion),
        )
        .route(
            "/sessions/{session_id}/conflicts",
            get(session_routes::list_conflicts).post(session_routes::report_conflict),
        )
        .route(
            "/sessions/{session_id}/conflicts/{conflict_id}/resolve",
            post(session_routes::resolve_conflict),
        )
        .route("/health", get(|| async { "ok" }))
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(app_state)
}
