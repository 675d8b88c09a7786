//! Integration tests for the HTTP surface
//!
//! Exercises the routes against an in-process app backed by the mock AI
//! collaborator, checking status codes, bodies and error mapping.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use collabhub::backend::coordinator::SessionCoordinator;
use collabhub::backend::routes::create_router;
use collabhub::backend::server::AppState;
use collabhub::shared::Role;

use crate::common::{test_config, MockAiCollaborator};

fn test_app() -> (TestServer, Arc<SessionCoordinator>, Arc<MockAiCollaborator>) {
    let ai = Arc::new(MockAiCollaborator::new());
    let coordinator = Arc::new(SessionCoordinator::new(test_config(), ai.clone()));
    let app = create_router(AppState::new(coordinator.clone()));
    (TestServer::new(app).unwrap(), coordinator, ai)
}

fn identity(
    request: axum_test::TestRequest,
    user_id: &str,
    user_name: &str,
    role: &str,
) -> axum_test::TestRequest {
    request
        .add_header("x-collab-user-id", user_id)
        .add_header("x-collab-user-name", user_name)
        .add_header("x-collab-role", role)
}

#[tokio::test]
async fn test_missing_identity_is_bad_request() {
    let (server, _coordinator, _ai) = test_app();

    let response = server
        .post("/sessions/doc-1/chat")
        .json(&json!({"body": "hi"}))
        .await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid");
}

#[tokio::test]
async fn test_unrecognized_role_is_bad_request() {
    let (server, _coordinator, _ai) = test_app();

    let response = server
        .post("/sessions/doc-1/chat")
        .add_header("x-collab-user-id", "u1")
        .add_header("x-collab-role", "superuser")
        .json(&json!({"body": "hi"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_chat_on_unknown_session_is_not_found() {
    let (server, _coordinator, _ai) = test_app();

    let response = identity(server.post("/sessions/ghost/chat"), "u1", "Alice", "owner")
        .json(&json!({"body": "hi"}))
        .await;
    response.assert_status_not_found();

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not-found");
}

#[tokio::test]
async fn test_chat_round_trip() {
    let (server, coordinator, _ai) = test_app();

    let _alice = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();

    let response = identity(server.post("/sessions/doc-1/chat"), "u1", "Alice", "owner")
        .json(&json!({"body": "hello over http"}))
        .await;
    response.assert_status_ok();

    let message: serde_json::Value = response.json();
    assert_eq!(message["body"], "hello over http");
    assert_eq!(message["sender_id"], "u1");

    let response = identity(
        server.get("/sessions/doc-1/messages"),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    response.assert_status_ok();
    let messages: Vec<serde_json::Value> = response.json();
    // Join notice plus the chat message
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["body"], "hello over http");
}

#[tokio::test]
async fn test_empty_chat_body_is_bad_request() {
    let (server, coordinator, _ai) = test_app();
    let _alice = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();

    let response = identity(server.post("/sessions/doc-1/chat"), "u1", "Alice", "owner")
        .json(&json!({"body": "  "}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_status_update() {
    let (server, coordinator, _ai) = test_app();
    let _alice = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();

    let response = identity(server.post("/sessions/doc-1/status"), "u1", "Alice", "owner")
        .json(&json!({"status": "away"}))
        .await;
    response.assert_status_ok();
    let collaborator: serde_json::Value = response.json();
    assert_eq!(collaborator["status"], "away");

    let response = identity(
        server.get("/sessions/doc-1/collaborators"),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    let collaborators: Vec<serde_json::Value> = response.json();
    assert_eq!(collaborators.len(), 1);
    assert_eq!(collaborators[0]["status"], "away");
}

#[tokio::test]
async fn test_suggestion_request_is_accepted_and_acceptance_forbidden_for_viewer() {
    let (server, coordinator, ai) = test_app();
    ai.queue_suggestions(&["one"]);

    let mut owner = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();
    let _viewer = coordinator
        .connect("doc-1", "u2", "Eve", Role::Viewer)
        .await
        .unwrap();

    let response = identity(
        server.post("/sessions/doc-1/suggestions"),
        "u2",
        "Eve",
        "viewer",
    )
    .json(&json!({"kind": "collaboration-suggestion", "context": {"doc": "doc-1"}}))
    .await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let job: serde_json::Value = response.json();
    assert_eq!(job["kind"], "collaboration-suggestion");
    assert!(!job["jobId"].as_str().unwrap().is_empty());

    // Wait for the suggestion to land on the event stream
    let suggestion_id = loop {
        match crate::common::next_event(&mut owner).await {
            collabhub::shared::SessionEvent::SuggestionCreated { suggestion } => {
                break suggestion.id
            }
            _ => continue,
        }
    };

    let response = identity(
        server.post(&format!(
            "/sessions/doc-1/suggestions/{}/accept",
            suggestion_id
        )),
        "u2",
        "Eve",
        "viewer",
    )
    .await;
    response.assert_status_forbidden();

    let response = identity(
        server.post(&format!(
            "/sessions/doc-1/suggestions/{}/accept",
            suggestion_id
        )),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    response.assert_status_ok();
    let accepted: serde_json::Value = response.json();
    assert_eq!(accepted["status"], "accepted");

    // Accepted suggestions no longer show up in the pending listing
    let response = identity(
        server.get("/sessions/doc-1/suggestions"),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    let pending: Vec<serde_json::Value> = response.json();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn test_conflict_report_and_resolution_over_http() {
    let (server, coordinator, ai) = test_app();
    ai.queue_resolution("merge both edits");

    let mut owner = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();

    let response = identity(
        server.post("/sessions/doc-1/conflicts"),
        "u1",
        "Alice",
        "owner",
    )
    .json(&json!({"description": "overlapping edits", "originating_event": {"at": 5}}))
    .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let conflict: serde_json::Value = response.json();
    assert_eq!(conflict["status"], "open");
    let conflict_id = conflict["id"].as_str().unwrap().to_string();

    let response = identity(
        server.post(&format!("/sessions/doc-1/conflicts/{}/resolve", conflict_id)),
        "u1",
        "Alice",
        "owner",
    )
    .json(&json!({"history": []}))
    .await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);
    let resolving: serde_json::Value = response.json();
    assert_eq!(resolving["status"], "resolving");

    // Wait for the terminal broadcast, then check the filtered listing
    loop {
        match crate::common::next_event(&mut owner).await {
            collabhub::shared::SessionEvent::ConflictResolved { .. } => break,
            _ => continue,
        }
    }

    let response = identity(
        server.get("/sessions/doc-1/conflicts?status=resolved"),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    let resolved: Vec<serde_json::Value> = response.json();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["resolution"]["text"], "merge both edits");
}

#[tokio::test]
async fn test_conflicts_invalid_status_filter_is_bad_request() {
    let (server, coordinator, _ai) = test_app();
    let _alice = coordinator
        .connect("doc-1", "u1", "Alice", Role::Owner)
        .await
        .unwrap();

    let response = identity(
        server.get("/sessions/doc-1/conflicts?status=bogus"),
        "u1",
        "Alice",
        "owner",
    )
    .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_events_requires_identity() {
    let (server, _coordinator, _ai) = test_app();
    let response = server.get("/sessions/doc-1/events").await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_health() {
    let (server, _coordinator, _ai) = test_app();
    let response = server.get("/health").await;
    response.assert_status_ok();
}
