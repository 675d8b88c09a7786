/**
 * Session Route Handlers
 *
 * HTTP surface of the session coordinator. The SSE subscription at
 * `GET /sessions/{id}/events` is the join path: connecting creates the
 * session if needed and registers the caller as a live collaborator, and
 * dropping the stream is the leave path. Everything else operates on an
 * existing session and fails with 404 when there is none.
 */
use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::stream;
use serde::Deserialize;

use crate::backend::ai::SuggestionRequestKind;
use crate::backend::error::ApiError;
use crate::backend::middleware::CollaboratorIdentity;
use crate::backend::server::state::AppState;
use crate::backend::session::SuggestionJob;
use crate::shared::collaborator::{Collaborator, PresenceStatus};
use crate::shared::conflict::{Conflict, ConflictStatus};
use crate::shared::error::CollabError;
use crate::shared::message::Message;
use crate::shared::suggestion::Suggestion;

/// Subscribe to a session's event stream (GET /sessions/{id}/events)
///
/// Joins the caller to the session (creating it on first join) and returns
/// an SSE stream of its events in submission order. The SSE event name is
/// the wire tag (`presence-changed`, `message`, ...), the data the full
/// JSON event.
pub async fn subscribe_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    identity: CollaboratorIdentity,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    tracing::info!(
        "[Routes] {} subscribing to session {}",
        identity.user_id,
        session_id
    );

    let connection = state
        .coordinator
        .connect(&session_id, identity.user_id, identity.user_name, identity.role)
        .await?;

    // The connection handle lives inside the stream; when the client goes
    // away the stream is dropped and the handle's Drop disconnects.
    let stream = stream::unfold(connection, |mut connection| async move {
        loop {
            match connection.next_event().await {
                Some(event) => {
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Routes] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };
                    let sse_event = Event::default().event(event.name()).data(data);
                    return Some((Ok(sse_event), connection));
                }
                // Session torn down or this connection was displaced
                None => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Deserialize)]
pub struct SendChatBody {
    pub body: String,
}

/// Send a chat message (POST /sessions/{id}/chat)
pub async fn send_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    identity: CollaboratorIdentity,
    Json(payload): Json<SendChatBody>,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .coordinator
        .send_chat(&session_id, &identity.user_id, payload.body)
        .await?;
    Ok(Json(message))
}

#[derive(Deserialize)]
pub struct SetStatusBody {
    pub status: PresenceStatus,
}

/// Update the caller's presence status (POST /sessions/{id}/status)
pub async fn set_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    identity: CollaboratorIdentity,
    Json(payload): Json<SetStatusBody>,
) -> Result<Json<Collaborator>, ApiError> {
    let collaborator = state
        .coordinator
        .set_status(&session_id, &identity.user_id, payload.status)
        .await?;
    Ok(Json(collaborator))
}

#[derive(Deserialize)]
pub struct RequestSuggestionsBody {
    pub kind: SuggestionRequestKind,
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Request AI suggestions (POST /sessions/{id}/suggestions)
///
/// Returns 202 with a job handle; the resulting suggestions arrive on the
/// event stream as `suggestion-created` events.
pub async fn request_suggestions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    identity: CollaboratorIdentity,
    Json(payload): Json<RequestSuggestionsBody>,
) -> Result<(StatusCode, Json<SuggestionJob>), ApiError> {
    let job = state
        .coordinator
        .request_suggestions(&session_id, &identity.user_id, payload.kind, payload.context)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// Accept a pending suggestion (POST /sessions/{id}/suggestions/{sid}/accept)
pub async fn accept_suggestion(
    State(state): State<AppState>,
    Path((session_id, suggestion_id)): Path<(String, String)>,
    identity: CollaboratorIdentity,
) -> Result<Json<Suggestion>, ApiError> {
    let suggestion = state
        .coordinator
        .accept_suggestion(&session_id, &identity.user_id, &suggestion_id)
        .await?;
    Ok(Json(suggestion))
}

/// Reject a pending suggestion (POST /sessions/{id}/suggestions/{sid}/reject)
pub async fn reject_suggestion(
    State(state): State<AppState>,
    Path((session_id, suggestion_id)): Path<(String, String)>,
    identity: CollaboratorIdentity,
) -> Result<Json<Suggestion>, ApiError> {
    let suggestion = state
        .coordinator
        .reject_suggestion(&session_id, &identity.user_id, &suggestion_id)
        .await?;
    Ok(Json(suggestion))
}

#[derive(Deserialize)]
pub struct ReportConflictBody {
    pub description: String,
    #[serde(default)]
    pub originating_event: serde_json::Value,
}

/// Report a conflict (POST /sessions/{id}/conflicts)
pub async fn report_conflict(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    identity: CollaboratorIdentity,
    Json(payload): Json<ReportConflictBody>,
) -> Result<(StatusCode, Json<Conflict>), ApiError> {
    let conflict = state
        .coordinator
        .report_conflict(
            &session_id,
            &identity.user_id,
            payload.description,
            payload.originating_event,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(conflict)))
}

#[derive(Deserialize)]
pub struct ResolveConflictBody {
    #[serde(default)]
    pub history: serde_json::Value,
}

/// Start resolving a conflict (POST /sessions/{id}/conflicts/{cid}/resolve)
///
/// Returns 202 with the conflict in `resolving` state (or `resolved` when
/// it already was); the terminal outcome arrives as a `conflict-resolved`
/// event on the stream.
pub async fn resolve_conflict(
    State(state): State<AppState>,
    Path((session_id, conflict_id)): Path<(String, String)>,
    identity: CollaboratorIdentity,
    Json(payload): Json<ResolveConflictBody>,
) -> Result<(StatusCode, Json<Conflict>), ApiError> {
    let conflict = state
        .coordinator
        .resolve_conflict(&session_id, &identity.user_id, &conflict_id, payload.history)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(conflict)))
}

/// List live collaborators (GET /sessions/{id}/collaborators)
pub async fn list_collaborators(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Collaborator>>, ApiError> {
    Ok(Json(state.coordinator.collaborators(&session_id).await?))
}

/// List retained messages, oldest first (GET /sessions/{id}/messages)
pub async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(state.coordinator.messages(&session_id).await?))
}

/// List pending suggestions, oldest first (GET /sessions/{id}/suggestions)
pub async fn list_pending_suggestions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    Ok(Json(
        state.coordinator.pending_suggestions(&session_id).await?,
    ))
}

/// List conflicts, optionally filtered (GET /sessions/{id}/conflicts?status=)
pub async fn list_conflicts(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Conflict>>, ApiError> {
    let status = match query.get("status") {
        Some(raw) => Some(raw.parse::<ConflictStatus>().map_err(|_| {
            CollabError::invalid(format!("unrecognized conflict status: {}", raw))
        })?),
        None => None,
    };
    Ok(Json(
        state.coordinator.conflicts(&session_id, status).await?,
    ))
}
