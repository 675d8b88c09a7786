/**
 * Session Coordinator
 *
 * Owns the registry of live session actors. Sessions are created on first
 * connect and torn down by their own grace timer; a reaper task removes
 * stopped actors from the registry so the map never accumulates handles to
 * dead sessions.
 */
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::backend::ai::{AiCollaborator, SuggestionRequestKind};
use crate::backend::session::{ConnectionHandle, SessionActor, SessionHandle, SuggestionJob};
use crate::shared::collaborator::{Collaborator, PresenceStatus, Role};
use crate::shared::config::CoordinatorConfig;
use crate::shared::conflict::{Conflict, ConflictStatus};
use crate::shared::error::{CollabError, CollabResult};
use crate::shared::message::Message;
use crate::shared::suggestion::Suggestion;

/// Registry of live sessions, shared across the HTTP layer
pub struct SessionCoordinator {
    config: CoordinatorConfig,
    ai: Arc<dyn AiCollaborator>,
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    /// Handed to every spawned actor so the reaper learns about stops
    closed_tx: mpsc::UnboundedSender<String>,
}

impl SessionCoordinator {
    pub fn new(config: CoordinatorConfig, ai: Arc<dyn AiCollaborator>) -> Self {
        let sessions: Arc<RwLock<HashMap<String, SessionHandle>>> =
            Arc::new(RwLock::new(HashMap::new()));
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();

        tokio::spawn(Self::reap_closed(Arc::clone(&sessions), closed_rx));

        Self {
            config,
            ai,
            sessions,
            closed_tx,
        }
    }

    /// Remove stopped actors from the registry
    ///
    /// Only handles that actually report closed are removed: a session id
    /// can be reused by a fresh actor spawned after the old one stopped but
    /// before its notification was processed.
    async fn reap_closed(
        sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
        mut closed_rx: mpsc::UnboundedReceiver<String>,
    ) {
        while let Some(session_id) = closed_rx.recv().await {
            let mut map = sessions.write().await;
            if map.get(&session_id).is_some_and(|h| h.is_closed()) {
                map.remove(&session_id);
                tracing::info!("[Coordinator] Reaped session {}", session_id);
            }
        }
    }

    /// Connect a collaborator, creating the session if it does not exist
    pub async fn connect(
        &self,
        session_id: &str,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        role: Role,
    ) -> CollabResult<ConnectionHandle> {
        let user_id = user_id.into();
        let user_name = user_name.into();

        // An actor can stop between lookup and connect; retry with a
        // fresh one rather than surfacing the race to the caller.
        for _ in 0..3 {
            let handle = self.ensure_session(session_id).await;
            match handle.connect(&user_id, &user_name, role).await {
                Err(CollabError::NotFound { entity: "session", .. }) => continue,
                result => return result,
            }
        }
        Err(CollabError::not_found("session", session_id))
    }

    /// Get or spawn the actor for a session id
    async fn ensure_session(&self, session_id: &str) -> SessionHandle {
        {
            let map = self.sessions.read().await;
            if let Some(handle) = map.get(session_id) {
                if !handle.is_closed() {
                    return handle.clone();
                }
            }
        }

        let mut map = self.sessions.write().await;
        if let Some(handle) = map.get(session_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        tracing::info!("[Coordinator] Creating session {}", session_id);
        let handle = SessionActor::spawn(
            session_id.to_string(),
            self.config.clone(),
            Arc::clone(&self.ai),
            self.closed_tx.clone(),
        );
        map.insert(session_id.to_string(), handle.clone());
        handle
    }

    /// Look up a live session; unknown or stopped sessions are not found
    pub async fn session(&self, session_id: &str) -> CollabResult<SessionHandle> {
        let map = self.sessions.read().await;
        match map.get(session_id) {
            Some(handle) if !handle.is_closed() => Ok(handle.clone()),
            _ => Err(CollabError::not_found("session", session_id)),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn set_status(
        &self,
        session_id: &str,
        user_id: &str,
        status: PresenceStatus,
    ) -> CollabResult<Collaborator> {
        self.session(session_id).await?.set_status(user_id, status).await
    }

    pub async fn send_chat(
        &self,
        session_id: &str,
        user_id: &str,
        body: impl Into<String>,
    ) -> CollabResult<Message> {
        self.session(session_id).await?.send_chat(user_id, body).await
    }

    pub async fn request_suggestions(
        &self,
        session_id: &str,
        user_id: &str,
        kind: SuggestionRequestKind,
        context: serde_json::Value,
    ) -> CollabResult<SuggestionJob> {
        self.session(session_id)
            .await?
            .request_suggestions(user_id, kind, context)
            .await
    }

    pub async fn accept_suggestion(
        &self,
        session_id: &str,
        user_id: &str,
        suggestion_id: &str,
    ) -> CollabResult<Suggestion> {
        self.session(session_id)
            .await?
            .accept_suggestion(user_id, suggestion_id)
            .await
    }

    pub async fn reject_suggestion(
        &self,
        session_id: &str,
        user_id: &str,
        suggestion_id: &str,
    ) -> CollabResult<Suggestion> {
        self.session(session_id)
            .await?
            .reject_suggestion(user_id, suggestion_id)
            .await
    }

    pub async fn report_conflict(
        &self,
        session_id: &str,
        user_id: &str,
        description: impl Into<String>,
        originating_event: serde_json::Value,
    ) -> CollabResult<Conflict> {
        self.session(session_id)
            .await?
            .report_conflict(user_id, description, originating_event)
            .await
    }

    pub async fn resolve_conflict(
        &self,
        session_id: &str,
        user_id: &str,
        conflict_id: &str,
        history: serde_json::Value,
    ) -> CollabResult<Conflict> {
        self.session(session_id)
            .await?
            .resolve_conflict(user_id, conflict_id, history)
            .await
    }

    pub async fn collaborators(&self, session_id: &str) -> CollabResult<Vec<Collaborator>> {
        self.session(session_id).await?.collaborators().await
    }

    pub async fn messages(&self, session_id: &str) -> CollabResult<Vec<Message>> {
        self.session(session_id).await?.messages().await
    }

    pub async fn pending_suggestions(&self, session_id: &str) -> CollabResult<Vec<Suggestion>> {
        self.session(session_id).await?.pending_suggestions().await
    }

    pub async fn conflicts(
        &self,
        session_id: &str,
        status: Option<ConflictStatus>,
    ) -> CollabResult<Vec<Conflict>> {
        self.session(session_id).await?.conflicts(status).await
    }
}
