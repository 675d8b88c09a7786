/**
 * Session Handles
 *
 * `SessionHandle` is the cloneable client side of a session actor's command
 * queue; `ConnectionHandle` additionally ties one collaborator connection
 * (its event stream and connection id) to the session, and disconnects it
 * on drop so an abandoned SSE stream still triggers the leave path.
 */
use tokio::sync::{mpsc, oneshot};

use crate::backend::ai::SuggestionRequestKind;
use crate::shared::collaborator::{Collaborator, PresenceStatus, Role};
use crate::shared::conflict::{Conflict, ConflictStatus};
use crate::shared::error::{CollabError, CollabResult};
use crate::shared::event::SessionEvent;
use crate::shared::message::Message;
use crate::shared::suggestion::Suggestion;

use super::command::{Connected, SessionCommand, SuggestionJob};

/// Cloneable handle to a running session actor
#[derive(Clone, Debug)]
pub struct SessionHandle {
    session_id: String,
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(session_id: String, commands: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self {
            session_id,
            commands,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the actor behind this handle has stopped
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Send a command and await its reply
    ///
    /// A closed queue or dropped reply both mean the actor is gone, which
    /// callers observe as the session not being found.
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<CollabResult<T>>) -> SessionCommand,
    ) -> CollabResult<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .map_err(|_| CollabError::not_found("session", &self.session_id))?;
        rx.await
            .map_err(|_| CollabError::not_found("session", &self.session_id))?
    }

    /// Join the session, returning a connection bound to its event stream
    pub async fn connect(
        &self,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        role: Role,
    ) -> CollabResult<ConnectionHandle> {
        let user_id = user_id.into();
        let user_name = user_name.into();
        let connected = self
            .request(|reply| SessionCommand::Connect {
                user_id,
                user_name,
                role,
                reply,
            })
            .await?;

        Ok(ConnectionHandle {
            handle: self.clone(),
            collaborator: connected.collaborator,
            active_count: connected.active_count,
            connection_id: connected.connection_id,
            events: connected.events,
            detached: false,
        })
    }

    pub async fn set_status(
        &self,
        user_id: impl Into<String>,
        status: PresenceStatus,
    ) -> CollabResult<Collaborator> {
        let user_id = user_id.into();
        self.request(|reply| SessionCommand::SetStatus {
            user_id,
            status,
            reply,
        })
        .await
    }

    pub async fn send_chat(
        &self,
        user_id: impl Into<String>,
        body: impl Into<String>,
    ) -> CollabResult<Message> {
        let user_id = user_id.into();
        let body = body.into();
        self.request(|reply| SessionCommand::SendChat {
            user_id,
            body,
            reply,
        })
        .await
    }

    pub async fn request_suggestions(
        &self,
        user_id: impl Into<String>,
        kind: SuggestionRequestKind,
        context: serde_json::Value,
    ) -> CollabResult<SuggestionJob> {
        let user_id = user_id.into();
        self.request(|reply| SessionCommand::RequestSuggestions {
            user_id,
            kind,
            context,
            reply,
        })
        .await
    }

    pub async fn accept_suggestion(
        &self,
        user_id: impl Into<String>,
        suggestion_id: impl Into<String>,
    ) -> CollabResult<Suggestion> {
        let user_id = user_id.into();
        let suggestion_id = suggestion_id.into();
        self.request(|reply| SessionCommand::AcceptSuggestion {
            user_id,
            suggestion_id,
            reply,
        })
        .await
    }

    pub async fn reject_suggestion(
        &self,
        user_id: impl Into<String>,
        suggestion_id: impl Into<String>,
    ) -> CollabResult<Suggestion> {
        let user_id = user_id.into();
        let suggestion_id = suggestion_id.into();
        self.request(|reply| SessionCommand::RejectSuggestion {
            user_id,
            suggestion_id,
            reply,
        })
        .await
    }

    pub async fn report_conflict(
        &self,
        user_id: impl Into<String>,
        description: impl Into<String>,
        originating_event: serde_json::Value,
    ) -> CollabResult<Conflict> {
        let user_id = user_id.into();
        let description = description.into();
        self.request(|reply| SessionCommand::ReportConflict {
            user_id,
            description,
            originating_event,
            reply,
        })
        .await
    }

    pub async fn resolve_conflict(
        &self,
        user_id: impl Into<String>,
        conflict_id: impl Into<String>,
        history: serde_json::Value,
    ) -> CollabResult<Conflict> {
        let user_id = user_id.into();
        let conflict_id = conflict_id.into();
        self.request(|reply| SessionCommand::ResolveConflict {
            user_id,
            conflict_id,
            history,
            reply,
        })
        .await
    }

    pub async fn collaborators(&self) -> CollabResult<Vec<Collaborator>> {
        self.request(|reply| SessionCommand::ListCollaborators { reply })
            .await
    }

    pub async fn messages(&self) -> CollabResult<Vec<Message>> {
        self.request(|reply| SessionCommand::ListMessages { reply })
            .await
    }

    pub async fn pending_suggestions(&self) -> CollabResult<Vec<Suggestion>> {
        self.request(|reply| SessionCommand::ListPendingSuggestions { reply })
            .await
    }

    pub async fn conflicts(&self, status: Option<ConflictStatus>) -> CollabResult<Vec<Conflict>> {
        self.request(|reply| SessionCommand::ListConflicts { status, reply })
            .await
    }
}

/// One collaborator connection to a session
///
/// Holds the connection's FIFO event stream. Dropping the handle without
/// calling [`disconnect`](ConnectionHandle::disconnect) still disconnects:
/// the actor validates the connection id, so a reconnect that already
/// displaced this connection is unaffected.
pub struct ConnectionHandle {
    handle: SessionHandle,
    collaborator: Collaborator,
    active_count: usize,
    connection_id: String,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    detached: bool,
}

impl ConnectionHandle {
    pub fn session_id(&self) -> &str {
        self.handle.session_id()
    }

    pub fn collaborator(&self) -> &Collaborator {
        &self.collaborator
    }

    pub fn user_id(&self) -> &str {
        &self.collaborator.user_id
    }

    /// Active collaborator count observed at connect time
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Handle to the underlying session, usable past this connection's life
    pub fn session(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Next event on this connection's stream; None when the stream ended
    ///
    /// The stream ends when the session actor stops or when a reconnect of
    /// the same user displaces this connection.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub async fn send_chat(&self, body: impl Into<String>) -> CollabResult<Message> {
        self.handle.send_chat(self.user_id(), body).await
    }

    pub async fn set_status(&self, status: PresenceStatus) -> CollabResult<Collaborator> {
        self.handle.set_status(self.user_id(), status).await
    }

    /// Leave the session explicitly
    pub fn disconnect(mut self) {
        self.detached = true;
        let _ = self.handle.commands.send(SessionCommand::Disconnect {
            user_id: self.collaborator.user_id.clone(),
            connection_id: self.connection_id.clone(),
        });
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        let _ = self.handle.commands.send(SessionCommand::Disconnect {
            user_id: self.collaborator.user_id.clone(),
            connection_id: self.connection_id.clone(),
        });
    }
}
