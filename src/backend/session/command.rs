/**
 * Session Commands
 *
 * The inbound command queue vocabulary for a session actor. Client-facing
 * commands carry a oneshot reply channel; internal commands are how AI
 * completions and the teardown timer re-enter the session's serialized
 * execution context.
 */
use tokio::sync::{mpsc, oneshot};

use crate::backend::ai::{AiResolution, AiSuggestion, SuggestionRequestKind};
use crate::shared::collaborator::{Collaborator, PresenceStatus, Role};
use crate::shared::conflict::{Conflict, ConflictStatus};
use crate::shared::error::{CollabError, CollabResult};
use crate::shared::event::SessionEvent;
use crate::shared::message::Message;
use crate::shared::suggestion::Suggestion;

/// Reply to a successful connect
#[derive(Debug)]
pub struct Connected {
    /// The collaborator entry the registry now holds
    pub collaborator: Collaborator,
    /// Active collaborator count after the join
    pub active_count: usize,
    /// Identifies this connection; a reconnect gets a new one
    pub connection_id: String,
    /// The connection's FIFO event stream
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

/// Handle to an asynchronously running suggestion request
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionJob {
    /// Correlates log lines with the eventual broadcast results
    pub job_id: String,
    /// What kind of suggestions were requested
    pub kind: SuggestionRequestKind,
}

/// Everything a session actor can be asked to do
pub(crate) enum SessionCommand {
    Connect {
        user_id: String,
        user_name: String,
        role: Role,
        reply: oneshot::Sender<CollabResult<Connected>>,
    },
    Disconnect {
        user_id: String,
        connection_id: String,
    },
    SetStatus {
        user_id: String,
        status: PresenceStatus,
        reply: oneshot::Sender<CollabResult<Collaborator>>,
    },
    SendChat {
        user_id: String,
        body: String,
        reply: oneshot::Sender<CollabResult<Message>>,
    },
    RequestSuggestions {
        user_id: String,
        kind: SuggestionRequestKind,
        context: serde_json::Value,
        reply: oneshot::Sender<CollabResult<SuggestionJob>>,
    },
    AcceptSuggestion {
        user_id: String,
        suggestion_id: String,
        reply: oneshot::Sender<CollabResult<Suggestion>>,
    },
    RejectSuggestion {
        user_id: String,
        suggestion_id: String,
        reply: oneshot::Sender<CollabResult<Suggestion>>,
    },
    ReportConflict {
        user_id: String,
        description: String,
        originating_event: serde_json::Value,
        reply: oneshot::Sender<CollabResult<Conflict>>,
    },
    ResolveConflict {
        user_id: String,
        conflict_id: String,
        history: serde_json::Value,
        reply: oneshot::Sender<CollabResult<Conflict>>,
    },
    ListCollaborators {
        reply: oneshot::Sender<CollabResult<Vec<Collaborator>>>,
    },
    ListMessages {
        reply: oneshot::Sender<CollabResult<Vec<Message>>>,
    },
    ListPendingSuggestions {
        reply: oneshot::Sender<CollabResult<Vec<Suggestion>>>,
    },
    ListConflicts {
        status: Option<ConflictStatus>,
        reply: oneshot::Sender<CollabResult<Vec<Conflict>>>,
    },
    /// Internal: a suggestion job finished (or failed/timed out)
    SuggestionsReady {
        job_id: String,
        kind: SuggestionRequestKind,
        result: Result<Vec<AiSuggestion>, CollabError>,
    },
    /// Internal: a resolution attempt finished (or failed/timed out)
    ResolutionReady {
        conflict_id: String,
        result: Result<AiResolution, CollabError>,
    },
    /// Internal: the teardown grace timer fired
    TeardownCheck { epoch: u64 },
}
