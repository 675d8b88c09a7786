/**
 * Session Event System
 *
 * This module defines the outbound event-stream contract: every event a
 * connection can observe from a session. Events are broadcast to all
 * currently-registered connections of a session in strict submission order.
 */
use serde::{Deserialize, Serialize};

use crate::shared::collaborator::Collaborator;
use crate::shared::conflict::Conflict;
use crate::shared::message::Message;
use crate::shared::suggestion::Suggestion;

/// An event delivered to every connection subscribed to a session
///
/// The serialized form uses kebab-case tags so clients see the same event
/// names the protocol documents: `presence-changed`, `message`,
/// `suggestion-created`, `suggestion-updated`, `conflict-detected`,
/// `conflict-resolved`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The set of live collaborators changed (join/leave/status)
    PresenceChanged { collaborators: Vec<Collaborator> },
    /// A chat or system message was appended to the session log
    Message { message: Message },
    /// The AI collaborator produced a new pending suggestion
    SuggestionCreated { suggestion: Suggestion },
    /// A suggestion transitioned to a terminal status
    SuggestionUpdated { suggestion: Suggestion },
    /// A conflict was reported
    ConflictDetected { conflict: Conflict },
    /// A conflict was resolved by the AI collaborator
    ConflictResolved { conflict: Conflict },
}

impl SessionEvent {
    /// Create a presence-changed event from a registry snapshot
    pub fn presence_changed(collaborators: Vec<Collaborator>) -> Self {
        SessionEvent::PresenceChanged { collaborators }
    }

    /// Create a message event
    pub fn message(message: Message) -> Self {
        SessionEvent::Message { message }
    }

    /// Create a suggestion-created event
    pub fn suggestion_created(suggestion: Suggestion) -> Self {
        SessionEvent::SuggestionCreated { suggestion }
    }

    /// Create a suggestion-updated event
    pub fn suggestion_updated(suggestion: Suggestion) -> Self {
        SessionEvent::SuggestionUpdated { suggestion }
    }

    /// Create a conflict-detected event
    pub fn conflict_detected(conflict: Conflict) -> Self {
        SessionEvent::ConflictDetected { conflict }
    }

    /// Create a conflict-resolved event
    pub fn conflict_resolved(conflict: Conflict) -> Self {
        SessionEvent::ConflictResolved { conflict }
    }

    /// Wire name of the event, used as the SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::PresenceChanged { .. } => "presence-changed",
            SessionEvent::Message { .. } => "message",
            SessionEvent::SuggestionCreated { .. } => "suggestion-created",
            SessionEvent::SuggestionUpdated { .. } => "suggestion-updated",
            SessionEvent::ConflictDetected { .. } => "conflict-detected",
            SessionEvent::ConflictResolved { .. } => "conflict-resolved",
        }
    }
}
