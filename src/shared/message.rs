/**
 * Message Data Structure
 *
 * This module defines the Message struct used for chat messages and
 * system-level notices within a session. Messages are immutable once
 * created and live only as long as the session's in-memory log.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved sender id used for system-level notices
pub const SYSTEM_SENDER: &str = "system";

/// Kind of message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Regular user chat message
    Chat,
    /// Coordinator-generated notice (join/leave/resolution/failure)
    System,
}

/// Represents a single message within a session
///
/// Ids are assigned monotonically per session, so two collaborators
/// observing the same message always see the same id. Messages are never
/// mutated after creation.
///
/// # Example
/// ```rust
/// use collabhub::shared::message::Message;
///
/// let message = Message::chat(1, "u1", "Alice", "Hello, world!");
/// assert_eq!(message.body, "Hello, world!");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Monotonically assigned per-session id
    pub id: u64,
    /// User id of the sender, or `system`
    pub sender_id: String,
    /// Display name of the sender
    pub sender_name: String,
    /// Message text
    pub body: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Chat or system notice
    pub kind: MessageKind,
}

impl Message {
    /// Create a new chat message with the current timestamp
    pub fn chat(
        id: u64,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            body: body.into(),
            timestamp: Utc::now(),
            kind: MessageKind::Chat,
        }
    }

    /// Create a system notice with the reserved sender id
    pub fn system(id: u64, body: impl Into<String>) -> Self {
        Self {
            id,
            sender_id: SYSTEM_SENDER.to_string(),
            sender_name: SYSTEM_SENDER.to_string(),
            body: body.into(),
            timestamp: Utc::now(),
            kind: MessageKind::System,
        }
    }

    /// Whether this is a system notice
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }
}
