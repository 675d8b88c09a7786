/**
 * Collaborator Presence Types
 *
 * This module defines the Collaborator record and its supporting enums.
 * A Collaborator is one user's live presence entry within a session.
 * The Presence Registry is the single source of truth for these records;
 * everything else in the system only ever sees snapshots.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a collaborator holds within a session
///
/// Roles gate mutation: `owner` and `editor` may accept/reject suggestions
/// and resolve conflicts, `viewer` may only observe, chat, report conflicts
/// and request suggestions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Session owner, full mutation rights
    Owner,
    /// Editor, may mutate content and resolve conflicts
    Editor,
    /// Read-only participant (may still chat)
    Viewer,
}

impl Role {
    /// Whether this role may accept/reject suggestions and resolve conflicts
    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Owner | Role::Editor)
    }

    /// Stable string form, matching the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            _ => Err(()),
        }
    }
}

/// Connection status of a collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Actively connected
    Online,
    /// Connected but idle
    Away,
    /// Marked offline (entry retained until leave)
    Offline,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Away => "away",
            PresenceStatus::Offline => "offline",
        }
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(PresenceStatus::Online),
            "away" => Ok(PresenceStatus::Away),
            "offline" => Ok(PresenceStatus::Offline),
            _ => Err(()),
        }
    }
}

/// One user's live presence record within a session
///
/// A single user holds at most one Collaborator entry per session;
/// reconnection replaces the existing entry rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collaborator {
    /// Opaque user identifier, stable per user
    pub user_id: String,
    /// Display name
    pub user_name: String,
    /// Role within the session
    pub role: Role,
    /// Current connection status
    pub status: PresenceStatus,
    /// When the collaborator last did anything observable
    pub last_active: DateTime<Utc>,
}

impl Collaborator {
    /// Create a new online collaborator with `last_active` set to now
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            role,
            status: PresenceStatus::Online,
            last_active: Utc::now(),
        }
    }

    /// Refresh the activity timestamp
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}
