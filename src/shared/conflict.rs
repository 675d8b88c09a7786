/**
 * Conflict Types
 *
 * This module defines the Conflict record tracked by the conflict
 * resolution workflow. A conflict moves open -> resolving -> resolved;
 * a failed resolution attempt reverts it to open so it can be retried.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a conflict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStatus {
    /// Reported, awaiting resolution
    Open,
    /// A resolution attempt is in flight with the AI collaborator
    Resolving,
    /// Resolved (terminal)
    Resolved,
}

impl std::str::FromStr for ConflictStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(ConflictStatus::Open),
            "resolving" => Ok(ConflictStatus::Resolving),
            "resolved" => Ok(ConflictStatus::Resolved),
            _ => Err(()),
        }
    }
}

/// Resolution produced by the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    /// Human-readable resolution text
    pub text: String,
    /// Opaque structured resolution data
    pub data: serde_json::Value,
    /// When the resolution was committed
    pub resolved_at: DateTime<Utc>,
}

/// A reported instance of concurrent conflicting edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conflict {
    /// Unique id within the session
    pub id: String,
    /// Description of what conflicted
    pub description: String,
    /// Opaque event that triggered the report
    pub originating_event: serde_json::Value,
    /// Current workflow status
    pub status: ConflictStatus,
    /// Populated once resolved
    pub resolution: Option<Resolution>,
    /// When the conflict was reported
    pub reported_at: DateTime<Utc>,
}

impl Conflict {
    /// Create a new open conflict with a fresh id
    pub fn new(description: impl Into<String>, originating_event: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.into(),
            originating_event,
            status: ConflictStatus::Open,
            resolution: None,
            reported_at: Utc::now(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ConflictStatus::Resolved
    }
}
