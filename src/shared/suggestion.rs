/**
 * AI Suggestion Types
 *
 * This module defines the Suggestion record produced by the AI collaborator
 * and tracked through its pending -> accepted/rejected lifecycle. Status
 * transitions are one-way: once a suggestion is terminal it stays terminal.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an AI suggestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    /// Suggestions about how the collaborators work together
    Collaboration,
    /// Suggestions about the live editing session itself
    Realtime,
    /// Analytical insights derived from session context
    Insight,
}

/// Priority assigned by the AI collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Low,
    Medium,
    High,
}

impl Default for SuggestionPriority {
    fn default() -> Self {
        SuggestionPriority::Medium
    }
}

/// Lifecycle status of a suggestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Awaiting an accept/reject decision
    Pending,
    /// Accepted (terminal)
    Accepted,
    /// Rejected (terminal)
    Rejected,
}

impl SuggestionStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

/// An AI-proposed improvement awaiting accept/reject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    /// Unique id within the session
    pub id: String,
    /// Category of the suggestion
    pub category: SuggestionCategory,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Priority assigned by the AI collaborator
    pub priority: SuggestionPriority,
    /// Opaque structured data from the AI collaborator
    pub payload: serde_json::Value,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Current lifecycle status
    pub status: SuggestionStatus,
}

impl Suggestion {
    /// Create a new pending suggestion with a fresh id
    pub fn new(
        category: SuggestionCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: SuggestionPriority,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            title: title.into(),
            description: description.into(),
            priority,
            payload,
            created_at: Utc::now(),
            status: SuggestionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }
}
