/**
 * AI Collaborator Boundary
 *
 * This module defines the request/response contract with the external
 * generative-AI backend. The coordinator treats that backend as a black
 * box: given a prompt/context payload it asynchronously returns either
 * suggestion content or conflict-resolution content, and any non-success
 * outcome is uniform — there is no structured error taxonomy beyond
 * "succeeded" vs "failed".
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;

pub use http::HttpAiCollaborator;

/// Kind of suggestion a client may request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionRequestKind {
    /// Suggestions about how the collaborators work together
    CollaborationSuggestion,
    /// Suggestions about the live editing session
    RealtimeSuggestion,
    /// Analytical insights derived from session context
    InsightSuggestion,
}

impl SuggestionRequestKind {
    /// The suggestion category this request kind produces by default
    pub fn category(&self) -> crate::shared::SuggestionCategory {
        use crate::shared::SuggestionCategory;
        match self {
            SuggestionRequestKind::CollaborationSuggestion => SuggestionCategory::Collaboration,
            SuggestionRequestKind::RealtimeSuggestion => SuggestionCategory::Realtime,
            SuggestionRequestKind::InsightSuggestion => SuggestionCategory::Insight,
        }
    }

    /// Wire name of the request kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionRequestKind::CollaborationSuggestion => "collaboration-suggestion",
            SuggestionRequestKind::RealtimeSuggestion => "realtime-suggestion",
            SuggestionRequestKind::InsightSuggestion => "insight-suggestion",
        }
    }
}

/// A suggestion request sent to the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// The session the suggestions are for
    pub session_id: String,
    /// What kind of suggestions are wanted
    pub kind: SuggestionRequestKind,
    /// Opaque context assembled by the requesting client
    pub context: serde_json::Value,
}

/// A conflict-resolution request sent to the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// The session the conflict belongs to
    pub session_id: String,
    /// The conflict being resolved
    pub conflict: crate::shared::Conflict,
    /// Conflict history supplied by the resolving client
    pub history: serde_json::Value,
}

/// One suggestion proposed by the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiSuggestion {
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Priority assigned by the AI collaborator
    #[serde(default)]
    pub priority: crate::shared::SuggestionPriority,
    /// Opaque structured payload, passed through to clients
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// A conflict resolution produced by the AI collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiResolution {
    /// Human-readable resolution text
    pub resolution_text: String,
    /// Opaque structured resolution data
    #[serde(default)]
    pub resolution_data: serde_json::Value,
}

/// Uniform failure from the AI collaborator boundary
#[derive(Debug, Error, Clone)]
#[error("AI collaborator call failed: {0}")]
pub struct AiError(pub String);

impl AiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The external generative-AI backend, seen as a black-box function
///
/// Implementations must be safe to call from detached tasks; the
/// coordinator never invokes them on a session's serialized command path.
#[async_trait]
pub trait AiCollaborator: Send + Sync {
    /// Request zero or more suggestions for a session
    async fn suggest(&self, request: SuggestionRequest) -> Result<Vec<AiSuggestion>, AiError>;

    /// Request a resolution for a reported conflict
    async fn resolve(&self, request: ResolutionRequest) -> Result<AiResolution, AiError>;
}
