//! Coordinator Error Types
//!
//! This module defines the error taxonomy used throughout the coordinator.
//! All failures reported to a calling connection fall into one of five
//! kinds; none of them is fatal to the process, and a failure affecting one
//! session never blocks or crashes another.
//!
//! # Error Kinds
//!
//! - `NotFound` - unknown session/suggestion/conflict/collaborator
//! - `Forbidden` - role-insufficient action
//! - `AlreadyInFlight` - duplicate concurrent conflict resolution
//! - `Upstream` - the AI collaborator call failed or timed out
//! - `Invalid` - malformed inbound event
//!
//! # Propagation
//!
//! `NotFound`/`Forbidden`/`Invalid`/`AlreadyInFlight` are reported to the
//! calling connection only. `Upstream` is additionally broadcast to the
//! session as a system message, since the failure is of shared interest.
use thiserror::Error;

use crate::shared::collaborator::Role;

/// Convenience alias used across the coordinator
pub type CollabResult<T> = Result<T, CollabError>;

/// Errors reported by the collaboration session coordinator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollabError {
    /// Unknown session, suggestion, conflict or collaborator
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up
        entity: &'static str,
        /// The id that was not found
        id: String,
    },

    /// The caller's role does not permit the action
    #[error("role '{role}' may not {action}")]
    Forbidden {
        /// The action that was attempted
        action: &'static str,
        /// The caller's role
        role: Role,
    },

    /// A resolution attempt is already in flight for this conflict
    #[error("a resolution is already in flight for conflict {conflict_id}")]
    AlreadyInFlight {
        /// The contested conflict id
        conflict_id: String,
    },

    /// The AI collaborator call failed or timed out
    #[error("upstream AI collaborator failure: {message}")]
    Upstream {
        /// Human-readable failure description
        message: String,
    },

    /// Malformed inbound event
    #[error("invalid request: {message}")]
    Invalid {
        /// Human-readable description of what was malformed
        message: String,
    },
}

impl CollabError {
    /// Create a new not-found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(action: &'static str, role: Role) -> Self {
        Self::Forbidden { action, role }
    }

    /// Create a new already-in-flight error
    pub fn already_in_flight(conflict_id: impl Into<String>) -> Self {
        Self::AlreadyInFlight {
            conflict_id: conflict_id.into(),
        }
    }

    /// Create a new upstream failure error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new invalid-request error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
