//! Shared Module
//!
//! This module contains the serializable domain types shared between the
//! coordinator and its clients: presence records, messages, suggestions,
//! conflicts, the outbound event contract, the error taxonomy, and the
//! recognized configuration options.

/// Collaborator presence types
pub mod collaborator;

/// Message data structure
pub mod message;

/// AI suggestion types
pub mod suggestion;

/// Conflict types
pub mod conflict;

/// Session event system
pub mod event;

/// Coordinator error types
pub mod error;

/// Coordinator configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use collaborator::{Collaborator, PresenceStatus, Role};
pub use config::{ConfigError, CoordinatorConfig};
pub use conflict::{Conflict, ConflictStatus, Resolution};
pub use error::{CollabError, CollabResult};
pub use event::SessionEvent;
pub use message::{Message, MessageKind, SYSTEM_SENDER};
pub use suggestion::{Suggestion, SuggestionCategory, SuggestionPriority, SuggestionStatus};
