//! Presence Registry
//!
//! Single source of truth for which collaborators are live in a session.

pub mod registry;

pub use registry::PresenceRegistry;
