//! Backend server modules
//!
//! The coordinator owns sessions; each session is an actor owning its
//! presence, chat log, suggestions, conflicts and subscriber list. The
//! HTTP layer (routes, middleware, error mapping) is a thin shell over
//! the coordinator.

pub mod ai;
pub mod broadcast;
pub mod chat;
pub mod conflicts;
pub mod coordinator;
pub mod error;
pub mod middleware;
pub mod presence;
pub mod routes;
pub mod server;
pub mod session;
pub mod suggestions;
