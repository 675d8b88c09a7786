//! Per-Session Execution Context
//!
//! Each live session is an actor: a single task owning that session's
//! presence registry, message log, suggestion store, conflict board and
//! subscriber list, fed by one FIFO command queue. Serializing all
//! mutations through that queue is what provides the ordering guarantees:
//! per-session FIFO event delivery, linearizable presence, and
//! at-most-once-effective status transitions.
//!
//! The only long-latency work — AI collaborator calls — runs on detached
//! tasks and re-enters the queue as internal commands, so a slow AI call
//! never stalls chat delivery or presence updates.

pub mod actor;
pub mod command;
pub mod handle;

pub(crate) use actor::SessionActor;
pub use command::{Connected, SuggestionJob};
pub use handle::{ConnectionHandle, SessionHandle};
