//! Chat state for a session
//!
//! The bounded, in-memory message log. History is session-scoped; there is
//! no external persistence.

pub mod log;

pub use log::MessageLog;
