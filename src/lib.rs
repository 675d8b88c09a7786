//! CollabHub: a collaboration session coordinator
//!
//! Real-time multi-user sessions with presence tracking, ordered event
//! broadcast, chat, AI-generated suggestions and an AI-assisted conflict
//! resolution workflow, exposed over HTTP + SSE.

pub mod backend;
pub mod shared;
