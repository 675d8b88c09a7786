//! HTTP route configuration

pub mod router;
pub mod session_routes;

pub use router::create_router;
