//! Property-based tests

pub mod log_proptest;
pub mod presence_proptest;
