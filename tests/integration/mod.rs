//! Integration tests

pub mod routes_test;
