//! Rulepack HTTP Server Library
//!
//! Serves loaded rules and rule packs as YAML documents. Exposed as a library
//! so the router and lifecycle can be driven from tests.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
