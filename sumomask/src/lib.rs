// sumomask/src/lib.rs
//! MCP server binary crate for masked Sumo Logic search.
//!
//! The library surface exists for the integration tests; the binary in
//! `main.rs` is the real entry point.

pub mod config;
pub mod logger;
pub mod mcp;
pub mod search;
pub mod sumologic;
