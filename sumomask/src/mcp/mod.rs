// sumomask/src/mcp/mod.rs
//! Model Context Protocol server, line-delimited JSON-RPC over stdio.

pub mod protocol;
pub mod server;

pub use server::McpServer;
