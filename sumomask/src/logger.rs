// sumomask/src/logger.rs
//! Logger initialization.
//!
//! stdout is reserved for MCP protocol frames, so all logging goes to
//! stderr.

use env_logger::{Env, Target};
use log::LevelFilter;

/// Initializes the process logger. `RUST_LOG` overrides the default level;
/// `quiet` suppresses logging entirely.
pub fn init_logger(quiet: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stderr);
    if quiet {
        builder.filter_level(LevelFilter::Off);
    }
    builder.try_init().ok();
}
