//! errors.rs - Custom error types for the sumomask-core library.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// All error types surfaced by `sumomask-core`.
///
/// `#[non_exhaustive]` signals that new variants may be added without a
/// breaking change.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MaskError {
    #[error("Failed to compile pattern for stage '{0}': {1}")]
    StageCompilationError(String, regex::Error),

    #[error("Stage '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
