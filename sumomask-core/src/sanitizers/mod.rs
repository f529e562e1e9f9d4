//! Stage compilation for the masking pipeline.

pub mod compiler;
