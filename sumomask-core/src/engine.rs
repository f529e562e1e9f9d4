// sumomask-core/src/engine.rs
//! Defines the core MaskingEngine trait and related helpers.
//!
//! The `MaskingEngine` trait provides a pluggable interface for masking
//! implementations, decoupling callers (the search orchestrator, tests)
//! from the concrete pipeline.
//!
//! License: MIT OR Apache-2.0

use serde_json::Value;

use crate::config::{MaskConfig, MaskSummaryItem};
use crate::sanitizers::compiler::CompiledStages;

/// A trait that defines the core functionality of a masking engine.
pub trait MaskingEngine: Send + Sync {
    /// Masks every detected sensitive span in `content` and returns the
    /// transformed string.
    ///
    /// Pure with respect to its input: no side effects, never fails.
    /// Unrecognized or partial matches are left as-is.
    fn mask(&self, content: &str) -> String;

    /// Scans `content` and reports per-category occurrence counts without
    /// producing masked output.
    fn analyze(&self, content: &str) -> Vec<MaskSummaryItem>;

    /// Returns the compiled pipeline used by the engine.
    fn compiled_stages(&self) -> &CompiledStages;

    /// Returns the engine's configuration.
    fn get_config(&self) -> &MaskConfig;
}

/// Applies the engine to a JSON value: strings are masked, every other
/// value type passes through unchanged.
///
/// Identity on non-text values is an invariant, not an error.
pub fn mask_value(engine: &dyn MaskingEngine, value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(engine.mask(&s)),
        other => other,
    }
}
