// sumomask-core/src/lib.rs
//! # sumomask Core Library
//!
//! `sumomask-core` provides the pure, stateless PII masking pipeline that
//! sanitizes Sumo Logic search results before they leave the system
//! boundary. It defines the pipeline configuration, compiles stages into
//! efficient regex batteries, and implements a pluggable `MaskingEngine`
//! trait over them.
//!
//! The pipeline applies redaction categories in a fixed order (email, card
//! numbers, SSNs, phone numbers, addresses), each stage scanning the text as
//! left by its predecessors. Ordering is load-bearing: card numbers and SSNs
//! are digit sequences that the looser phone battery would otherwise claim
//! first. The phone stage re-iterates to a fixed point and suppresses
//! candidates that sit inside URLs or fail a digit-count plausibility
//! window.
//!
//! ## Modules
//!
//! * `config`: Defines `MaskStage`s and `MaskConfig` for the ordered pipeline.
//! * `sanitizers`: Compiles stages into cached `CompiledStages`.
//! * `validators`: Positional and structural checks beyond regex matching.
//! * `mask_match`: Mask event records and PII-safe debug logging.
//! * `engine`: The `MaskingEngine` trait and JSON value helper.
//! * `engines`: Concrete engine implementations.
//! * `headless`: One-shot convenience wrappers.
//!
//! ## Usage Example
//!
//! ```rust
//! use sumomask_core::mask_with_default_rules;
//!
//! let masked = mask_with_default_rules("call 800-555-1234 or mail a@example.com")?;
//! assert_eq!(masked, "call [PHONE REDACTED] or mail [EMAIL REDACTED]");
//! # anyhow::Ok(())
//! ```
//!
//! ## Design Principles
//!
//! * **Stateless:** masking is a pure function of its input; the only shared
//!   state is the read-only compiled-pattern cache.
//! * **Explicit ordering:** the stage list is the priority contract, not an
//!   emergent property of ad hoc replacements.
//! * **Degrades to identity:** no match means no change; the engine never
//!   fails on content.
//!
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod mask_match;
pub mod sanitizers;
pub mod validators;

/// Re-exports the public configuration types for the masking pipeline.
pub use config::{
    merge_stages, validate_stages, Category, DigitPlausibility, MaskConfig, MaskStage,
    MaskSummaryItem, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::MaskError;

/// Re-exports the core engine trait and JSON helper.
pub use engine::{mask_value, MaskingEngine};

/// Re-exports the concrete pipeline engine.
pub use engines::pipeline::PipelineEngine;

/// Re-exports mask event types and PII-safe logging helpers.
pub use mask_match::{canonical_sample_hash, redact_sensitive, MaskMatch};

/// Re-exports one-shot helpers for non-interactive use.
pub use headless::{mask_string, mask_with_default_rules};

/// Re-exports compiled stage types for advanced usage.
pub use sanitizers::compiler::{compile_stages, CompiledStage, CompiledStages};
