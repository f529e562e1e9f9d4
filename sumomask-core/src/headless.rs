// sumomask-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot masking without constructing an engine
//! by hand.

use anyhow::Result;

use crate::config::MaskConfig;
use crate::engine::MaskingEngine;
use crate::engines::pipeline::PipelineEngine;

/// Masks `content` with the given pipeline configuration.
///
/// Compilation is cached globally, so calling this repeatedly with the same
/// configuration does not recompile the patterns.
pub fn mask_string(config: MaskConfig, content: &str) -> Result<String> {
    let engine = PipelineEngine::new(config)?;
    Ok(engine.mask(content))
}

/// Masks `content` with the embedded default pipeline.
pub fn mask_with_default_rules(content: &str) -> Result<String> {
    mask_string(MaskConfig::load_default_rules()?, content)
}
