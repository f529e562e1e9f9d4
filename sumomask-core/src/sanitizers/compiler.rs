//! compiler.rs - Manages the compilation and caching of mask stages.
//!
//! Converts a `MaskConfig` into `CompiledStages` optimized for repeated
//! application. A global, shared cache avoids recompiling the same pipeline
//! for every engine instance.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{Category, DigitPlausibility, MaskConfig, MaskStage, MAX_PATTERN_LENGTH};
use crate::errors::MaskError;

/// A single pipeline stage with its pattern battery compiled.
#[derive(Debug)]
pub struct CompiledStage {
    /// The redaction category this stage detects.
    pub category: Category,
    /// Compiled patterns, in application order.
    pub regexes: Vec<Regex>,
    /// Placeholder substituted for accepted matches.
    pub replace_with: String,
    /// Repeat the battery until a pass changes nothing.
    pub repeat_until_stable: bool,
    /// Skip matches that sit inside an URL path or query.
    pub skip_inside_urls: bool,
    /// Optional stripped-digit-count filter.
    pub digit_plausibility: Option<DigitPlausibility>,
}

/// The full compiled pipeline, in application order.
#[derive(Debug)]
pub struct CompiledStages {
    pub stages: Vec<CompiledStage>,
}

lazy_static! {
    /// Thread-safe, global cache of compiled pipelines, keyed by a hash of
    /// the configuration.
    static ref COMPILED_STAGES_CACHE: RwLock<HashMap<u64, Arc<CompiledStages>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the `MaskConfig` to create a stable cache key.
///
/// Stage order is semantic here, so stages are hashed as declared, not
/// sorted.
fn hash_config(config: &MaskConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.stages.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `MaskStage`s. Disabled stages are dropped here.
pub fn compile_stages(stages_to_compile: Vec<MaskStage>) -> Result<CompiledStages, MaskError> {
    debug!("Starting compilation of {} stages.", stages_to_compile.len());

    let mut compiled_stages = Vec::new();
    let mut compilation_errors: Vec<MaskError> = Vec::new();

    for stage in stages_to_compile {
        if let Some(false) = stage.enabled {
            warn!("Skipping disabled stage '{}'.", stage.category);
            continue;
        }

        let mut regexes = Vec::with_capacity(stage.patterns.len());
        for pattern in &stage.patterns {
            if pattern.len() > MAX_PATTERN_LENGTH {
                compilation_errors.push(MaskError::PatternLengthExceeded(
                    stage.category.to_string(),
                    pattern.len(),
                    MAX_PATTERN_LENGTH,
                ));
                continue;
            }

            match RegexBuilder::new(pattern)
                .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
                .build()
            {
                Ok(regex) => regexes.push(regex),
                Err(e) => {
                    compilation_errors
                        .push(MaskError::StageCompilationError(stage.category.to_string(), e));
                }
            }
        }

        debug!(
            "Stage '{}' compiled with {} pattern(s).",
            stage.category,
            regexes.len()
        );
        compiled_stages.push(CompiledStage {
            category: stage.category,
            regexes,
            replace_with: stage.replace_with,
            repeat_until_stable: stage.repeat_until_stable,
            skip_inside_urls: stage.skip_inside_urls,
            digit_plausibility: stage.digit_plausibility,
        });
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(MaskError::Fatal(format!(
            "Failed to compile {} pattern(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling pipeline. Total stages: {}.", compiled_stages.len());
        Ok(CompiledStages { stages: compiled_stages })
    }
}

/// Gets a `CompiledStages` instance from the cache, compiling on a miss.
///
/// Returns an `Arc` so compiled pipelines are shared cheaply between engine
/// instances.
pub fn get_or_compile_stages(config: &MaskConfig) -> Result<Arc<CompiledStages>> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_STAGES_CACHE.read().unwrap();
        if let Some(stages) = cache.get(&cache_key) {
            debug!("Serving compiled stages from cache for key: {}", &cache_key);
            return Ok(Arc::clone(stages));
        }
    } // Read lock is released here.

    debug!("Compiled stages not found in cache. Compiling now.");
    let compiled = compile_stages(config.stages.clone())?;
    let compiled_arc = Arc::new(compiled);

    COMPILED_STAGES_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled_arc));

    Ok(compiled_arc)
}
