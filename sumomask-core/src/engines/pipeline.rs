// sumomask-core/src/engines/pipeline.rs
//! The ordered masking pipeline: a `MaskingEngine` implementation that
//! applies category stages in sequence over the evolving text.
//!
//! Ordering is the crux of correctness. Card numbers and SSNs are digit
//! sequences that looser phone patterns would otherwise claim first, so
//! higher-priority stages commit their placeholders before more permissive
//! scanners run. The phone stage additionally re-iterates its whole battery
//! until a pass changes nothing: overlapping patterns can partially match a
//! number and only resolve fully once neighboring text has been rewritten.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use regex::{Match, Regex};
use std::sync::Arc;

use crate::config::{MaskConfig, MaskSummaryItem};
use crate::engine::MaskingEngine;
use crate::mask_match::{log_mask_event, log_suppressed_match, MaskMatch};
use crate::sanitizers::compiler::{get_or_compile_stages, CompiledStage, CompiledStages};
use crate::validators;

#[derive(Debug)]
pub struct PipelineEngine {
    compiled_stages: Arc<CompiledStages>,
    config: MaskConfig,
}

impl PipelineEngine {
    pub fn new(config: MaskConfig) -> Result<Self> {
        let compiled_stages = get_or_compile_stages(&config)
            .context("Failed to compile mask stages for PipelineEngine")?;

        Ok(Self {
            compiled_stages,
            config,
        })
    }

    /// Runs a stage's validators against one candidate match.
    ///
    /// `text` is the string the pattern was scanned against, so the URL
    /// check sees the exact prefix in front of the candidate even after
    /// earlier replacements shifted positions.
    fn accepts(stage: &CompiledStage, text: &str, m: &Match) -> bool {
        if stage.skip_inside_urls && validators::is_inside_url(text, m.start()) {
            log_suppressed_match(stage.category, m.as_str(), "inside URL");
            return false;
        }
        if let Some(filter) = stage.digit_plausibility {
            if !validators::is_plausible_digit_count(m.as_str(), filter.min, filter.max) {
                log_suppressed_match(stage.category, m.as_str(), "digit count out of range");
                return false;
            }
        }
        true
    }

    /// Applies one pattern over `text`, replacing accepted matches with the
    /// stage placeholder. Rejected candidates are emitted untouched.
    fn apply_pattern(
        stage: &CompiledStage,
        regex: &Regex,
        text: &str,
        matches: &mut Vec<MaskMatch>,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last_end = 0usize;

        for m in regex.find_iter(text) {
            if !Self::accepts(stage, text, &m) {
                continue;
            }
            out.push_str(&text[last_end..m.start()]);
            out.push_str(&stage.replace_with);
            last_end = m.end();

            log_mask_event(stage.category, m.as_str(), &stage.replace_with);
            matches.push(MaskMatch {
                category: stage.category,
                start: m.start(),
                end: m.end(),
                replacement: stage.replace_with.clone(),
            });
        }
        out.push_str(&text[last_end..]);
        out
    }

    /// One full pass of a stage: every pattern in order, each scanning the
    /// text as left by its predecessor.
    fn apply_stage(stage: &CompiledStage, text: &str, matches: &mut Vec<MaskMatch>) -> String {
        let mut current = text.to_string();
        for regex in &stage.regexes {
            current = Self::apply_pattern(stage, regex, &current, matches);
        }
        current
    }

    fn run(&self, content: &str, matches: &mut Vec<MaskMatch>) -> String {
        if content.is_empty() {
            return String::new();
        }

        let mut masked = content.to_string();
        for stage in &self.compiled_stages.stages {
            if stage.repeat_until_stable {
                // Fixed-point iteration: a stable pass commits nothing, so
                // this terminates as soon as the battery stops finding work.
                loop {
                    let next = Self::apply_stage(stage, &masked, matches);
                    if next == masked {
                        break;
                    }
                    masked = next;
                }
            } else {
                masked = Self::apply_stage(stage, &masked, matches);
            }
        }
        masked
    }
}

impl MaskingEngine for PipelineEngine {
    fn mask(&self, content: &str) -> String {
        let mut matches = Vec::new();
        self.run(content, &mut matches)
    }

    fn analyze(&self, content: &str) -> Vec<MaskSummaryItem> {
        let mut matches = Vec::new();
        let _ = self.run(content, &mut matches);

        let mut summary = Vec::new();
        for stage in &self.compiled_stages.stages {
            let occurrences = matches
                .iter()
                .filter(|m| m.category == stage.category)
                .count();
            if occurrences > 0 {
                summary.push(MaskSummaryItem {
                    category: stage.category,
                    occurrences,
                });
            }
        }
        summary
    }

    fn compiled_stages(&self) -> &CompiledStages {
        &self.compiled_stages
    }

    fn get_config(&self) -> &MaskConfig {
        &self.config
    }
}
