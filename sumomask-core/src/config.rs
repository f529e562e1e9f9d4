//! Configuration management for `sumomask-core`.
//!
//! Defines the ordered masking pipeline: a list of stages, one per redaction
//! category, each carrying its pattern battery and placeholder. Handles
//! loading the embedded default pipeline, loading user overrides from YAML,
//! and validating the result before compilation.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Maximum allowed length for a single pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The redaction categories, in no particular order. Application order is
/// carried by the stage list, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Email,
    CardNumber,
    Ssn,
    Phone,
    Address,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Email => "email",
            Category::CardNumber => "card_number",
            Category::Ssn => "ssn",
            Category::Phone => "phone",
            Category::Address => "address",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digit-count plausibility filter applied to candidate matches after
/// stripping every non-digit character. A normalized range check, not a
/// strict format validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DigitPlausibility {
    pub min: usize,
    pub max: usize,
}

/// A single stage of the masking pipeline.
///
/// Patterns within a stage apply in declared order, each scanning the text
/// as left by its predecessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskStage {
    /// The redaction category this stage detects.
    pub category: Category,
    /// Human-readable description of what the stage targets.
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered regex pattern battery.
    pub patterns: Vec<String>,
    /// The placeholder substituted for every accepted match.
    pub replace_with: String,
    /// If true, the whole battery repeats until a pass changes nothing.
    #[serde(default)]
    pub repeat_until_stable: bool,
    /// If true, matches preceded by an unterminated URL scheme are skipped.
    #[serde(default)]
    pub skip_inside_urls: bool,
    /// Optional digit-count filter for candidate matches.
    #[serde(default)]
    pub digit_plausibility: Option<DigitPlausibility>,
    /// Explicit override for enabling/disabling the stage.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// The top-level masking pipeline configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Pipeline stages, applied in order.
    pub stages: Vec<MaskStage>,
}

/// Per-category occurrence summary produced by `MaskingEngine::analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSummaryItem {
    pub category: Category,
    pub occurrences: usize,
}

impl MaskConfig {
    /// Loads a masking pipeline from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom mask stages from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MaskConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_stages(&config.stages)?;
        info!("Loaded {} stages from file {}.", config.stages.len(), path.display());

        Ok(config)
    }

    /// Loads the default pipeline from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default mask stages from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: MaskConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default mask stages")?;

        debug!("Loaded {} default stages.", config.stages.len());
        Ok(config)
    }
}

/// Merges a user pipeline over the defaults.
///
/// A user stage for a category already present replaces that stage in place,
/// keeping the default application order. Stages for new categories are
/// appended after the defaults.
pub fn merge_stages(default_config: MaskConfig, user_config: Option<MaskConfig>) -> MaskConfig {
    let mut stages = default_config.stages;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user stages.", user_cfg.stages.len());
        for user_stage in user_cfg.stages {
            match stages.iter_mut().find(|s| s.category == user_stage.category) {
                Some(existing) => *existing = user_stage,
                None => stages.push(user_stage),
            }
        }
    }

    MaskConfig { stages }
}

/// Validates stage integrity: unique categories, compilable patterns within
/// the length cap, and sane digit filters.
pub fn validate_stages(stages: &[MaskStage]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for stage in stages {
        if !seen.insert(stage.category) {
            errors.push(format!("Duplicate stage for category '{}'.", stage.category));
        }

        if stage.patterns.is_empty() {
            errors.push(format!("Stage '{}' has an empty pattern list.", stage.category));
        }

        if stage.replace_with.is_empty() {
            warn!("Stage '{}' has an empty `replace_with`; matches will be deleted.", stage.category);
        }

        for pattern in &stage.patterns {
            if pattern.is_empty() {
                errors.push(format!("Stage '{}' contains an empty pattern.", stage.category));
                continue;
            }
            if pattern.len() > MAX_PATTERN_LENGTH {
                errors.push(format!(
                    "Stage '{}': pattern length ({}) exceeds maximum allowed ({}).",
                    stage.category,
                    pattern.len(),
                    MAX_PATTERN_LENGTH
                ));
                continue;
            }
            if let Err(e) = Regex::new(pattern) {
                errors.push(format!("Stage '{}' has an invalid pattern: {}", stage.category, e));
            }
        }

        if let Some(filter) = &stage.digit_plausibility {
            if filter.min == 0 || filter.min > filter.max {
                errors.push(format!(
                    "Stage '{}': digit_plausibility range [{}, {}] is invalid.",
                    stage.category, filter.min, filter.max
                ));
            }
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Stage validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(category: Category, patterns: &[&str]) -> MaskStage {
        MaskStage {
            category,
            description: None,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            replace_with: "[REDACTED]".to_string(),
            repeat_until_stable: false,
            skip_inside_urls: false,
            digit_plausibility: None,
            enabled: None,
        }
    }

    #[test]
    fn default_rules_load_and_validate() {
        let config = MaskConfig::load_default_rules().unwrap();
        assert_eq!(config.stages.len(), 5);
        validate_stages(&config.stages).unwrap();

        let order: Vec<Category> = config.stages.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Email,
                Category::CardNumber,
                Category::Ssn,
                Category::Phone,
                Category::Address
            ]
        );
    }

    #[test]
    fn default_phone_stage_is_fixed_point_with_filter() {
        let config = MaskConfig::load_default_rules().unwrap();
        let phone = config
            .stages
            .iter()
            .find(|s| s.category == Category::Phone)
            .unwrap();
        assert!(phone.repeat_until_stable);
        assert!(phone.skip_inside_urls);
        assert_eq!(phone.digit_plausibility, Some(DigitPlausibility { min: 7, max: 15 }));
    }

    #[test]
    fn validation_rejects_duplicate_categories() {
        let stages = vec![stage(Category::Email, &["a"]), stage(Category::Email, &["b"])];
        let err = validate_stages(&stages).unwrap_err().to_string();
        assert!(err.contains("Duplicate stage"));
    }

    #[test]
    fn validation_rejects_bad_regex() {
        let stages = vec![stage(Category::Phone, &["(unclosed"])];
        assert!(validate_stages(&stages).is_err());
    }

    #[test]
    fn validation_rejects_oversized_pattern() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let stages = vec![stage(Category::Email, &[long.as_str()])];
        let err = validate_stages(&stages).unwrap_err().to_string();
        assert!(err.contains("exceeds maximum"));
    }

    #[test]
    fn merge_replaces_in_place_and_appends() {
        let defaults = MaskConfig {
            stages: vec![stage(Category::Email, &["x"]), stage(Category::Phone, &["y"])],
        };
        let mut custom_email = stage(Category::Email, &["z"]);
        custom_email.replace_with = "[E]".to_string();
        let user = MaskConfig {
            stages: vec![custom_email, stage(Category::Address, &["w"])],
        };

        let merged = merge_stages(defaults, Some(user));
        assert_eq!(merged.stages.len(), 3);
        assert_eq!(merged.stages[0].category, Category::Email);
        assert_eq!(merged.stages[0].replace_with, "[E]");
        assert_eq!(merged.stages[1].category, Category::Phone);
        assert_eq!(merged.stages[2].category, Category::Address);
    }

    #[test]
    fn merge_without_user_config_is_identity() {
        let defaults = MaskConfig::load_default_rules().unwrap();
        let merged = merge_stages(defaults.clone(), None);
        assert_eq!(merged, defaults);
    }
}
