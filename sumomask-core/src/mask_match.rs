// sumomask-core/src/mask_match.rs
//! Data structures and PII-safe logging utilities for individual mask
//! events.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Category;

lazy_static! {
    /// Initialized once to decide whether raw matched PII may appear in
    /// debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("SUMOMASK_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A single matched and masked span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskMatch {
    pub category: Category,
    /// Byte offsets into the text the pattern was scanned against.
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

/// Debug-logs a committed mask event without leaking the matched text.
pub fn log_mask_event(category: Category, original_sensitive_content: &str, replacement: &str) {
    debug!(
        "Masked '{}' match: Original='{}', Replacement='{}', Hash={}",
        category,
        get_loggable_content(original_sensitive_content),
        replacement,
        canonical_sample_hash(category.as_str(), original_sensitive_content)
    );
}

/// Debug-logs a candidate that a validator rejected.
pub fn log_suppressed_match(category: Category, original_sensitive_content: &str, reason: &str) {
    debug!(
        "Suppressed '{}' candidate ({}): '{}'",
        category,
        reason,
        get_loggable_content(original_sensitive_content)
    );
}

/// Stable hash of a matched snippet, usable in logs and reports in place of
/// the raw value. Normalizes case and interior whitespace first.
pub fn canonical_sample_hash(category_id: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(category_id.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
