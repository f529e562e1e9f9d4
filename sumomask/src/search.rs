// sumomask/src/search.rs
//! Search orchestration: create a job, poll it to completion, fetch one
//! page of messages, mask them, and clean the job up.
//!
//! Failures anywhere in that sequence are logged and collapsed into an
//! empty result. The caller always gets a well-formed message list and
//! never sees raw upstream errors, which could quote unmasked log content.

use anyhow::{bail, Result};
use chrono::{Duration, SecondsFormat, Utc};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;

use sumomask_core::{mask_value, MaskingEngine};

use crate::config::ENV_TIME_ZONE;
use crate::sumologic::types::{SearchJobRequest, STATE_CANCELLED, STATE_DONE};
use crate::sumologic::{SumoClient, DEFAULT_MESSAGE_LIMIT};

/// Interval between job status polls.
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Message fields that carry log content and therefore get masked.
const MASKED_FIELDS: &[&str] = &["_raw", "response"];

/// Caller-supplied search parameters, with everything but the query optional.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub time_zone: Option<String>,
}

/// Masked search output, shaped for direct serialization into a tool reply.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub messages: Vec<Value>,
}

/// Resolved absolute time range for a search job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    /// Fills in missing bounds with the last 24 hours, ending now.
    pub fn resolve(from: Option<String>, to: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            from: from.unwrap_or_else(|| {
                (now - Duration::hours(24)).to_rfc3339_opts(SecondsFormat::Secs, true)
            }),
            to: to.unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Picks the search timezone: explicit parameter, then the `SUMO_TIME_ZONE`
/// environment variable, then UTC.
pub fn resolve_time_zone(requested: Option<String>) -> String {
    requested
        .filter(|tz| !tz.trim().is_empty())
        .or_else(|| std::env::var(ENV_TIME_ZONE).ok().filter(|tz| !tz.trim().is_empty()))
        .unwrap_or_else(|| "UTC".to_string())
}

/// Runs a search end to end and masks every message before returning it.
/// Errors are swallowed into an empty result.
pub async fn search(
    client: &SumoClient,
    engine: &dyn MaskingEngine,
    request: SearchRequest,
) -> SearchResult {
    match run_search(client, engine, request).await {
        Ok(result) => result,
        Err(e) => {
            error!("Search failed, returning empty result: {e:#}");
            SearchResult { messages: vec![] }
        }
    }
}

async fn run_search(
    client: &SumoClient,
    engine: &dyn MaskingEngine,
    request: SearchRequest,
) -> Result<SearchResult> {
    let range = TimeRange::resolve(request.from, request.to);
    let job_request = SearchJobRequest {
        query: request.query,
        from: range.from,
        to: range.to,
        time_zone: resolve_time_zone(request.time_zone),
    };

    let job_id = client.create_job(&job_request).await?;
    let status = wait_for_completion(client, &job_id).await?;
    info!(
        "Search job {job_id} finished with {} messages",
        status.message_count
    );

    let page = client.messages(&job_id, 0, DEFAULT_MESSAGE_LIMIT).await?;
    let messages = page
        .messages
        .into_iter()
        .map(|message| sanitize_message(engine, message))
        .collect();

    if let Err(e) = client.delete_job(&job_id).await {
        warn!("Failed to delete search job {job_id}: {e:#}");
    }

    Ok(SearchResult { messages })
}

async fn wait_for_completion(
    client: &SumoClient,
    job_id: &str,
) -> Result<crate::sumologic::SearchJobStatus> {
    loop {
        let status = client.job_status(job_id).await?;
        match status.state.as_str() {
            STATE_DONE => return Ok(status),
            STATE_CANCELLED => bail!("Search job {job_id} was cancelled"),
            _ => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }
}

/// Masks the content-bearing fields of one message in place.
///
/// Sumo Logic messages nest the log fields under a `map` object; both that
/// nesting and a flat layout are handled. Non-object messages pass through
/// whole-value masking.
pub fn sanitize_message(engine: &dyn MaskingEngine, mut message: Value) -> Value {
    match message {
        Value::Object(ref mut fields) => {
            for field in MASKED_FIELDS {
                if let Some(value) = fields.get(*field) {
                    let masked = mask_value(engine, value.clone());
                    fields.insert((*field).to_string(), masked);
                }
            }
            if let Some(Value::Object(inner)) = fields.get_mut("map") {
                for field in MASKED_FIELDS {
                    if let Some(value) = inner.get(*field) {
                        let masked = mask_value(engine, value.clone());
                        inner.insert((*field).to_string(), masked);
                    }
                }
            }
            message
        }
        other => mask_value(engine, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use serde_json::json;
    use sumomask_core::{MaskConfig, PipelineEngine};

    fn engine() -> PipelineEngine {
        let config = MaskConfig::load_default_rules()
            .context("default rules")
            .unwrap();
        PipelineEngine::new(config).unwrap()
    }

    #[test]
    fn resolve_defaults_to_last_24_hours() {
        let range = TimeRange::resolve(None, None);
        let from: chrono::DateTime<Utc> = range.from.parse().unwrap();
        let to: chrono::DateTime<Utc> = range.to.parse().unwrap();
        assert_eq!(to - from, Duration::hours(24));
    }

    #[test]
    fn resolve_keeps_explicit_bounds() {
        let range = TimeRange::resolve(
            Some("2026-08-01T00:00:00Z".into()),
            Some("2026-08-02T00:00:00Z".into()),
        );
        assert_eq!(range.from, "2026-08-01T00:00:00Z");
        assert_eq!(range.to, "2026-08-02T00:00:00Z");
    }

    #[test]
    fn explicit_time_zone_wins() {
        assert_eq!(
            resolve_time_zone(Some("Europe/London".into())),
            "Europe/London"
        );
        assert_eq!(resolve_time_zone(Some("  ".into())), "UTC");
    }

    #[test]
    fn sanitize_masks_raw_inside_map() {
        let message = json!({
            "map": {
                "_raw": "user jane@corp.example logged in",
                "_messagetime": "1724990000000"
            }
        });
        let masked = sanitize_message(&engine(), message);
        assert_eq!(masked["map"]["_raw"], "user [EMAIL REDACTED] logged in");
        assert_eq!(masked["map"]["_messagetime"], "1724990000000");
    }

    #[test]
    fn sanitize_masks_flat_fields() {
        let message = json!({
            "_raw": "call 800-555-1234",
            "response": "card 4111222233334444 declined",
            "host": "web-01"
        });
        let masked = sanitize_message(&engine(), message);
        assert_eq!(masked["_raw"], "call [PHONE REDACTED]");
        assert_eq!(masked["response"], "card [CARD NUMBER REDACTED] declined");
        assert_eq!(masked["host"], "web-01");
    }

    #[test]
    fn sanitize_masks_bare_string_messages() {
        let masked = sanitize_message(&engine(), json!("ssn 123-45-6789"));
        assert_eq!(masked, json!("ssn [SSN REDACTED]"));
    }
}
