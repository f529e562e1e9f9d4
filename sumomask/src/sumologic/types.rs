// sumomask/src/sumologic/types.rs
//! Wire types for the Sumo Logic Search Job API.
//!
//! Response types default every field the API has been observed to omit, so
//! a partial payload deserializes instead of failing the whole search.

use serde::{Deserialize, Serialize};

/// Body of `POST /search/jobs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchJobRequest {
    pub query: String,
    pub from: String,
    pub to: String,
    pub time_zone: String,
}

/// Response to a job creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchJobResponse {
    pub id: String,
}

/// Response to a job status poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchJobStatus {
    pub state: String,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub record_count: u64,
    #[serde(default)]
    pub pending_errors: Vec<String>,
}

/// Response to a message page fetch. Individual messages are kept as raw
/// JSON values; masking walks whatever shape the API returns.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

/// Job state reported while results are still being collected.
pub const STATE_GATHERING: &str = "GATHERING RESULTS";
/// Terminal job state once all results are available.
pub const STATE_DONE: &str = "DONE GATHERING RESULTS";
/// Terminal job state for a cancelled job.
pub const STATE_CANCELLED: &str = "CANCELLED";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_request_serializes_camel_case() {
        let request = SearchJobRequest {
            query: "_sourceCategory=prod | count".into(),
            from: "2026-08-29T00:00:00Z".into(),
            to: "2026-08-30T00:00:00Z".into(),
            time_zone: "UTC".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["timeZone"], "UTC");
        assert!(json.get("time_zone").is_none());
    }

    #[test]
    fn status_tolerates_missing_counts() {
        let status: SearchJobStatus =
            serde_json::from_str(r#"{"state": "GATHERING RESULTS"}"#).unwrap();
        assert_eq!(status.state, STATE_GATHERING);
        assert_eq!(status.message_count, 0);
        assert!(status.pending_errors.is_empty());
    }

    #[test]
    fn messages_response_defaults_to_empty() {
        let response: MessagesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.messages.is_empty());
    }
}
