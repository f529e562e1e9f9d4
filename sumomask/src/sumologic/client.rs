// sumomask/src/sumologic/client.rs
//! HTTP client for the Sumo Logic Search Job API.
//!
//! The API is session-affine: the job create response sets a cookie that
//! later status, message, and delete calls on the same job must carry, so
//! the underlying client keeps a cookie store. Every call also sends basic
//! auth with the configured access id and key.

use anyhow::{Context, Result};
use log::debug;

use crate::config::ServerConfig;
use crate::sumologic::types::{
    MessagesResponse, SearchJobRequest, SearchJobResponse, SearchJobStatus,
};

/// Page size used when the caller does not ask for a specific limit.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 40;

pub struct SumoClient {
    http: reqwest::Client,
    endpoint: String,
    access_id: String,
    access_key: String,
}

impl SumoClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_id: config.access_id.clone(),
            access_key: config.access_key.clone(),
        })
    }

    /// Starts a search job and returns its id.
    pub async fn create_job(&self, request: &SearchJobRequest) -> Result<String> {
        let url = format!("{}/search/jobs", self.endpoint);
        debug!("Creating search job at {url}");
        let response: SearchJobResponse = self
            .http
            .post(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .json(request)
            .send()
            .await
            .context("Failed to send search job request")?
            .error_for_status()
            .context("Search job creation was rejected")?
            .json()
            .await
            .context("Failed to decode search job response")?;
        debug!("Created search job {}", response.id);
        Ok(response.id)
    }

    /// Polls the current state of a search job.
    pub async fn job_status(&self, job_id: &str) -> Result<SearchJobStatus> {
        let url = format!("{}/search/jobs/{job_id}", self.endpoint);
        let status: SearchJobStatus = self
            .http
            .get(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .send()
            .await
            .context("Failed to poll search job status")?
            .error_for_status()
            .context("Search job status poll was rejected")?
            .json()
            .await
            .context("Failed to decode search job status")?;
        debug!(
            "Job {job_id} state={} messages={}",
            status.state, status.message_count
        );
        Ok(status)
    }

    /// Fetches one page of messages from a completed job.
    pub async fn messages(&self, job_id: &str, offset: u32, limit: u32) -> Result<MessagesResponse> {
        let url = format!("{}/search/jobs/{job_id}/messages", self.endpoint);
        self.http
            .get(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await
            .context("Failed to fetch search job messages")?
            .error_for_status()
            .context("Search job message fetch was rejected")?
            .json()
            .await
            .context("Failed to decode search job messages")
    }

    /// Deletes a search job, releasing its server-side resources.
    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        let url = format!("{}/search/jobs/{job_id}", self.endpoint);
        self.http
            .delete(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .send()
            .await
            .context("Failed to delete search job")?
            .error_for_status()
            .context("Search job deletion was rejected")?;
        debug!("Deleted search job {job_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(endpoint: &str) -> ServerConfig {
        ServerConfig {
            endpoint: endpoint.to_string(),
            access_id: "test-id".into(),
            access_key: "test-key".into(),
        }
    }

    #[test]
    fn trailing_slash_is_trimmed_from_endpoint() {
        let client = SumoClient::new(&test_config("https://api.example.com/api/v1/")).unwrap();
        assert_eq!(client.endpoint, "https://api.example.com/api/v1");
    }

    #[tokio::test]
    async fn create_job_posts_basic_auth_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/search/jobs")
            .match_header(
                "authorization",
                mockito::Matcher::Regex("^Basic ".to_string()),
            )
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "query": "error",
                "timeZone": "UTC",
            })))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "JOB123"}"#)
            .create_async()
            .await;

        let client =
            SumoClient::new(&test_config(&format!("{}/api/v1", server.url()))).unwrap();
        let request = SearchJobRequest {
            query: "error".into(),
            from: "2026-08-29T00:00:00Z".into(),
            to: "2026-08-30T00:00:00Z".into(),
            time_zone: "UTC".into(),
        };
        let job_id = client.create_job(&request).await.unwrap();
        assert_eq!(job_id, "JOB123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn messages_sends_offset_and_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/search/jobs/JOB123/messages")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("offset".into(), "0".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "40".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messages": [{"map": {"_raw": "hello"}}]}"#)
            .create_async()
            .await;

        let client =
            SumoClient::new(&test_config(&format!("{}/api/v1", server.url()))).unwrap();
        let page = client
            .messages("JOB123", 0, DEFAULT_MESSAGE_LIMIT)
            .await
            .unwrap();
        assert_eq!(page.messages.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_errors_surface_as_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/search/jobs/JOB123")
            .with_status(401)
            .create_async()
            .await;

        let client =
            SumoClient::new(&test_config(&format!("{}/api/v1", server.url()))).unwrap();
        assert!(client.job_status("JOB123").await.is_err());
    }
}
