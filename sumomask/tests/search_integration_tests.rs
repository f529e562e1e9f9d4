// sumomask/tests/search_integration_tests.rs
//! End-to-end search tests against a mocked Sumo Logic API.

use anyhow::Result;
use serde_json::json;

use sumomask::config::ServerConfig;
use sumomask::search::{search, SearchRequest};
use sumomask::sumologic::SumoClient;
use sumomask_core::{MaskConfig, MaskingEngine, PipelineEngine};

fn engine() -> Result<Box<dyn MaskingEngine>> {
    let config = MaskConfig::load_default_rules()?;
    Ok(Box::new(PipelineEngine::new(config)?))
}

fn client_for(server: &mockito::Server) -> Result<SumoClient> {
    SumoClient::new(&ServerConfig {
        endpoint: format!("{}/api/v1", server.url()),
        access_id: "test-id".into(),
        access_key: "test-key".into(),
    })
}

#[tokio::test]
async fn search_masks_messages_and_deletes_the_job() -> Result<()> {
    let mut server = mockito::Server::new_async().await;

    let create = server
        .mock("POST", "/api/v1/search/jobs")
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "JOB42"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/api/v1/search/jobs/JOB42")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"state": "DONE GATHERING RESULTS", "messageCount": 2}"#)
        .create_async()
        .await;
    let messages = server
        .mock("GET", "/api/v1/search/jobs/JOB42/messages")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("offset".into(), "0".into()),
            mockito::Matcher::UrlEncoded("limit".into(), "40".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "messages": [
                    {"map": {"_raw": "payment from jane@corp.example with 4111222233334444"}},
                    {"map": {"_raw": "healthcheck ok", "_sourceHost": "web-01"}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v1/search/jobs/JOB42")
        .with_status(200)
        .create_async()
        .await;

    let result = search(
        &client_for(&server)?,
        engine()?.as_ref(),
        SearchRequest {
            query: "payment".into(),
            ..Default::default()
        },
    )
    .await;

    assert_eq!(result.messages.len(), 2);
    assert_eq!(
        result.messages[0]["map"]["_raw"],
        "payment from [EMAIL REDACTED] with [CARD NUMBER REDACTED]"
    );
    assert_eq!(result.messages[1]["map"]["_raw"], "healthcheck ok");
    assert_eq!(result.messages[1]["map"]["_sourceHost"], "web-01");

    create.assert_async().await;
    status.assert_async().await;
    messages.assert_async().await;
    delete.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn upstream_failure_collapses_to_empty_result() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/search/jobs")
        .with_status(500)
        .create_async()
        .await;

    let result = search(
        &client_for(&server)?,
        engine()?.as_ref(),
        SearchRequest {
            query: "error".into(),
            ..Default::default()
        },
    )
    .await;

    assert!(result.messages.is_empty());
    Ok(())
}

#[tokio::test]
async fn cancelled_job_collapses_to_empty_result() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/search/jobs")
        .with_status(202)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "JOB99"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/search/jobs/JOB99")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"state": "CANCELLED"}"#)
        .create_async()
        .await;

    let result = search(
        &client_for(&server)?,
        engine()?.as_ref(),
        SearchRequest {
            query: "error".into(),
            ..Default::default()
        },
    )
    .await;

    assert!(result.messages.is_empty());
    Ok(())
}
