// sumomask/src/sumologic/mod.rs
//! Thin client for the Sumo Logic Search Job API.

pub mod client;
pub mod types;

pub use client::{SumoClient, DEFAULT_MESSAGE_LIMIT};
pub use types::{MessagesResponse, SearchJobRequest, SearchJobResponse, SearchJobStatus};
