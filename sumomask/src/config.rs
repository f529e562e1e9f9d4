// sumomask/src/config.rs
//! Environment-sourced server configuration.
//!
//! Endpoint and credentials come from the process environment (optionally
//! seeded from a `.env` file). A missing or empty value is a startup-time
//! fatal condition; the server never runs half-configured.

use anyhow::{bail, Context, Result};
use std::env;

/// Environment variable naming the Sumo Logic API endpoint,
/// e.g. `https://api.eu.sumologic.com/api/v1`.
pub const ENV_ENDPOINT: &str = "SUMO_ENDPOINT";
/// Environment variable holding the access id for HTTP basic auth.
pub const ENV_ACCESS_ID: &str = "SUMO_ACCESS_ID";
/// Environment variable holding the access key for HTTP basic auth.
pub const ENV_ACCESS_KEY: &str = "SUMO_ACCESS_KEY";
/// Optional environment variable naming the default search timezone.
pub const ENV_TIME_ZONE: &str = "SUMO_TIME_ZONE";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub endpoint: String,
    pub access_id: String,
    pub access_key: String,
}

impl ServerConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: required_var(ENV_ENDPOINT)?,
            access_id: required_var(ENV_ACCESS_ID)?,
            access_key: required_var(ENV_ACCESS_KEY)?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name)
        .with_context(|| format!("Missing required environment variable {name}"))?;
    if value.trim().is_empty() {
        bail!("Environment variable {name} is set but empty");
    }
    Ok(value)
}
