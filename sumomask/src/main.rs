// sumomask/src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use sumomask::config::ServerConfig;
use sumomask::logger::init_logger;
use sumomask::mcp::McpServer;
use sumomask::sumologic::SumoClient;
use sumomask_core::{merge_stages, MaskConfig, MaskingEngine, PipelineEngine};

/// MCP server exposing Sumo Logic search with PII masking.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML file of masking stages layered over the defaults.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Suppress all log output.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logger(cli.quiet);

    let config = ServerConfig::from_env().context("Server configuration is incomplete")?;

    let defaults = MaskConfig::load_default_rules().context("Failed to load default mask rules")?;
    let user_rules = match &cli.rules {
        Some(path) => Some(
            MaskConfig::load_from_file(path)
                .with_context(|| format!("Failed to load mask rules from {}", path.display()))?,
        ),
        None => None,
    };
    let mask_config = merge_stages(defaults, user_rules);

    let engine: Box<dyn MaskingEngine> =
        Box::new(PipelineEngine::new(mask_config).context("Failed to compile mask stages")?);
    let client = SumoClient::new(&config).context("Failed to build Sumo Logic client")?;

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    McpServer::new(client, engine).run().await
}
