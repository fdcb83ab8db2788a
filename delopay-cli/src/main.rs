//! Delopay command-line client
//!
//! Thin wrapper over `delopay-sdk`: every subcommand maps to one API call and
//! prints the JSON response on stdout. Logs go to stderr.

mod commands;
mod config;

use clap::Parser;
use config::{ConfigLoader, Overrides};
use delopay_sdk::{ApiError, DelopayClient};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Delopay - payments API client
#[derive(Parser, Debug)]
#[command(name = "delopay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (default: ./delopay.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key used as the bearer token
    #[arg(long, env = "DELOPAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API base URL
    #[arg(long, env = "DELOPAY_BASE_URL")]
    base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Retries for idempotent requests after the first attempt
    #[arg(long)]
    max_retries: Option<u32>,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: commands::Command,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_json);

    let config_loader = ConfigLoader::new(args.config.as_deref(), args.overrides());
    let client_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!(
        base_url = %client_config.base_url,
        timeout_ms = client_config.timeout_ms,
        max_retries = client_config.max_retries,
        "Client configured"
    );

    let client = DelopayClient::new(client_config)?;

    let output = commands::run(args.command, &client).await.map_err(|e| {
        match e.downcast_ref::<ApiError>() {
            Some(api_error) => tracing::error!(
                status = api_error.status,
                code = api_error.code.as_deref().unwrap_or("-"),
                request_id = api_error.request_id.as_deref().unwrap_or("-"),
                "{}",
                api_error.message
            ),
            None => tracing::error!("{}", e),
        }
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper_util=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
