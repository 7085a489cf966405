//! Computer Diagnosis API Server - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "diagnosis-server", version, about = "Serve computer diagnoses over HTTP")]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    init_logging(&config.log);
    info!("=== Computer Diagnosis Server v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(&config).await
}
