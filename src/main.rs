//! statusctl - inspect and edit entity statuses
//!
//! CLI entry point over a `model-status` SQLite database.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statusctl=info,model_status=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    let settings = settings::load_settings()?;
    info!("Starting statusctl v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, settings).await
}
