//! quorumd CLI
//!
//! Command-line client for the quorumd control-plane API.
//!
//! # Commands
//! - `status` - Show the last-observed cluster state

use anyhow::Result;
use clap::{Parser, Subcommand};

mod client;
mod commands;

use client::ApiClient;

#[derive(Parser)]
#[command(name = "quorumd")]
#[command(about = "quorumd control-plane CLI")]
#[command(version)]
struct Cli {
    /// Control-plane API URL
    #[arg(long, global = true, default_value = "http://127.0.0.1:8181", env = "QUORUMD_API_URL")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the last-observed cluster state
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::Status => commands::status::run(&client).await?,
    }

    Ok(())
}
