//! quorumd control-plane API binary: serves `GET /cluster` over the
//! in-memory stand-ins. A clap CLI, a shared `Arc<AppState>`, a background
//! poller task, and a graceful `axum::serve` shutdown.

use clap::Parser;
use quorumd_api::{AppState, Poller};
use quorumd_core::{PeerId, SyncState, SyncWanted};
use quorumd_dcs::InMemoryDcs;
use quorumd_supervisor::health::HealthCheckResult;
use quorumd_supervisor::{InMemoryDatabase, InMemoryHealthSource, Observer, SupervisorConfig, TransitionExecutor};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "quorumd-api")]
#[command(about = "Read-only control-plane API for quorumd")]
struct Cli {
    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0:8181", env = "QUORUMD_API_ADDR")]
    http_addr: String,

    /// Path to the supervisor's TOML configuration file
    #[arg(long, default_value = "quorumd.toml", env = "QUORUMD_CONFIG")]
    config: String,

    /// Comma-separated list of known peer IDs, including this node
    #[arg(long, value_delimiter = ',', env = "QUORUMD_PEERS")]
    peers: Vec<String>,

    /// Enable CORS for all origins (development only)
    #[arg(long, default_value = "false")]
    cors_permissive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = SupervisorConfig::load_or_default(&cli.config).with_env_overrides();

    info!(
        http_addr = %cli.http_addr,
        peers = ?cli.peers,
        "starting quorumd control-plane API"
    );

    let known_peers = cli.peers.iter().map(|p| PeerId::new(p.as_str())).collect();

    let health = Arc::new(InMemoryHealthSource::new());
    for peer in &cli.peers {
        health.set(PeerId::new(peer.as_str()), HealthCheckResult::healthy()).await;
    }

    let dcs = Arc::new(InMemoryDcs::new());
    let database = Arc::new(InMemoryDatabase::new(SyncState::new(0, Default::default())));

    let observer = Observer::new(
        dcs.clone(),
        database.clone(),
        health,
        config.dcs.cluster_prefix.clone(),
        known_peers,
        SyncWanted(config.replication.synchronous_node_count),
    );
    let executor = TransitionExecutor::new(
        dcs,
        database,
        config.dcs.cluster_prefix.clone(),
        cli.peers
            .first()
            .map(|p| PeerId::new(p.as_str()))
            .unwrap_or_else(|| PeerId::new("unknown")),
    );

    let state = Arc::new(AppState::new());
    let poller = Poller::new(observer, executor, config.tick_interval(), state.clone());

    let shutdown = CancellationToken::new();
    let poller_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { poller.run(shutdown).await }
    });

    let cors = if cli.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = quorumd_api::routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let http_addr: SocketAddr = cli.http_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    info!("control-plane API listening on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    let _ = poller_handle.await;

    info!("quorumd control-plane API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("received terminate signal, shutting down");
        },
    }
}
