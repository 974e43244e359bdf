//! quorumd supervisor binary: runs the HA loop against the in-memory DCS
//! and database stand-ins shipped in this workspace (real etcd/Consul/
//! ZooKeeper/Kubernetes and PostgreSQL adapters are out of scope).

use clap::Parser;
use quorumd_core::{PeerId, SyncState, SyncWanted};
use quorumd_dcs::InMemoryDcs;
use quorumd_supervisor::health::HealthCheckResult;
use quorumd_supervisor::{
    HaLoop, InMemoryDatabase, InMemoryHealthSource, Observer, SupervisorConfig, TransitionExecutor,
};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "quorumd-supervisor")]
#[command(about = "Quorum-based synchronous replication supervisor")]
struct Cli {
    /// Path to the supervisor's TOML configuration file
    #[arg(long, default_value = "quorumd.toml", env = "QUORUMD_CONFIG")]
    config: String,

    /// This node's peer ID
    #[arg(long, env = "QUORUMD_NODE_ID")]
    node_id: String,

    /// Comma-separated list of known peer IDs, including this node
    #[arg(long, value_delimiter = ',', env = "QUORUMD_PEERS")]
    peers: Vec<String>,
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
        node_id = %cli.node_id,
        peers = ?cli.peers,
        synchronous_node_count = config.replication.synchronous_node_count,
        cluster_prefix = %config.dcs.cluster_prefix,
        "starting quorumd supervisor"
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
        PeerId::new(cli.node_id.as_str()),
    );
    let ha_loop = HaLoop::new(observer, executor, config.tick_interval());

    let shutdown = CancellationToken::new();
    let loop_handle = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { ha_loop.run(shutdown).await }
    });

    signal::ctrl_c().await?;
    info!("shutdown signal received");
    shutdown.cancel();
    let _ = loop_handle.await;

    info!("quorumd supervisor stopped");
    Ok(())
}
