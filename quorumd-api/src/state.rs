//! Shared application state for the control-plane API: a single snapshot of
//! the most recent tick, updated by the poller task and read by the routes.
//! One `RwLock`-guarded struct behind an `Arc`, scaled to the one thing this
//! API exposes.

use quorumd_core::{ResolverInput, Transition};
use serde::Serialize;
use tokio::sync::RwLock;

/// The last tick the poller observed and (if any) acted on.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClusterSnapshot {
    pub input: Option<ResolverInput>,
    pub last_transitions: Vec<Transition>,
    pub last_tick_summary: Option<String>,
}

pub struct AppState {
    snapshot: RwLock<ClusterSnapshot>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(ClusterSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> ClusterSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn record_tick(
        &self,
        input: ResolverInput,
        last_transitions: Vec<Transition>,
        summary: String,
    ) {
        let mut guard = self.snapshot.write().await;
        guard.input = Some(input);
        guard.last_transitions = last_transitions;
        guard.last_tick_summary = Some(summary);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
