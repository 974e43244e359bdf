//! Health source: decides which configured peers are currently eligible for
//! the active set the resolver needs.
//!
//! A peer counts as active only when all three independently tracked checks
//! pass — lease liveness, replication lag, and streaming status.

use async_trait::async_trait;
use quorumd_core::{Active, PeerId, PeerSet};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// The three independent checks a peer must pass to count as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthCheckResult {
    /// The peer's DCS lease is current (it hasn't been evicted as dead).
    pub lease_ok: bool,
    /// Replication lag is within the operator's tolerance.
    pub lag_ok: bool,
    /// The peer is actively streaming, not just connected.
    pub streaming_ok: bool,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            lease_ok: true,
            lag_ok: true,
            streaming_ok: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lease_ok && self.lag_ok && self.streaming_ok
    }
}

/// Source of per-peer health checks.
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn check_peer(&self, peer: &PeerId) -> HealthCheckResult;

    /// Evaluate every candidate and fold the passing ones into an `Active` set.
    async fn active_peers(&self, candidates: &PeerSet) -> Active {
        let mut active = PeerSet::new();
        for peer in candidates {
            let result = self.check_peer(peer).await;
            debug!(peer = %peer, ?result, "peer health check");
            if result.is_active() {
                active.insert(peer.clone());
            }
        }
        Active::new(active)
    }
}

/// In-memory health source driven by test/dev code setting each peer's
/// result directly, rather than performing real lease/lag/streaming checks.
#[derive(Debug, Default)]
pub struct InMemoryHealthSource {
    results: RwLock<HashMap<PeerId, HealthCheckResult>>,
}

impl InMemoryHealthSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, peer: PeerId, result: HealthCheckResult) {
        self.results.write().await.insert(peer, result);
    }
}

#[async_trait]
impl HealthSource for InMemoryHealthSource {
    async fn check_peer(&self, peer: &PeerId) -> HealthCheckResult {
        self.results
            .read()
            .await
            .get(peer)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unregistered_peers_are_inactive() {
        let source = InMemoryHealthSource::new();
        let candidates: PeerSet = [PeerId::new("a")].into_iter().collect();
        let active = source.active_peers(&candidates).await;
        assert!(active.0.is_empty());
    }

    #[tokio::test]
    async fn a_peer_failing_any_single_check_is_excluded() {
        let source = InMemoryHealthSource::new();
        source
            .set(
                PeerId::new("a"),
                HealthCheckResult {
                    lease_ok: true,
                    lag_ok: false,
                    streaming_ok: true,
                },
            )
            .await;
        source.set(PeerId::new("b"), HealthCheckResult::healthy()).await;

        let candidates: PeerSet = [PeerId::new("a"), PeerId::new("b")].into_iter().collect();
        let active = source.active_peers(&candidates).await;
        assert_eq!(active.0, [PeerId::new("b")].into_iter().collect());
    }
}
