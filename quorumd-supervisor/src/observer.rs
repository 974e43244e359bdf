//! Observer: gathers one tick's worth of cluster state into a
//! [`ResolverInput`], reading from the three external collaborators
//! (DCS, database, health source) the supervisor depends on.

use crate::database::DatabaseSyncConfig;
use crate::error::ObserveError;
use crate::health::HealthSource;
use quorumd_core::{PeerId, PeerSet, QuorumState, ResolverInput, SyncWanted};
use quorumd_dcs::{DcsClient, DcsVersion};
use std::sync::Arc;
use tracing::{debug, warn};

/// One tick's observation: the resolver input, plus the DCS version token
/// needed to compare-and-swap the next write.
#[derive(Debug, Clone)]
pub struct Observation {
    pub input: ResolverInput,
    pub dcs_version: Option<DcsVersion>,
}

pub struct Observer {
    dcs: Arc<dyn DcsClient>,
    database: Arc<dyn DatabaseSyncConfig>,
    health: Arc<dyn HealthSource>,
    cluster_prefix: String,
    known_peers: PeerSet,
    sync_wanted: SyncWanted,
}

impl Observer {
    pub fn new(
        dcs: Arc<dyn DcsClient>,
        database: Arc<dyn DatabaseSyncConfig>,
        health: Arc<dyn HealthSource>,
        cluster_prefix: String,
        known_peers: PeerSet,
        sync_wanted: SyncWanted,
    ) -> Self {
        Self {
            dcs,
            database,
            health,
            cluster_prefix,
            known_peers,
            sync_wanted,
        }
    }

    pub async fn observe(&self) -> Result<Observation, ObserveError> {
        let existing = self.dcs.get_sync_record(&self.cluster_prefix).await?;
        let (quorum_state, dcs_version) = match existing {
            Some((record, version)) => (record.quorum_state(), Some(version)),
            None => {
                warn!(cluster_prefix = %self.cluster_prefix, "no sync key in DCS yet, bootstrapping");
                (QuorumState::new(1, PeerSet::new()), None)
            }
        };

        let sync_state = self.database.current_sync_state().await?;
        let active = self.health.active_peers(&self.known_peers).await;

        debug!(
            quorum = quorum_state.quorum,
            voters = ?quorum_state.voters,
            numsync = sync_state.numsync,
            sync = ?sync_state.sync,
            active = ?active.0,
            "observed cluster state"
        );

        Ok(Observation {
            input: ResolverInput {
                quorum_state,
                sync_state,
                active,
                sync_wanted: self.sync_wanted,
            },
            dcs_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::health::{HealthCheckResult, InMemoryHealthSource};
    use quorumd_core::SyncState;
    use quorumd_dcs::InMemoryDcs;

    fn peers(names: &[&str]) -> PeerSet {
        names.iter().map(|n| PeerId::new(*n)).collect()
    }

    #[tokio::test]
    async fn bootstraps_with_an_empty_quorum_state_when_dcs_has_no_key() {
        let observer = Observer::new(
            Arc::new(InMemoryDcs::new()),
            Arc::new(InMemoryDatabase::new(SyncState::new(0, PeerSet::new()))),
            Arc::new(InMemoryHealthSource::new()),
            "/service/test".to_string(),
            peers(&["a", "b"]),
            SyncWanted(1),
        );
        let observation = observer.observe().await.unwrap();
        assert!(observation.dcs_version.is_none());
        assert_eq!(observation.input.quorum_state.quorum, 1);
        assert!(observation.input.quorum_state.voters.is_empty());
    }

    #[tokio::test]
    async fn only_healthy_known_peers_become_active() {
        let health = Arc::new(InMemoryHealthSource::new());
        health.set(PeerId::new("a"), HealthCheckResult::healthy()).await;

        let observer = Observer::new(
            Arc::new(InMemoryDcs::new()),
            Arc::new(InMemoryDatabase::new(SyncState::new(0, PeerSet::new()))),
            health,
            "/service/test".to_string(),
            peers(&["a", "b"]),
            SyncWanted(1),
        );
        let observation = observer.observe().await.unwrap();
        assert_eq!(observation.input.active.0, peers(&["a"]));
    }
}
