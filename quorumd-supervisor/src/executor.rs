//! Transition executor: applies an ordered list of transitions, one at a
//! time, halting at the first failure and reporting how far it got.
//! Sequential rather than fanned out, since the resolver's ordering
//! invariant means applying two transitions out of order (or concurrently)
//! can itself violate the overlap guarantee.

use crate::database::DatabaseSyncConfig;
use quorumd_core::{PeerId, QuorumState, SyncState, Transition};
use quorumd_dcs::{DcsClient, DcsVersion, SyncRecord};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of applying a (possibly partial) list of transitions.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub applied: usize,
    pub total: usize,
    pub aborted_reason: Option<String>,
    pub last_dcs_version: Option<DcsVersion>,
}

impl ExecutionReport {
    pub fn all_applied(&self) -> bool {
        self.aborted_reason.is_none()
    }

    pub fn summary(&self) -> String {
        match &self.aborted_reason {
            Some(reason) => format!(
                "applied {}/{} transitions, aborted: {reason}",
                self.applied, self.total
            ),
            None => format!("applied all {} transitions", self.total),
        }
    }
}

pub struct TransitionExecutor {
    dcs: Arc<dyn DcsClient>,
    database: Arc<dyn DatabaseSyncConfig>,
    cluster_prefix: String,
    leader: PeerId,
}

impl TransitionExecutor {
    pub fn new(
        dcs: Arc<dyn DcsClient>,
        database: Arc<dyn DatabaseSyncConfig>,
        cluster_prefix: String,
        leader: PeerId,
    ) -> Self {
        Self {
            dcs,
            database,
            cluster_prefix,
            leader,
        }
    }

    /// Apply `transitions` in order. Checks `cancel` between each one (never
    /// mid-transition) so a shutdown request cannot interrupt a single DCS
    /// or database write, only the gap between two.
    pub async fn apply(
        &self,
        transitions: Vec<Transition>,
        mut dcs_version: Option<DcsVersion>,
        cancel: &CancellationToken,
    ) -> ExecutionReport {
        let total = transitions.len();

        for (i, transition) in transitions.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return ExecutionReport {
                    applied: i,
                    total,
                    aborted_reason: Some("shutdown requested".to_string()),
                    last_dcs_version: dcs_version,
                };
            }

            match transition {
                Transition::Sync { numsync, sync } => {
                    let state = SyncState::new(numsync, sync);
                    if let Err(e) = self.database.apply_sync_state(state).await {
                        warn!(error = %e, step = i, "aborting transition apply");
                        return ExecutionReport {
                            applied: i,
                            total,
                            aborted_reason: Some(e.to_string()),
                            last_dcs_version: dcs_version,
                        };
                    }
                    info!(numsync, step = i, "applied sync transition");
                }
                Transition::Quorum { quorum, voters } => {
                    let record = SyncRecord::new(self.leader.clone(), QuorumState::new(quorum, voters));
                    match self
                        .dcs
                        .cas_put_sync_record(&self.cluster_prefix, record, dcs_version)
                        .await
                    {
                        Ok(version) => {
                            dcs_version = Some(version);
                            info!(quorum, step = i, "applied quorum transition");
                        }
                        Err(e) => {
                            warn!(error = %e, step = i, "aborting transition apply");
                            return ExecutionReport {
                                applied: i,
                                total,
                                aborted_reason: Some(e.to_string()),
                                last_dcs_version: dcs_version,
                            };
                        }
                    }
                }
            }
        }

        ExecutionReport {
            applied: total,
            total,
            aborted_reason: None,
            last_dcs_version: dcs_version,
        }
    }
}
