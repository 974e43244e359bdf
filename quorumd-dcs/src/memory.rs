//! In-memory `DcsClient`, used by the supervisor when no real DCS endpoint
//! is configured and by the supervisor's own test suite.

use crate::client::DcsClient;
use crate::error::{DcsError, Result};
use crate::record::{DcsVersion, SyncRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryDcs {
    records: RwLock<HashMap<String, (SyncRecord, DcsVersion)>>,
}

impl InMemoryDcs {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DcsClient for InMemoryDcs {
    async fn get_sync_record(&self, cluster_prefix: &str) -> Result<Option<(SyncRecord, DcsVersion)>> {
        let records = self.records.read().await;
        Ok(records.get(cluster_prefix).cloned())
    }

    async fn cas_put_sync_record(
        &self,
        cluster_prefix: &str,
        record: SyncRecord,
        expected: Option<DcsVersion>,
    ) -> Result<DcsVersion> {
        let mut records = self.records.write().await;
        let current = records.get(cluster_prefix).map(|(_, v)| *v);
        if current != expected {
            return Err(DcsError::CasConflict {
                key: cluster_prefix.to_string(),
                expected: expected.map(|v| v.0),
                found: current.map(|v| v.0),
            });
        }
        let next = DcsVersion(current.map(|v| v.0).unwrap_or(0) + 1);
        debug!(key = %cluster_prefix, version = %next, "wrote sync record");
        records.insert(cluster_prefix.to_string(), (record, next));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorumd_core::PeerId;

    fn record(leader: &str) -> SyncRecord {
        SyncRecord {
            leader: PeerId::new(leader),
            quorum: 2,
            voters: [PeerId::new("a"), PeerId::new("b")].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn first_write_requires_no_prior_version() {
        let dcs = InMemoryDcs::new();
        let v1 = dcs.cas_put_sync_record("/c", record("a"), None).await.unwrap();
        assert_eq!(v1, DcsVersion(1));
    }

    #[tokio::test]
    async fn a_stale_expected_version_is_rejected() {
        let dcs = InMemoryDcs::new();
        let v1 = dcs.cas_put_sync_record("/c", record("a"), None).await.unwrap();
        assert!(dcs.cas_put_sync_record("/c", record("b"), None).await.is_err());
        let v2 = dcs
            .cas_put_sync_record("/c", record("b"), Some(v1))
            .await
            .unwrap();
        assert_eq!(v2, DcsVersion(2));
    }

    #[tokio::test]
    async fn get_returns_none_for_an_unwritten_key() {
        let dcs = InMemoryDcs::new();
        assert!(dcs.get_sync_record("/missing").await.unwrap().is_none());
    }
}
