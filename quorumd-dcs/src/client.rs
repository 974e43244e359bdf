//! `DcsClient`: the seam between the supervisor and whatever distributed
//! configuration store backs it. A real adapter (etcd, Consul, ZooKeeper,
//! Kubernetes) is out of scope here — only the trait and an in-memory
//! stand-in ([`crate::memory::InMemoryDcs`]) ship in this crate.

use crate::error::Result;
use crate::record::{DcsVersion, SyncRecord};
use async_trait::async_trait;

/// Reads and compare-and-swaps a cluster's sync key.
#[async_trait]
pub trait DcsClient: Send + Sync {
    /// Fetch the current record and its version, if the key exists.
    async fn get_sync_record(&self, cluster_prefix: &str) -> Result<Option<(SyncRecord, DcsVersion)>>;

    /// Write `record` under `cluster_prefix`, succeeding only if the key's
    /// current version matches `expected` (`None` means "key must not
    /// exist yet"). Returns the new version on success.
    async fn cas_put_sync_record(
        &self,
        cluster_prefix: &str,
        record: SyncRecord,
        expected: Option<DcsVersion>,
    ) -> Result<DcsVersion>;
}
