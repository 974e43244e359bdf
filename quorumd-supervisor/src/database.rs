//! `DatabaseSyncConfig`: the seam between the supervisor and the database's
//! own synchronous replication configuration (`synchronous_standby_names`
//! and friends, in PostgreSQL terms). A real writer that generates database
//! config files and waits for the reload to take effect is out of scope
//! here; only the trait and an in-memory stand-in ship in this crate.

use crate::error::DbError;
use async_trait::async_trait;
use quorumd_core::SyncState;
use tokio::sync::RwLock;
use tracing::debug;

pub type Result<T> = std::result::Result<T, DbError>;

#[async_trait]
pub trait DatabaseSyncConfig: Send + Sync {
    /// The sync configuration currently in effect.
    async fn current_sync_state(&self) -> Result<SyncState>;

    /// Apply a new sync configuration. Returns once the database confirms
    /// the new configuration is active (a real adapter would poll; this
    /// crate's in-memory stand-in treats every write as immediately active).
    async fn apply_sync_state(&self, state: SyncState) -> Result<()>;
}

/// In-memory `DatabaseSyncConfig` used when no real database connection is
/// configured, and by the supervisor's own test suite.
#[derive(Debug)]
pub struct InMemoryDatabase {
    state: RwLock<SyncState>,
}

impl InMemoryDatabase {
    pub fn new(initial: SyncState) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl DatabaseSyncConfig for InMemoryDatabase {
    async fn current_sync_state(&self) -> Result<SyncState> {
        Ok(self.state.read().await.clone())
    }

    async fn apply_sync_state(&self, state: SyncState) -> Result<()> {
        debug!(numsync = state.numsync, sync = ?state.sync, "applied sync state");
        *self.state.write().await = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorumd_core::PeerId;

    #[tokio::test]
    async fn applied_state_is_immediately_readable() {
        let db = InMemoryDatabase::new(SyncState::new(0, Default::default()));
        let sync = [PeerId::new("a"), PeerId::new("b")].into_iter().collect();
        db.apply_sync_state(SyncState::new(1, sync)).await.unwrap();
        let current = db.current_sync_state().await.unwrap();
        assert_eq!(current.numsync, 1);
        assert_eq!(current.sync.len(), 2);
    }
}
