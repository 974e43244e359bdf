//! Data model for quorum state resolution
//!
//! A peer set is kept as a `BTreeSet<PeerId>` rather than a hash set so that
//! the admission/eviction tie-breaks (lexicographic ascending for admission,
//! descending for eviction) fall out of iteration order instead of needing
//! an explicit sort at every call site.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque, globally-unique peer identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PeerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PeerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

pub type PeerSet = BTreeSet<PeerId>;

/// Replication-factor state held in the database's own configuration:
/// which peers the primary waits for on commit, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub numsync: u32,
    pub sync: PeerSet,
}

impl SyncState {
    pub fn new(numsync: u32, sync: PeerSet) -> Self {
        Self { numsync, sync }
    }
}

/// Quorum state held in the DCS: which peers must be interrogated during
/// failover, and how many of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumState {
    pub quorum: u32,
    pub voters: PeerSet,
}

impl QuorumState {
    pub fn new(quorum: u32, voters: PeerSet) -> Self {
        Self { quorum, voters }
    }
}

/// The set of peers currently healthy enough to participate in synchronous
/// replication. Rebuilt from observations every tick; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Active(pub PeerSet);

impl Active {
    pub fn new(peers: PeerSet) -> Self {
        Self(peers)
    }
}

/// Operator-configured desired replication factor (`synchronous_node_count`).
/// Must be `>= 1`; enforced at supervisor startup, not by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SyncWanted(pub u32);

/// One atomic update to either the sync state or the quorum state.
///
/// A tagged enum rather than a bare `(kind, n, set)` tuple, so the executor
/// can pattern-match on the variant instead of inspecting a string tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    Sync { numsync: u32, sync: PeerSet },
    Quorum { quorum: u32, voters: PeerSet },
}

impl Transition {
    /// True if both transitions write to the same store (used by the
    /// coalescing pass to decide whether one subsumes the other).
    pub fn same_kind(&self, other: &Transition) -> bool {
        matches!(
            (self, other),
            (Transition::Sync { .. }, Transition::Sync { .. })
                | (Transition::Quorum { .. }, Transition::Quorum { .. })
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Sync { numsync, sync } => {
                write!(f, "sync({numsync}, {{{}}})", join_peers(sync))
            }
            Transition::Quorum { quorum, voters } => {
                write!(f, "quorum({quorum}, {{{}}})", join_peers(voters))
            }
        }
    }
}

fn join_peers(peers: &PeerSet) -> String {
    peers
        .iter()
        .map(PeerId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
