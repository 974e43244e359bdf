//! The DCS's sync key: `quorum`/`voters` plus the current leader, and the
//! opaque version token used for compare-and-swap writes.

use crate::error::{DcsError, Result};
use quorumd_core::{PeerId, PeerSet, QuorumState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque version/fencing token returned by a DCS write and required on the
/// next compare-and-swap. Stands in for an etcd mod_revision, a ZooKeeper
/// stat version, or a Kubernetes resourceVersion — whichever the real
/// adapter wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DcsVersion(pub u64);

impl fmt::Display for DcsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value stored under a cluster's sync key: who the current leader is,
/// and the quorum state the resolver has decided on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub leader: PeerId,
    pub quorum: u32,
    pub voters: PeerSet,
}

impl SyncRecord {
    pub fn new(leader: PeerId, quorum_state: QuorumState) -> Self {
        Self {
            leader,
            quorum: quorum_state.quorum,
            voters: quorum_state.voters,
        }
    }

    pub fn quorum_state(&self) -> QuorumState {
        QuorumState::new(self.quorum, self.voters.clone())
    }

    /// Comma-separated sorted-voters text form: `leader|quorum|v1,v2,v3`.
    /// `voters` is a `BTreeSet` so the join is already lexicographically
    /// sorted without an explicit sort step.
    pub fn to_wire(&self) -> String {
        let voters = self
            .voters
            .iter()
            .map(PeerId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}|{}|{}", self.leader, self.quorum, voters)
    }

    pub fn from_wire(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '|');
        let leader = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DcsError::Serialization(format!("missing leader in {s:?}")))?;
        let quorum = parts
            .next()
            .ok_or_else(|| DcsError::Serialization(format!("missing quorum in {s:?}")))?
            .parse::<u32>()
            .map_err(|e| DcsError::Serialization(format!("bad quorum in {s:?}: {e}")))?;
        let voters_field = parts.next().unwrap_or("");
        let voters: PeerSet = voters_field
            .split(',')
            .filter(|v| !v.is_empty())
            .map(PeerId::new)
            .collect();

        Ok(Self {
            leader: PeerId::new(leader),
            quorum,
            voters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_wire_form() {
        let record = SyncRecord {
            leader: PeerId::new("a"),
            quorum: 2,
            voters: [PeerId::new("b"), PeerId::new("a"), PeerId::new("c")]
                .into_iter()
                .collect(),
        };
        let wire = record.to_wire();
        assert_eq!(wire, "a|2|a,b,c");
        assert_eq!(SyncRecord::from_wire(&wire).unwrap(), record);
    }

    #[test]
    fn rejects_a_missing_leader() {
        assert!(SyncRecord::from_wire("|2|a,b").is_err());
    }
}
