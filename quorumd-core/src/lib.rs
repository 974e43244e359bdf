//! Pure quorum state resolution.
//!
//! This crate has no knowledge of a DCS, a database connection, or a clock.
//! It takes a snapshot of where replication state currently stands and
//! computes the transitions needed to converge on the optimal synchronous
//! replication configuration for the given active node set, without ever
//! letting the overlap invariant lapse along the way.

mod error;
mod model;
mod resolver;

pub use error::{QuorumError, Result};
pub use model::{Active, PeerId, PeerSet, QuorumState, SyncState, SyncWanted, Transition};
pub use resolver::{resolve, ResolverInput};
