//! Error types for the quorum resolver
//!
//! A `QuorumError` signals that the working state handed to the resolver (or
//! produced mid-resolution) violates the overlap invariant. This is a
//! programmer/data error, not a runtime condition: callers treat it as fatal
//! to the current tick and let the next tick re-observe and retry.

use thiserror::Error;

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, QuorumError>;

/// Errors raised while resolving or applying quorum state transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuorumError {
    #[error("quorum and sync not guaranteed to overlap: nodes {nodes} >= quorum {quorum} + numsync {numsync}")]
    Overlap {
        nodes: usize,
        quorum: u32,
        numsync: u32,
    },

    #[error("mismatched sets: voters only = {voters_only}, sync only = {sync_only}")]
    Mismatched {
        voters_only: usize,
        sync_only: usize,
    },

    #[error("invalid quorum {quorum} for voters {voters:?}")]
    InvalidQuorum { quorum: i64, voters: Vec<String> },
}
