//! Errors raised while talking to the distributed configuration store

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DcsError>;

/// Errors a `DcsClient` implementation can surface. Every variant maps onto
/// a failure mode a real etcd/Consul/ZooKeeper/Kubernetes adapter would
/// also have to report, even though only an in-memory stand-in ships here.
#[derive(Error, Debug)]
pub enum DcsError {
    #[error("key {key} not found in DCS")]
    NotFound { key: String },

    #[error("compare-and-swap conflict on {key}: expected version {expected:?}, found {found:?}")]
    CasConflict {
        key: String,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("DCS operation on {key} timed out")]
    Timeout { key: String },

    #[error("malformed sync record: {0}")]
    Serialization(String),
}
