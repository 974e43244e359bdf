//! DCS client seam: reading and compare-and-swapping the `(quorum, voters)`
//! sync key a cluster's distributed configuration store holds.
//!
//! Real backends (etcd, Consul, ZooKeeper, Kubernetes) are out of scope;
//! this crate defines the trait they'd implement and ships one in-memory
//! implementation for the supervisor to use when no such backend is wired
//! up, and for its own tests.

mod client;
mod error;
mod memory;
mod record;

pub use client::DcsClient;
pub use error::{DcsError, Result};
pub use memory::InMemoryDcs;
pub use record::{DcsVersion, SyncRecord};
