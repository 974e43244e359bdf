//! Error types for the supervisor crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupervisorError>;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("failed to observe cluster state: {0}")]
    Observe(#[from] ObserveError),

    #[error(transparent)]
    Quorum(#[from] quorumd_core::QuorumError),

    #[error(transparent)]
    Dcs(#[from] quorumd_dcs::DcsError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ObserveError {
    #[error("reading DCS state failed: {0}")]
    Dcs(#[from] quorumd_dcs::DcsError),

    #[error("reading database sync state failed: {0}")]
    Database(#[from] DbError),
}

#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("timed out waiting for database")]
    Timeout,

    #[error("database rejected sync configuration: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
