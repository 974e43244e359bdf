//! Control-plane API client.
//!
//! Defines its own response DTOs rather than depending on `quorumd-api`: a
//! thin `reqwest`-based client with response shapes it owns independently of
//! the server crate.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("control plane has no observation yet")]
    NotReady,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Deserialize)]
pub struct QuorumStateDto {
    pub quorum: u32,
    pub voters: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncStateDto {
    pub numsync: u32,
    pub sync: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverInputDto {
    pub quorum_state: QuorumStateDto,
    pub sync_state: SyncStateDto,
    pub active: BTreeSet<String>,
    pub sync_wanted: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionDto {
    Sync { numsync: u32, sync: BTreeSet<String> },
    Quorum { quorum: u32, voters: BTreeSet<String> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterStatusDto {
    pub input: Option<ResolverInputDto>,
    pub last_transitions: Vec<TransitionDto>,
    pub last_tick_summary: Option<String>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    pub async fn cluster_status(&self) -> Result<ClusterStatusDto> {
        let url = format!("{}/cluster", self.base_url);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::NotReady);
        }

        if !response.status().is_success() {
            return Err(ClientError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}
