//! HTTP routes: a read-only view of the supervisor's last-observed state,
//! not a full control-plane CRUD surface.

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/cluster", get(get_cluster))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_cluster(
    State(state): State<Arc<AppState>>,
) -> Result<Json<crate::state::ClusterSnapshot>, StatusCode> {
    let snapshot = state.snapshot().await;
    if snapshot.input.is_none() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(snapshot))
}
