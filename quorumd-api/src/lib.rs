//! Read-only control-plane REST API for quorumd. Runs its own observe/
//! resolve/apply poller alongside the `axum` router, as a self-contained
//! demonstration of the control-plane surface described in the supervisor's
//! design; see `DESIGN.md`.

pub mod poller;
pub mod routes;
pub mod state;

pub use poller::Poller;
pub use routes::routes;
pub use state::{AppState, ClusterSnapshot};
