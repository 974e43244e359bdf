//! Background poller: runs the same observe/resolve/apply tick as
//! `quorumd_supervisor::HaLoop`, but publishes each tick's result into the
//! API's shared `AppState` instead of only logging it. Kept separate from
//! `HaLoop` rather than threading a publish hook through it, since the
//! control-plane API is an observability add-on, not a second copy of the
//! supervisor's responsibility for applying transitions.

use crate::state::AppState;
use quorumd_supervisor::{Observer, TransitionExecutor};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct Poller {
    observer: Observer,
    executor: TransitionExecutor,
    tick_interval: Duration,
    state: Arc<AppState>,
}

impl Poller {
    pub fn new(
        observer: Observer,
        executor: TransitionExecutor,
        tick_interval: Duration,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            observer,
            executor,
            tick_interval,
            state,
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        info!(tick_interval = ?self.tick_interval, "control-plane poller started");

        loop {
            self.run_tick(&shutdown).await;

            tokio::select! {
                _ = tokio::time::sleep(self.tick_interval) => {}
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, stopping poller");
                    break;
                }
            }
        }
    }

    async fn run_tick(&self, shutdown: &CancellationToken) {
        let observation = match self.observer.observe().await {
            Ok(observation) => observation,
            Err(e) => {
                warn!(error = %e, "observe failed, skipping tick");
                return;
            }
        };

        let transitions = match quorumd_core::resolve(observation.input.clone()) {
            Ok(transitions) => transitions,
            Err(e) => {
                error!(error = %e, "resolver invariant violated, skipping tick");
                return;
            }
        };

        if transitions.is_empty() {
            debug!("already at optimal state");
            self.state
                .record_tick(observation.input, Vec::new(), "no-op: already optimal".to_string())
                .await;
            return;
        }

        let report = self
            .executor
            .apply(transitions.clone(), observation.dcs_version, shutdown)
            .await;

        self.state
            .record_tick(observation.input, transitions, report.summary())
            .await;
    }
}
