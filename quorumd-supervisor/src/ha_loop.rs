//! The supervisor's single-task HA loop: observe, resolve, apply, repeat.
//! No tick ever runs concurrently with another; cancellation is only
//! honored between transitions and between ticks.

use crate::executor::TransitionExecutor;
use crate::observer::Observer;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct HaLoop {
    observer: Observer,
    executor: TransitionExecutor,
    tick_interval: Duration,
}

impl HaLoop {
    pub fn new(observer: Observer, executor: TransitionExecutor, tick_interval: Duration) -> Self {
        Self {
            observer,
            executor,
            tick_interval,
        }
    }

    /// Run ticks until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(tick_interval = ?self.tick_interval, "supervisor HA loop started");

        loop {
            self.run_tick(&shutdown).await;

            tokio::select! {
                _ = tokio::time::sleep(self.tick_interval) => {}
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, stopping HA loop");
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

        let transitions = match quorumd_core::resolve(observation.input) {
            Ok(transitions) => transitions,
            Err(e) => {
                error!(error = %e, "resolver invariant violated, skipping tick");
                return;
            }
        };

        if transitions.is_empty() {
            debug!("already at optimal state");
            return;
        }

        let report = self
            .executor
            .apply(transitions, observation.dcs_version, shutdown)
            .await;

        if report.all_applied() {
            info!(summary = %report.summary(), "tick complete");
        } else {
            warn!(summary = %report.summary(), "tick aborted");
        }
    }
}
