//! Drives the reconciler once or on a fixed interval.
//!
//! # Design
//! - A failed cycle is logged and never ends the loop; the interval is the only retry.
//! - Shutdown is injected through a `watch` channel and observed before each cycle
//!   and while sleeping. An in-flight cycle always runs to completion.
//! - A dropped shutdown sender means "no shutdown source", not "stop now".

use std::time::Duration;

use tokio::sync::watch;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::error::SyncError;
use crate::model::CycleOutcome;
use crate::reconcile::Reconciler;

/// Create the channel used to request scheduler shutdown.
///
/// Send `true` on the returned sender to stop a continuous run.
#[must_use]
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// How often the reconciler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run exactly one cycle.
    Once,
    /// Run a cycle, sleep `interval`, and repeat until shutdown.
    Continuous {
        /// Delay between the end of one cycle and the start of the next.
        interval: Duration,
    },
}

impl RunMode {
    /// Label recorded on cycle spans.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Continuous { .. } => "continuous",
        }
    }
}

/// Summary of a scheduler run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Cycles attempted.
    pub cycles: u64,
    /// Cycles that wrote a new listening port.
    pub updates: u64,
    /// Cycles that failed.
    pub failures: u64,
    /// Error from the most recent failed cycle, if the last cycle failed.
    pub last_error: Option<SyncError>,
}

impl RunReport {
    /// Whether the most recent cycle succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.last_error.is_none()
    }

    fn record(&mut self, result: Result<CycleOutcome, SyncError>) {
        self.cycles += 1;
        match result {
            Ok(outcome) => {
                if outcome.is_update() {
                    self.updates += 1;
                }
                self.last_error = None;
            }
            Err(err) => {
                self.failures += 1;
                self.last_error = Some(err);
            }
        }
    }
}

/// Runs reconciliation cycles according to a [`RunMode`].
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    mode: RunMode,
}

impl Scheduler {
    /// Scheduler that runs a single cycle.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            mode: RunMode::Once,
        }
    }

    /// Scheduler that runs a cycle every `interval`.
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            mode: RunMode::Continuous { interval },
        }
    }

    /// Configured run mode.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Run cycles until the mode is satisfied or shutdown is requested.
    pub async fn run(
        &self,
        reconciler: &Reconciler,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunReport {
        let mut report = RunReport::default();
        info!(
            mode = self.mode.as_str(),
            source = %reconciler.source_label(),
            "port reconciliation starting"
        );

        loop {
            if *shutdown.borrow() {
                info!("shutdown requested; skipping next cycle");
                break;
            }

            let cycle_id = Uuid::new_v4();
            let span = info_span!("cycle", %cycle_id, mode = self.mode.as_str());
            let result = reconciler.reconcile().instrument(span).await;
            if let Err(err) = &result {
                self.log_failure(cycle_id, err);
            }
            report.record(result);

            let RunMode::Continuous { interval } = self.mode else {
                break;
            };

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = shutdown_requested(&mut shutdown) => {
                    info!("shutdown requested; stopping reconciliation loop");
                    break;
                }
            }
        }

        info!(
            cycles = report.cycles,
            updates = report.updates,
            failures = report.failures,
            "port reconciliation finished"
        );
        report
    }

    fn log_failure(&self, cycle_id: Uuid, err: &SyncError) {
        let detail = err.report();
        match self.mode {
            RunMode::Once => {
                error!(%cycle_id, stage = err.stage(), error = %detail, "reconciliation cycle failed");
            }
            RunMode::Continuous { interval } => {
                warn!(
                    %cycle_id,
                    stage = err.stage(),
                    error = %detail,
                    retry_in_secs = interval.as_secs(),
                    "reconciliation cycle failed"
                );
            }
        }
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
