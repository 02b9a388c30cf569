//! Polling loop driving fetch, diff, commit, alert and report

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use super::config::MonitorConfig;
use super::notifier::NotificationChannel;
use super::state::TrackerState;
use crate::fares::{aggregate, diff, evaluate, DiffResult, FareSnapshot, RawObservationBatch};
use crate::report::{fare_summary, DisplaySink, PlotPoint, ReportEvent};
use crate::source::FareSource;

/// Lifecycle of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// What happened to the deal alert in a committed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    NotFired,
    Delivered(String),
    Failed { message: String, error: String },
}

/// Result of a single cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot was complete and is now the tracked baseline
    Committed {
        snapshot: FareSnapshot,
        diff: DiffResult,
        alert: AlertOutcome,
    },
    /// Snapshot was missing a leg; state and alerts untouched
    Skipped {
        snapshot: FareSnapshot,
        diff: DiffResult,
    },
}

impl CycleOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CycleOutcome::Committed { .. })
    }
}

/// Fare monitor loop
pub struct Scheduler {
    config: Arc<MonitorConfig>,
    source: Arc<dyn FareSource>,
    notifier: Arc<dyn NotificationChannel>,
    sinks: Vec<Arc<dyn DisplaySink>>,
    tracker: TrackerState,
    state: SchedulerState,
    cycles: u64,
}

impl Scheduler {
    /// Create a scheduler with no display sinks
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn FareSource>,
        notifier: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            source,
            notifier,
            sinks: Vec::new(),
            tracker: TrackerState::new(),
            state: SchedulerState::Stopped,
            cycles: 0,
        }
    }

    /// Add display sink
    pub fn with_sink(mut self, sink: Arc<dyn DisplaySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Start from an existing baseline instead of an empty one
    pub fn with_tracker(mut self, tracker: TrackerState) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &TrackerState {
        &self.tracker
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Spawn the loop onto the runtime
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let join = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown_tx, join }
    }

    /// Run cycles until a shutdown message arrives or the sender is dropped.
    ///
    /// The first cycle runs immediately. Each wait starts after the previous
    /// cycle has reported, and shutdown is only observed between cycles.
    pub async fn run(mut self, mut shutdown: mpsc::Receiver<()>) -> TrackerState {
        self.state = SchedulerState::Running;
        tracing::info!(
            origin = %self.config.origin,
            destination = %self.config.destination,
            interval_minutes = self.config.interval_minutes(),
            "Fare monitor started"
        );
        self.publish(ReportEvent::SettingsInfo(self.config.settings_lines()))
            .await;

        loop {
            self.run_cycle().await;

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Fare monitor shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        self.state = SchedulerState::Stopped;
        tracing::info!(cycles = self.cycles, "Fare monitor stopped");
        self.tracker
    }

    /// Run one full cycle against the configured source
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.cycles += 1;
        let cycle = self.cycles;

        let batch = match self.source.fetch(&self.config).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(cycle, error = %e, "Fare fetch failed");
                RawObservationBatch::new()
            }
        };

        self.process_batch(&batch).await
    }

    async fn process_batch(&mut self, batch: &RawObservationBatch) -> CycleOutcome {
        let cycle = self.cycles;
        let snapshot = aggregate(batch);
        let diff = diff(self.tracker.read(), &snapshot);

        if !diff.is_valid {
            tracing::warn!(
                cycle,
                fragments = batch.len(),
                outbound = ?snapshot.outbound,
                inbound = ?snapshot.inbound,
                "Incomplete fares this cycle, keeping previous baseline"
            );
            return CycleOutcome::Skipped { snapshot, diff };
        }

        self.tracker.commit(snapshot);
        tracing::debug!(cycle, ?snapshot, "Committed fares");

        let alert = self.dispatch_alert(&snapshot).await;

        let mut lines = fare_summary(&snapshot, &diff);
        match &alert {
            AlertOutcome::NotFired => {}
            AlertOutcome::Delivered(message) => lines.push(format!("Deal alert sent: {}", message)),
            AlertOutcome::Failed { error, .. } => {
                lines.push(format!("Failed to send deal alert: {}", error))
            }
        }
        self.publish(ReportEvent::LogLines(lines)).await;

        if let (Some(outbound), Some(inbound)) = (snapshot.outbound, snapshot.inbound) {
            self.publish(ReportEvent::PlotPoint(PlotPoint {
                outbound,
                inbound,
                at: Utc::now(),
            }))
            .await;
        }

        CycleOutcome::Committed {
            snapshot,
            diff,
            alert,
        }
    }

    async fn dispatch_alert(&self, snapshot: &FareSnapshot) -> AlertOutcome {
        let decision = evaluate(snapshot, self.config.deal_threshold);
        if !decision.fire {
            return AlertOutcome::NotFired;
        }

        match self.notifier.notify(&decision.message).await {
            Ok(()) => {
                tracing::info!(message = %decision.message, "Deal alert sent");
                AlertOutcome::Delivered(decision.message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send deal alert");
                AlertOutcome::Failed {
                    message: decision.message,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn publish(&self, event: ReportEvent) {
        futures::future::join_all(self.sinks.iter().map(|sink| sink.report(&event))).await;
    }
}

/// Handle to a spawned scheduler
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: tokio::task::JoinHandle<TrackerState>,
}

impl SchedulerHandle {
    /// Ask the loop to stop and wait for it, letting an in-flight cycle finish
    pub async fn stop(self) -> Result<TrackerState, tokio::task::JoinError> {
        let _ = self.shutdown_tx.send(()).await;
        self.join.await
    }

    pub fn state(&self) -> SchedulerState {
        if self.join.is_finished() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running
        }
    }
}
