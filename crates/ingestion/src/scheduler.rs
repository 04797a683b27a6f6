//! Periodic ingestion
//!
//! The scheduler waits a warm-up delay, runs one cycle, then runs a cycle on
//! every tick of a fixed interval measured from that first start. Ticks that
//! fall inside a long cycle are skipped, so cycles never overlap or burst.
//! Each scheduler is an owned task controlled through its [`SchedulerHandle`].
//! Dropping the handle stops the loop without waiting for it.

use crate::errors::IngestionError;
use crate::pipeline::CycleReport;
use async_trait::async_trait;
use papernest_common::config::ArxivConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Shortest accepted interval between cycles
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Something that can run one ingestion cycle
#[async_trait]
pub trait CycleRunner: Send + Sync + 'static {
    async fn run_cycle(&self) -> Result<CycleReport, IngestionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    RunningCycle,
    Stopped,
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

impl From<u8> for SchedulerState {
    fn from(value: u8) -> Self {
        match value {
            RUNNING => SchedulerState::RunningCycle,
            STOPPED => SchedulerState::Stopped,
            _ => SchedulerState::Idle,
        }
    }
}

/// Timing of a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub warmup: Duration,
    pub interval: Duration,
}

impl Schedule {
    pub fn from_config(config: &ArxivConfig) -> Self {
        Self {
            warmup: config.warmup(),
            interval: config.fetch_interval(),
        }
    }
}

pub struct Scheduler;

impl Scheduler {
    /// Spawn the scheduling loop on the current runtime
    pub fn start(runner: Arc<dyn CycleRunner>, schedule: Schedule) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let state = Arc::new(AtomicU8::new(IDLE));
        let cycles = Arc::new(AtomicU64::new(0));

        info!(
            warmup_secs = schedule.warmup.as_secs(),
            interval_secs = schedule.interval.as_secs(),
            "Starting scheduler"
        );

        let task = tokio::spawn(run_loop(
            runner,
            schedule,
            stop_rx,
            Arc::clone(&state),
            Arc::clone(&cycles),
        ));

        SchedulerHandle {
            stop_tx,
            task,
            state,
            cycles,
        }
    }
}

/// Owned handle to a running scheduler
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    state: Arc<AtomicU8>,
    cycles: Arc<AtomicU64>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        self.state.load(Ordering::Acquire).into()
    }

    /// Cycles finished so far, failed ones included
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Acquire)
    }

    /// Stop scheduling. A cycle already in flight runs to completion first.
    pub async fn stop(self) {
        // Err only when the loop already exited
        let _ = self.stop_tx.send(true);

        if let Err(e) = self.task.await {
            error!(error = %e, "Scheduler task ended abnormally");
        }
        info!("Scheduler stopped");
    }
}

async fn run_loop(
    runner: Arc<dyn CycleRunner>,
    schedule: Schedule,
    mut stop_rx: watch::Receiver<bool>,
    state: Arc<AtomicU8>,
    cycles: Arc<AtomicU64>,
) {
    let period = schedule.interval.max(MIN_INTERVAL);
    let mut ticker = interval_at(Instant::now() + schedule.warmup, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop_rx.changed() => {}
        }

        // Stop wins over a tick that became ready at the same time
        let stop_requested = *stop_rx.borrow();
        if stop_requested || stop_rx.has_changed().is_err() {
            break;
        }

        state.store(RUNNING, Ordering::Release);
        match runner.run_cycle().await {
            Ok(report) => info!(stored = report.stored, failed = report.failed, "Scheduled cycle finished"),
            Err(e) => error!(error = %e, "Scheduled cycle failed, waiting for next tick"),
        }
        cycles.fetch_add(1, Ordering::AcqRel);
        state.store(IDLE, Ordering::Release);
    }

    state.store(STOPPED, Ordering::Release);
}
