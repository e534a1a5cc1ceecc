//! Interval driver for the pipeline
//!
//! The first tick fires immediately, then one every `check_interval`. A tick
//! that outlasts the interval is never run concurrently with the next one:
//! the overlapping firing is dropped and logged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::pipeline::{HeadlinePipeline, PipelineState, TickOutcome};

pub struct Scheduler {
    pipeline: Arc<HeadlinePipeline>,
    state: Arc<Mutex<PipelineState>>,
    check_interval: Duration,
}

impl Scheduler {
    pub fn new(pipeline: Arc<HeadlinePipeline>) -> Self {
        let check_interval = pipeline.config().check_interval;
        Self {
            pipeline,
            state: Arc::new(Mutex::new(PipelineState::default())),
            check_interval,
        }
    }

    /// Start a tick on its own task, or return `None` if one is still running
    pub fn try_fire(&self) -> Option<JoinHandle<TickOutcome>> {
        let Ok(mut guard) = Arc::clone(&self.state).try_lock_owned() else {
            warn!("Previous tick still running, skipping this one");
            return None;
        };

        let pipeline = Arc::clone(&self.pipeline);
        Some(tokio::spawn(async move {
            let (next, outcome) = pipeline.tick(guard.clone()).await;
            *guard = next;
            debug!(?outcome, "Tick finished");
            outcome
        }))
    }

    /// Fire on the interval until `shutdown` resolves, then wait for the running tick
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        info!(
            "Headliner started. Running every {} minutes. Cooldown after report: {} minutes.",
            self.check_interval.as_secs() / 60,
            self.pipeline.config().cooldown.as_secs() / 60
        );

        let mut ticker = interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, waiting for the running tick to finish");
                    break;
                }
                _ = ticker.tick() => {
                    // Dropping the handle detaches the task
                    let _ = self.try_fire();
                }
            }
        }

        let _ = self.state.lock().await;
        info!("Scheduler stopped");
    }

    /// Snapshot of the state carried between ticks
    pub async fn state(&self) -> PipelineState {
        self.state.lock().await.clone()
    }
}
