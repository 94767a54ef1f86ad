//! Timer-driven simulated download.
//!
//! A run advances a percentage from 0 to 100 by a fixed step on a fixed
//! cadence, holds at 100 for a short settle delay, then completes. Only one
//! run may be active at a time.
//!
//! Every observer callback is invoked while the simulator lock is held and
//! only for the run that is still active, so once [`DownloadSimulator::cancel`]
//! returns no further callback for that run can be observed.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::SimulatorConfig;
use crate::error::{Error, Result};
use crate::status::AppStatus;
use crate::types::DownloadOption;

/// Receives the lifecycle of a simulated run
pub trait SimulationObserver: Send + Sync + 'static {
    /// Percent after a tick, non-decreasing, ends at 100
    fn on_progress(&self, percent: u8);

    /// Run finished after the settle delay
    fn on_complete(&self, option: &DownloadOption);

    /// Run was cancelled; `percent` is the value at the time of cancellation
    fn on_cancel(&self, percent: u8);
}

struct ActiveRun {
    id: u64,
    option: DownloadOption,
    token: CancellationToken,
    observer: Arc<dyn SimulationObserver>,
}

#[derive(Default)]
struct SimulatorState {
    active: Option<ActiveRun>,
    percent: u8,
    last_run_id: u64,
}

/// Drives at most one simulated download at a time
#[derive(Clone)]
pub struct DownloadSimulator {
    config: SimulatorConfig,
    state: Arc<Mutex<SimulatorState>>,
}

impl DownloadSimulator {
    /// Create an idle simulator
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(SimulatorState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatorState> {
        lock_state(&self.state)
    }

    /// Start a run for `option`, resetting the percentage to 0.
    ///
    /// Must be called from within a Tokio runtime. Fails with
    /// [`Error::InvalidState`] while another run is active.
    pub fn start(
        &self,
        option: DownloadOption,
        observer: Arc<dyn SimulationObserver>,
    ) -> Result<SimulationHandle> {
        let mut state = self.lock();
        if state.active.is_some() {
            return Err(Error::invalid_state("start download", AppStatus::Downloading));
        }

        state.last_run_id += 1;
        let run_id = state.last_run_id;
        let token = CancellationToken::new();
        state.percent = 0;
        state.active = Some(ActiveRun {
            id: run_id,
            option: option.clone(),
            token: token.clone(),
            observer,
        });
        drop(state);

        tracing::debug!(
            run_id,
            quality = %option.quality,
            format = %option.format,
            "simulated download started"
        );

        let task = tokio::spawn(run_ticks(
            self.state.clone(),
            self.config.clone(),
            run_id,
            token,
        ));

        Ok(SimulationHandle {
            run_id,
            simulator: self.clone(),
            task,
        })
    }

    /// Cancel the active run, if any.
    ///
    /// Resets the percentage to 0 and invokes `on_cancel` exactly once per
    /// run. Returns false when nothing was running; calling it repeatedly is
    /// harmless.
    pub fn cancel(&self) -> bool {
        self.cancel_run(None)
    }

    fn cancel_run(&self, run_id: Option<u64>) -> bool {
        let mut state = self.lock();
        let matches = state
            .active
            .as_ref()
            .is_some_and(|run| run_id.is_none_or(|id| id == run.id));
        if !matches {
            return false;
        }
        let Some(run) = state.active.take() else {
            return false;
        };

        let percent = state.percent;
        state.percent = 0;
        run.token.cancel();
        tracing::debug!(run_id = run.id, percent, "simulated download cancelled");
        run.observer.on_cancel(percent);
        true
    }

    /// Current percentage (0 when idle)
    pub fn percent(&self) -> u8 {
        self.lock().percent
    }

    /// True while a run is active, including its settle delay
    pub fn is_running(&self) -> bool {
        self.lock().active.is_some()
    }
}

/// Handle to one run returned by [`DownloadSimulator::start`]
pub struct SimulationHandle {
    run_id: u64,
    simulator: DownloadSimulator,
    task: tokio::task::JoinHandle<()>,
}

impl SimulationHandle {
    /// Identifier of this run
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Cancel this run. No effect once it finished or another run replaced it.
    pub fn cancel(&self) -> bool {
        self.simulator.cancel_run(Some(self.run_id))
    }

    /// Wait until the run's timer task has exited (completed or cancelled)
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!(run_id = self.run_id, error = %e, "simulation task failed");
        }
    }
}

fn lock_state(state: &Mutex<SimulatorState>) -> MutexGuard<'_, SimulatorState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_ticks(
    state: Arc<Mutex<SimulatorState>>,
    config: SimulatorConfig,
    run_id: u64,
    token: CancellationToken,
) {
    let period = config.tick_interval.max(Duration::from_millis(1));
    let step = config.step.max(1);

    // First tick one period after start, not immediately
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = interval.tick() => {
                let mut guard = lock_state(&state);
                let Some(observer) = guard
                    .active
                    .as_ref()
                    .filter(|run| run.id == run_id)
                    .map(|run| run.observer.clone())
                else {
                    return;
                };

                let percent = guard.percent.saturating_add(step).min(100);
                guard.percent = percent;
                observer.on_progress(percent);
                if percent >= 100 {
                    break;
                }
            }
        }
    }

    tokio::select! {
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(config.settle_delay) => {}
    }

    let mut guard = lock_state(&state);
    if !guard.active.as_ref().is_some_and(|run| run.id == run_id) {
        return;
    }
    if let Some(run) = guard.active.take() {
        guard.percent = 0;
        tracing::debug!(run_id, "simulated download complete");
        run.observer.on_complete(&run.option);
    }
}
