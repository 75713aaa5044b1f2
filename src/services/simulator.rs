//! Progress simulator: advances each entry's progress on its own timer
//! until it reaches 100%.
//!
//! Every entry gets an independent tokio task ticking at a fixed period. A
//! task stops when its entry completes, when its cancellation token fires, or
//! when the entry is no longer in the store.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::entry::{EntryId, EntryPatch, PROGRESS_COMPLETE};
use crate::models::upload::SimulationConfig;
use crate::services::notify::{Notification, Notifier};
use crate::services::store::QueueStore;

/// Source of per-tick progress increments.
pub trait ProgressStrategy: Send {
    fn next_increment(&mut self) -> u8;
}

/// Uniformly random increments in `[min, max]`.
pub struct RandomIncrement {
    rng: StdRng,
    min: u8,
    max: u8,
}

impl RandomIncrement {
    pub fn new(min: u8, max: u8) -> Self {
        Self::with_rng(StdRng::from_entropy(), min, max)
    }

    pub fn seeded(seed: u64, min: u8, max: u8) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), min, max)
    }

    fn with_rng(rng: StdRng, min: u8, max: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { rng, min, max }
    }
}

impl ProgressStrategy for RandomIncrement {
    fn next_increment(&mut self) -> u8 {
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Replays a fixed sequence of increments, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedIncrement {
    steps: Vec<u8>,
    pos: usize,
}

impl ScriptedIncrement {
    pub fn new(steps: Vec<u8>) -> Self {
        Self { steps, pos: 0 }
    }
}

impl ProgressStrategy for ScriptedIncrement {
    fn next_increment(&mut self) -> u8 {
        if self.steps.is_empty() {
            return 1;
        }
        let step = self.steps[self.pos % self.steps.len()];
        self.pos += 1;
        step
    }
}

/// Builds one strategy per simulated entry.
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn ProgressStrategy> + Send + Sync>;

pub fn random_strategy(config: &SimulationConfig) -> StrategyFactory {
    let (min, max) = (config.min_increment, config.max_increment);
    Arc::new(move || Box::new(RandomIncrement::new(min, max)) as Box<dyn ProgressStrategy>)
}

pub fn scripted_strategy(steps: Vec<u8>) -> StrategyFactory {
    Arc::new(move || Box::new(ScriptedIncrement::new(steps.clone())) as Box<dyn ProgressStrategy>)
}

/// Result of applying one increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Pending(u8),
    Complete,
}

/// `min(100, progress + increment)`. A zero increment counts as 1.
pub fn advance(progress: u8, increment: u8) -> Tick {
    let next = progress.saturating_add(increment.max(1));
    if next >= PROGRESS_COMPLETE {
        Tick::Complete
    } else {
        Tick::Pending(next)
    }
}

/// How a simulation task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationOutcome {
    Completed,
    Cancelled,
    /// The entry disappeared from the store before completing.
    Orphaned,
}

/// Handle to a running simulation task.
pub struct SimulationHandle {
    token: CancellationToken,
    join: JoinHandle<SimulationOutcome>,
}

impl SimulationHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub async fn join(self) -> crate::error::Result<SimulationOutcome> {
        self.join
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
    }
}

pub struct ProgressSimulator {
    store: Arc<QueueStore>,
    notifier: Arc<dyn Notifier>,
    tick_interval: Duration,
    strategies: StrategyFactory,
    runtime: Handle,
}

impl ProgressSimulator {
    pub fn new(
        store: Arc<QueueStore>,
        notifier: Arc<dyn Notifier>,
        config: &SimulationConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            store,
            notifier,
            tick_interval: config.tick_interval(),
            strategies: random_strategy(config),
            runtime,
        }
    }

    /// Replace the increment source, e.g. with a scripted one in tests.
    pub fn with_strategy(mut self, strategies: StrategyFactory) -> Self {
        self.set_strategy(strategies);
        self
    }

    /// Applies to simulations started afterwards.
    pub fn set_strategy(&mut self, strategies: StrategyFactory) {
        self.strategies = strategies;
    }

    /// Spawn the simulation task for `entry_id` on the captured runtime.
    /// Callable from threads outside the runtime.
    pub fn start(&self, entry_id: EntryId) -> SimulationHandle {
        let token = CancellationToken::new();
        let join = self.runtime.spawn(run(
            entry_id,
            self.store.clone(),
            self.notifier.clone(),
            self.tick_interval,
            (self.strategies)(),
            token.clone(),
        ));
        SimulationHandle { token, join }
    }
}

async fn run(
    entry_id: EntryId,
    store: Arc<QueueStore>,
    notifier: Arc<dyn Notifier>,
    period: Duration,
    mut strategy: Box<dyn ProgressStrategy>,
    token: CancellationToken,
) -> SimulationOutcome {
    // first tick fires one full period after start
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                log::debug!("Simulation for {} cancelled", entry_id);
                return SimulationOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        let Some(progress) = store.progress(&entry_id) else {
            log::debug!("Entry {} gone, stopping simulation", entry_id);
            return SimulationOutcome::Orphaned;
        };
        if progress >= PROGRESS_COMPLETE {
            return SimulationOutcome::Completed;
        }

        match advance(progress, strategy.next_increment()) {
            Tick::Pending(next) => {
                if !store.update(&entry_id, EntryPatch::progress(next)) {
                    log::debug!("Entry {} gone, stopping simulation", entry_id);
                    return SimulationOutcome::Orphaned;
                }
            }
            Tick::Complete => {
                if !store.update(&entry_id, EntryPatch::completed()) {
                    log::debug!("Entry {} gone, stopping simulation", entry_id);
                    return SimulationOutcome::Orphaned;
                }
                log::info!("Upload of entry {} complete", entry_id);
                notifier.notify(Notification::upload_complete());
                return SimulationOutcome::Completed;
            }
        }
    }
}
