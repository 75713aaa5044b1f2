//! Upload queue manager: turns intake batches into tracked entries, starts
//! one simulation task per entry and cancels it again on removal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;

use crate::error::AppError;
use crate::models::entry::{EntryId, EntryView};
use crate::models::file::RawFile;
use crate::models::upload::SimulationConfig;
use crate::services::factory::EntryFactory;
use crate::services::intake::IntakeSource;
use crate::services::notify::{Notification, Notifier};
use crate::services::preview::PreviewRegistry;
use crate::services::simulator::{ProgressSimulator, SimulationHandle, StrategyFactory};
use crate::services::store::QueueStore;

pub struct UploadQueue {
    store: Arc<QueueStore>,
    factory: EntryFactory,
    simulator: ProgressSimulator,
    notifier: Arc<dyn Notifier>,
    tasks: Mutex<HashMap<EntryId, SimulationHandle>>,
}

impl UploadQueue {
    /// Build an empty queue bound to the current tokio runtime. Later calls
    /// may come from any thread; simulations are spawned on that runtime.
    pub fn new(config: &SimulationConfig, notifier: Arc<dyn Notifier>) -> crate::error::Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()
            .map_err(|e| AppError::Internal(format!("No tokio runtime for upload queue: {}", e)))?;
        let store = Arc::new(QueueStore::new());
        let simulator = ProgressSimulator::new(store.clone(), notifier.clone(), config, runtime);
        Ok(Self {
            store,
            factory: EntryFactory::new(PreviewRegistry::new()),
            simulator,
            notifier,
            tasks: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_strategy(mut self, strategies: StrategyFactory) -> Self {
        self.simulator.set_strategy(strategies);
        self
    }

    pub fn store(&self) -> &Arc<QueueStore> {
        &self.store
    }

    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        self.factory.previews()
    }

    pub fn add(&self, source: IntakeSource) -> Vec<EntryId> {
        self.add_files(source.into_files())
    }

    /// Queue `files` in order and start simulating each of them.
    ///
    /// An empty batch is ignored. Otherwise a single "added" notification is
    /// raised for the whole batch. Simulations are started before the entries
    /// become visible; their first tick is one period away.
    pub fn add_files(&self, files: Vec<RawFile>) -> Vec<EntryId> {
        if files.is_empty() {
            return Vec::new();
        }

        let entries = self.factory.create_many(&files);
        let ids: Vec<EntryId> = entries.iter().map(|e| e.id.clone()).collect();
        let handles: Vec<(EntryId, SimulationHandle)> = ids
            .iter()
            .map(|id| (id.clone(), self.simulator.start(id.clone())))
            .collect();
        self.store.insert_many(entries);

        {
            let mut tasks = self.tasks();
            tasks.retain(|_, handle| !handle.is_finished());
            tasks.extend(handles);
        }

        log::info!("Queued {} file(s) for upload", ids.len());
        self.notifier.notify(Notification::files_added(ids.len()));
        ids
    }

    /// Cancel the entry's simulation, remove it from the store and release
    /// its preview. Returns whether an entry was removed.
    pub fn remove(&self, id: &str) -> bool {
        if let Some(handle) = self.tasks().remove(id) {
            handle.cancel();
        }
        let removed = self.store.remove(id);
        if removed {
            log::info!("Removed entry {} from queue", id);
            self.notifier.notify(Notification::file_removed());
        }
        removed
    }

    pub fn snapshot(&self) -> Vec<EntryView> {
        self.store.snapshot()
    }

    /// Number of simulation tasks still running.
    pub fn active_simulations(&self) -> usize {
        let mut tasks = self.tasks();
        tasks.retain(|_, handle| !handle.is_finished());
        tasks.len()
    }

    /// Cancel every simulation and empty the queue, releasing all previews.
    /// Returns how many entries were dropped.
    pub fn shutdown(&self) -> usize {
        let handles: Vec<SimulationHandle> = self.tasks().drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.cancel();
        }
        let cleared = self.store.clear();
        if cleared > 0 {
            log::info!("Upload queue shut down, {} entr(ies) dropped", cleared);
        }
        cleared
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<EntryId, SimulationHandle>> {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for UploadQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}
