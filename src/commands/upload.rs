//! Command handlers for the upload queue.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::models::entry::{EntryId, EntryView};
use crate::models::file::RawFile;
use crate::models::upload::SimulationConfig;
use crate::services::intake::{self, DragEvent, DropZone, IntakeSource};
use crate::services::notify::Notifier;
use crate::services::upload_queue::UploadQueue;
use crate::services::usage::{StorageUsage, UsageReport};

/// Managed state for the upload view.
pub struct UploadState {
    pub queue: Arc<UploadQueue>,
    drop_zone: Mutex<DropZone>,
}

impl UploadState {
    pub fn new(config: &SimulationConfig, notifier: Arc<dyn Notifier>) -> crate::error::Result<Self> {
        Ok(Self::from_queue(UploadQueue::new(config, notifier)?))
    }

    pub fn from_queue(queue: UploadQueue) -> Self {
        Self {
            queue: Arc::new(queue),
            drop_zone: Mutex::new(DropZone::new()),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drop_zone
            .lock()
            .map(|zone| zone.is_dragging())
            .unwrap_or(false)
    }
}

/// File picker change event.
pub fn select_files(files: Vec<RawFile>, state: &UploadState) -> Vec<EntryId> {
    state.queue.add(IntakeSource::Picker(files))
}

/// Drag event on the drop zone. Returns the ids queued by a drop.
pub fn drag_event(event: DragEvent, state: &UploadState) -> Result<Vec<EntryId>, String> {
    let batch = {
        let mut zone = state.drop_zone.lock().map_err(|e| e.to_string())?;
        zone.handle(event)
    };
    Ok(batch.map(|b| state.queue.add(b)).unwrap_or_default())
}

/// Filesystem paths dropped onto the window.
pub async fn drop_paths(paths: Vec<PathBuf>, state: &UploadState) -> Result<Vec<EntryId>, String> {
    let files = tokio::task::spawn_blocking(move || intake::resolve_dropped_paths(&paths))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    Ok(state.queue.add(IntakeSource::Drop(files)))
}

pub fn remove_file(id: String, state: &UploadState) -> Result<(), String> {
    if state.queue.remove(&id) {
        Ok(())
    } else {
        Err(format!("No queued file with id: {}", id))
    }
}

pub fn list_files(state: &UploadState) -> Vec<EntryView> {
    state.queue.snapshot()
}

/// Sidebar storage summary over uploaded files.
pub fn storage_usage(state: &UploadState) -> UsageReport {
    StorageUsage::from_entries(&state.queue.snapshot()).report()
}

/// Revision counter that changes whenever the queue does.
pub fn subscribe(state: &UploadState) -> watch::Receiver<u64> {
    state.queue.store().subscribe()
}
