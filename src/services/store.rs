//! Queue store: the ordered collection of live entries.
//!
//! Every mutation happens under one mutex that is never held across an
//! `.await`, so simulator tasks and user actions can call in from any thread.
//! Each effective change bumps a revision published on a watch channel.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

use crate::models::entry::{EntryPatch, EntryView, QueueEntry};

pub struct QueueStore {
    entries: Mutex<Vec<QueueEntry>>,
    revision: watch::Sender<u64>,
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Mutex::new(Vec::new()),
            revision,
        }
    }

    /// Receiver that observes a new revision after every effective change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Append entries in order. Entries whose id is already present are
    /// dropped. Returns the number appended.
    pub fn insert_many(&self, new_entries: Vec<QueueEntry>) -> usize {
        let mut rejected = Vec::new();
        let inserted = {
            let mut entries = self.lock();
            let mut inserted = 0;
            for entry in new_entries {
                if entries.iter().any(|e| e.id == entry.id) {
                    log::warn!("Duplicate entry id {} ignored", entry.id);
                    rejected.push(entry);
                    continue;
                }
                entries.push(entry);
                inserted += 1;
            }
            inserted
        };
        // rejected entries release their previews outside the lock
        drop(rejected);
        if inserted > 0 {
            self.bump();
        }
        inserted
    }

    /// Merge `patch` into the entry with `id`. Returns `false` when the id is
    /// absent, which is otherwise a no-op.
    pub fn update(&self, id: &str, patch: EntryPatch) -> bool {
        let changed = {
            let mut entries = self.lock();
            match entries.iter_mut().find(|e| e.id == id) {
                Some(entry) => entry.apply(patch),
                None => return false,
            }
        };
        if changed {
            self.bump();
        }
        true
    }

    /// Remove the entry with `id`, releasing its preview. Returns whether an
    /// entry was removed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut entries = self.lock();
            entries
                .iter()
                .position(|e| e.id == id)
                .map(|idx| entries.remove(idx))
        };
        match removed {
            Some(entry) => {
                drop(entry);
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Remove every entry, releasing all previews. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let drained: Vec<QueueEntry> = std::mem::take(&mut *self.lock());
        let count = drained.len();
        drop(drained);
        if count > 0 {
            self.bump();
        }
        count
    }

    pub fn get(&self, id: &str) -> Option<EntryView> {
        self.lock().iter().find(|e| e.id == id).map(QueueEntry::view)
    }

    /// Current progress of `id`, `None` when absent.
    pub fn progress(&self, id: &str) -> Option<u8> {
        self.lock().iter().find(|e| e.id == id).map(QueueEntry::progress)
    }

    /// Ordered snapshot of the whole queue.
    pub fn snapshot(&self) -> Vec<EntryView> {
        self.lock().iter().map(QueueEntry::view).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QueueEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
