//! Local preview handles for image entries.
//!
//! A handle is acquired when an image entry is created and released exactly
//! once when it is dropped, which happens when its entry leaves the queue
//! (removal, clear, or teardown).

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::file::RawFile;

const PREVIEW_URL_PREFIX: &str = "blob:dropvault/";

/// Tracks every preview handle currently alive.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashSet<String>>,
    released: AtomicU64,
}

impl PreviewRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Acquire a preview for `file`. Non-image files get `None`.
    pub fn acquire(self: &Arc<Self>, file: &RawFile) -> Option<PreviewHandle> {
        if !file.is_image() {
            return None;
        }
        let url = format!(
            "{}{}",
            PREVIEW_URL_PREFIX,
            uuid::Uuid::new_v4().simple()
        );
        self.live_set().insert(url.clone());
        log::debug!("Acquired preview {} for '{}'", url, file.name);
        Some(PreviewHandle {
            url,
            registry: Arc::clone(self),
        })
    }

    pub fn live_count(&self) -> usize {
        self.live_set().len()
    }

    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    fn release(&self, url: &str) {
        if self.live_set().remove(url) {
            self.released.fetch_add(1, Ordering::Relaxed);
            log::debug!("Released preview {}", url);
        } else {
            log::warn!("Preview {} released twice", url);
        }
    }

    fn live_set(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive owner of one preview resource. Not `Clone`.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_files_get_a_handle() {
        let registry = PreviewRegistry::new();
        let handle = registry
            .acquire(&RawFile::new("cat.png", 10, "image/png"))
            .unwrap();
        assert!(handle.url().starts_with(PREVIEW_URL_PREFIX));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn non_image_files_get_none() {
        let registry = PreviewRegistry::new();
        assert!(registry
            .acquire(&RawFile::new("notes.txt", 10, "text/plain"))
            .is_none());
        assert!(registry.acquire(&RawFile::new("blob", 10, "")).is_none());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn drop_releases_exactly_once() {
        let registry = PreviewRegistry::new();
        let a = registry.acquire(&RawFile::new("a.jpg", 1, "image/jpeg")).unwrap();
        let b = registry.acquire(&RawFile::new("b.gif", 1, "image/gif")).unwrap();
        assert_ne!(a.url(), b.url());
        assert_eq!(registry.live_count(), 2);

        drop(a);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.released_count(), 1);

        drop(b);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.released_count(), 2);
    }
}
