//! Queue entry factory: wraps raw file handles into tracked entries.

use std::sync::Arc;

use crate::models::entry::{EntryId, QueueEntry};
use crate::models::file::RawFile;
use crate::services::preview::PreviewRegistry;

pub struct EntryFactory {
    previews: Arc<PreviewRegistry>,
}

impl EntryFactory {
    pub fn new(previews: Arc<PreviewRegistry>) -> Self {
        Self { previews }
    }

    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        &self.previews
    }

    /// Fresh id, zero progress, preview only for images.
    pub fn create(&self, file: &RawFile) -> QueueEntry {
        let id: EntryId = uuid::Uuid::new_v4().simple().to_string();
        let preview = self.previews.acquire(file);
        log::debug!(
            "Created entry {} for '{}' ({} bytes, type '{}')",
            id,
            file.name,
            file.size,
            file.mime_type
        );
        QueueEntry::new(id, file, preview)
    }

    pub fn create_many(&self, files: &[RawFile]) -> Vec<QueueEntry> {
        files.iter().map(|f| self.create(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_initial_state() {
        let factory = EntryFactory::new(PreviewRegistry::new());
        let entry = factory.create(&RawFile::new("report.pdf", 2_048_000, "application/pdf"));
        assert_eq!(entry.id.len(), 32);
        assert!(entry.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(entry.name, "report.pdf");
        assert_eq!(entry.size, 2_048_000);
        assert_eq!(entry.mime_type, "application/pdf");
        assert_eq!(entry.progress(), 0);
        assert!(!entry.uploaded());
        assert!(entry.error().is_none());
        assert!(entry.preview().is_none());
    }

    #[test]
    fn test_image_gets_preview_text_does_not() {
        let registry = PreviewRegistry::new();
        let factory = EntryFactory::new(registry.clone());
        let image = factory.create(&RawFile::new("shot.png", 10, "image/png"));
        let text = factory.create(&RawFile::new("notes.txt", 10, "text/plain"));
        assert!(image.preview().is_some());
        assert!(text.preview().is_none());
        assert_eq!(registry.live_count(), 1);

        drop(image);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_create_many_unique_ids_in_order() {
        let factory = EntryFactory::new(PreviewRegistry::new());
        let files = vec![
            RawFile::new("a", 1, ""),
            RawFile::new("b", 2, ""),
            RawFile::new("c", 3, ""),
        ];
        let entries = factory.create_many(&files);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
