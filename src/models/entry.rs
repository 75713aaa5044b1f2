//! Queue entry model: one tracked file in the upload queue.

use serde::Serialize;

use crate::models::file::{FileKind, RawFile};
use crate::services::preview::PreviewHandle;

/// Opaque entry identifier (UUID v4 hex, 32 chars).
pub type EntryId = String;

pub const PROGRESS_COMPLETE: u8 = 100;

/// A tracked file in the upload queue.
///
/// Owns its preview handle exclusively; dropping the entry releases it.
/// Fields are mutated only through [`QueueEntry::apply`], which the queue
/// store calls under its lock.
#[derive(Debug)]
pub struct QueueEntry {
    pub id: EntryId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    progress: u8,
    uploaded: bool,
    error: Option<String>,
    preview: Option<PreviewHandle>,
}

impl QueueEntry {
    pub fn new(id: EntryId, file: &RawFile, preview: Option<PreviewHandle>) -> Self {
        Self {
            id,
            name: file.name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
            progress: 0,
            uploaded: false,
            error: None,
            preview,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn kind(&self) -> FileKind {
        FileKind::classify(&self.mime_type)
    }

    /// Merge a partial update.
    ///
    /// Once uploaded the entry is terminal and every patch is ignored.
    /// Progress never decreases and is capped at 100; reaching 100 marks the
    /// entry uploaded. Returns whether anything changed.
    pub fn apply(&mut self, patch: EntryPatch) -> bool {
        if self.uploaded {
            return false;
        }
        let mut changed = false;

        let mut target = self.progress;
        if let Some(progress) = patch.progress {
            target = target.max(progress.min(PROGRESS_COMPLETE));
        }
        if patch.uploaded == Some(true) {
            target = PROGRESS_COMPLETE;
        }
        if target != self.progress {
            self.progress = target;
            changed = true;
        }
        if self.progress == PROGRESS_COMPLETE {
            self.uploaded = true;
            changed = true;
        }

        if let Some(error) = patch.error {
            if self.error.as_ref() != Some(&error) {
                self.error = Some(error);
                changed = true;
            }
        }
        changed
    }

    pub fn status(&self) -> EntryStatus {
        if self.uploaded {
            EntryStatus::Uploaded
        } else if self.error.is_some() {
            EntryStatus::Failed
        } else {
            EntryStatus::Uploading {
                progress: self.progress,
            }
        }
    }

    pub fn view(&self) -> EntryView {
        EntryView {
            id: self.id.clone(),
            name: self.name.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
            kind: self.kind(),
            progress: self.progress,
            uploaded: self.uploaded,
            error: self.error.clone(),
            preview_url: self.preview.as_ref().map(|p| p.url().to_string()),
            status: self.status(),
        }
    }
}

/// Partial update merged into an entry by the queue store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub progress: Option<u8>,
    pub uploaded: Option<bool>,
    pub error: Option<String>,
}

impl EntryPatch {
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            progress: Some(PROGRESS_COMPLETE),
            uploaded: Some(true),
            error: None,
        }
    }
}

/// Display status derived from an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EntryStatus {
    Uploading { progress: u8 },
    Uploaded,
    Failed,
}

/// Read-only snapshot of an entry handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: EntryId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub kind: FileKind,
    pub progress: u8,
    pub uploaded: bool,
    pub error: Option<String>,
    pub preview_url: Option<String>,
    pub status: EntryStatus,
}
