//! Raw file handles produced by intake, before they become queue entries.

use std::path::PathBuf;

/// A file as delivered by a file picker or a drop event.
///
/// `mime_type` may be empty when the host could not determine one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            path: None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Coarse file category used for icons and the storage usage breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Audio,
    Video,
    Document,
    Other,
}

impl FileKind {
    pub fn classify(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileKind::Image
        } else if mime_type.starts_with("audio/") {
            FileKind::Audio
        } else if mime_type.starts_with("video/") {
            FileKind::Video
        } else if mime_type.contains("document")
            || mime_type.contains("pdf")
            || mime_type.contains("text")
        {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }

    pub fn is_media(self) -> bool {
        matches!(self, FileKind::Image | FileKind::Audio | FileKind::Video)
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in base 1024, two decimals with trailing zeros trimmed.
///
/// Sizes beyond the GB range are still expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut divisor: u64 = 1;
    while unit + 1 < SIZE_UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }
    let value = bytes as f64 / divisor as f64;
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
