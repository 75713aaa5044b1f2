//! Storage usage summary shown in the sidebar.

use serde::Serialize;

use crate::models::entry::EntryView;
use crate::models::file::{format_file_size, FileKind};

/// Vault capacity: 15 GB.
pub const DEFAULT_QUOTA_BYTES: u64 = 15 * 1_073_741_824;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub documents: u64,
    pub media: u64,
    pub other: u64,
    pub quota: u64,
}

impl Default for StorageUsage {
    fn default() -> Self {
        Self {
            documents: 0,
            media: 0,
            other: 0,
            quota: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl StorageUsage {
    /// Sum sizes of uploaded entries by category. In-flight entries are not
    /// counted.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a EntryView>) -> Self {
        let mut usage = Self::default();
        for entry in entries.into_iter().filter(|e| e.uploaded) {
            match entry.kind {
                FileKind::Document => usage.documents += entry.size,
                kind if kind.is_media() => usage.media += entry.size,
                _ => usage.other += entry.size,
            }
        }
        usage
    }

    pub fn with_quota(mut self, quota: u64) -> Self {
        self.quota = quota;
        self
    }

    pub fn total(&self) -> u64 {
        self.documents + self.media + self.other
    }

    /// Share of the quota in use, clamped to `[0, 1]`. A zero quota counts as
    /// full as soon as anything is stored.
    pub fn used_fraction(&self) -> f64 {
        let total = self.total();
        if self.quota == 0 {
            return if total > 0 { 1.0 } else { 0.0 };
        }
        (total as f64 / self.quota as f64).min(1.0)
    }

    /// "Using 3.5 GB of 15 GB".
    pub fn summary(&self) -> String {
        format!(
            "Using {} of {}",
            format_file_size(self.total()),
            format_file_size(self.quota)
        )
    }

    pub fn report(&self) -> UsageReport {
        UsageReport {
            summary: self.summary(),
            used_percent: (self.used_fraction() * 100.0).round() as u8,
            rows: vec![
                UsageRow::new("Documents", self.documents),
                UsageRow::new("Media", self.media),
                UsageRow::new("Other", self.other),
            ],
            usage: *self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRow {
    pub label: &'static str,
    pub bytes: u64,
    pub size: String,
}

impl UsageRow {
    fn new(label: &'static str, bytes: u64) -> Self {
        Self {
            label,
            bytes,
            size: format_file_size(bytes),
        }
    }
}

/// Sidebar contents: summary line, bar width and per-category rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub usage: StorageUsage,
    pub summary: String,
    pub used_percent: u8,
    pub rows: Vec<UsageRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::{EntryPatch, QueueEntry};
    use crate::models::file::RawFile;

    const GIB: u64 = 1_073_741_824;

    fn view(name: &str, size: u64, mime: &str, uploaded: bool) -> EntryView {
        let mut entry = QueueEntry::new(name.to_string(), &RawFile::new(name, size, mime), None);
        if uploaded {
            entry.apply(EntryPatch::completed());
        }
        entry.view()
    }

    #[test]
    fn groups_uploaded_entries_by_kind() {
        let entries = vec![
            view("a.pdf", 1024, "application/pdf", true),
            view("b.png", 2048, "image/png", true),
            view("c.mp4", 1024, "video/mp4", true),
            view("d.zip", 512, "application/zip", true),
            view("e.txt", 9999, "text/plain", false),
        ];
        let usage = StorageUsage::from_entries(&entries);
        assert_eq!(usage.documents, 1024);
        assert_eq!(usage.media, 3072);
        assert_eq!(usage.other, 512);
        assert_eq!(usage.total(), 4608);
        assert_eq!(usage.quota, DEFAULT_QUOTA_BYTES);
    }

    #[test]
    fn summary_and_fraction_against_quota() {
        let usage = StorageUsage {
            documents: GIB + GIB / 2,
            media: 2 * GIB,
            other: 0,
            quota: DEFAULT_QUOTA_BYTES,
        };
        assert_eq!(usage.summary(), "Using 3.5 GB of 15 GB");
        assert!((usage.used_fraction() - 3.5 / 15.0).abs() < 1e-9);
        assert_eq!(usage.report().used_percent, 23);
    }

    #[test]
    fn fraction_is_clamped() {
        let over = StorageUsage {
            other: 20 * GIB,
            ..Default::default()
        };
        assert_eq!(over.used_fraction(), 1.0);

        let empty = StorageUsage::default().with_quota(0);
        assert_eq!(empty.used_fraction(), 0.0);
        let full = StorageUsage {
            media: 1,
            ..Default::default()
        }
        .with_quota(0);
        assert_eq!(full.used_fraction(), 1.0);
    }

    #[test]
    fn report_rows_are_formatted() {
        let report = StorageUsage {
            documents: 1536,
            media: 0,
            other: 2_048_000,
            quota: DEFAULT_QUOTA_BYTES,
        }
        .report();
        let rows: Vec<(&str, &str)> = report
            .rows
            .iter()
            .map(|r| (r.label, r.size.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("Documents", "1.5 KB"), ("Media", "0 Bytes"), ("Other", "1.95 MB")]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("usedPercent").is_some());
        assert_eq!(json["usage"]["quota"], DEFAULT_QUOTA_BYTES);
    }
}
