//! File intake: normalizes picker selections, drop events and dropped
//! filesystem paths into an ordered list of raw file handles.
//!
//! Nothing is rejected at the top level. When a dropped path is a directory
//! it is traversed recursively and hidden or system children are skipped.

use std::path::Path;

use crate::error::AppError;
use crate::models::file::RawFile;

/// Folder metadata written by Finder, Explorer and macOS archivers. Never
/// queued when found while walking a dropped folder.
const OS_METADATA_NAMES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini", "__MACOSX"];

/// Where a batch of files came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeSource {
    /// Change event on the file-selection control.
    Picker(Vec<RawFile>),
    /// Drop event on the drop zone.
    Drop(Vec<RawFile>),
}

impl IntakeSource {
    /// The files of this batch, in source order.
    pub fn into_files(self) -> Vec<RawFile> {
        match self {
            IntakeSource::Picker(files) | IntakeSource::Drop(files) => files,
        }
    }
}

/// Drag-and-drop events delivered to the drop zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<RawFile>),
}

/// Drop target state.
///
/// Every event is consumed here so the host never applies its native
/// drag-and-drop handling on top.
#[derive(Debug, Default)]
pub struct DropZone {
    dragging: bool,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Returns the dropped batch on `Drop`, `None` for the other events.
    pub fn handle(&mut self, event: DragEvent) -> Option<IntakeSource> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.dragging = true;
                None
            }
            DragEvent::Leave => {
                self.dragging = false;
                None
            }
            DragEvent::Drop(files) => {
                self.dragging = false;
                Some(IntakeSource::Drop(files))
            }
        }
    }
}

// dotfiles and OS metadata inside a dropped folder
fn is_skipped_child(name: &str) -> bool {
    name.starts_with('.') || OS_METADATA_NAMES.contains(&name)
}

/// MIME type guessed from the extension; empty when unknown.
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default()
}

fn add_file(path: &Path, files: &mut Vec<RawFile>) -> crate::error::Result<()> {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return Ok(()),
    };
    let metadata = std::fs::metadata(path)?;
    files.push(RawFile {
        name: name.to_string(),
        size: metadata.len(),
        mime_type: guess_mime_type(path),
        path: Some(path.to_path_buf()),
    });
    Ok(())
}

fn collect_dir_contents(dir: &Path, files: &mut Vec<RawFile>) -> crate::error::Result<()> {
    let mut children: Vec<_> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    // read_dir order is platform dependent
    children.sort();

    for child in children {
        let name = match child.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if is_skipped_child(name) {
            continue;
        }
        if child.is_file() {
            add_file(&child, files)?;
        } else if child.is_dir() {
            collect_dir_contents(&child, files)?;
        }
    }
    Ok(())
}

/// Resolves dropped file/directory paths into raw file handles.
///
/// Blocking; callers on the runtime should use `spawn_blocking`.
pub fn resolve_dropped_paths<P: AsRef<Path>>(paths: &[P]) -> crate::error::Result<Vec<RawFile>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::Io(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
        if path.is_file() {
            add_file(path, &mut files)?;
        } else if path.is_dir() {
            collect_dir_contents(path, &mut files)?;
        }
    }
    log::debug!("Resolved {} dropped path(s) into {} file(s)", paths.len(), files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_picker_and_drop_preserve_order() {
        let files = vec![
            RawFile::new("b.txt", 1, "text/plain"),
            RawFile::new("a.txt", 2, "text/plain"),
        ];
        let picked = IntakeSource::Picker(files.clone()).into_files();
        let dropped = IntakeSource::Drop(files.clone()).into_files();
        assert_eq!(picked, files);
        assert_eq!(dropped, files);
    }

    #[test]
    fn test_drop_zone_tracks_dragging() {
        let mut zone = DropZone::new();
        assert!(!zone.is_dragging());
        assert!(zone.handle(DragEvent::Enter).is_none());
        assert!(zone.is_dragging());
        assert!(zone.handle(DragEvent::Over).is_none());
        assert!(zone.is_dragging());
        assert!(zone.handle(DragEvent::Leave).is_none());
        assert!(!zone.is_dragging());
    }

    #[test]
    fn test_drop_zone_drop_yields_files() {
        let mut zone = DropZone::new();
        zone.handle(DragEvent::Over);
        let files = vec![RawFile::new("x.png", 3, "image/png")];
        let batch = zone.handle(DragEvent::Drop(files.clone()));
        assert_eq!(batch, Some(IntakeSource::Drop(files)));
        assert!(!zone.is_dragging());
    }

    #[test]
    fn test_no_paths_no_files() {
        let empty: Vec<String> = vec![];
        assert!(resolve_dropped_paths(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_single_file_gets_size_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("photo.png");
        fs::write(&file_path, "hello").unwrap();

        let files = resolve_dropped_paths(&[&file_path]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "photo.png");
        assert_eq!(files[0].size, 5);
        assert_eq!(files[0].mime_type, "image/png");
        assert_eq!(files[0].path.as_deref(), Some(file_path.as_path()));
    }

    #[test]
    fn test_unknown_extension_has_empty_mime() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("blob.zzqx");
        fs::write(&file_path, "?").unwrap();
        let files = resolve_dropped_paths(&[&file_path]).unwrap();
        assert_eq!(files[0].mime_type, "");
    }

    #[test]
    fn test_top_level_hidden_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".env");
        fs::write(&hidden, "k=v").unwrap();
        let files = resolve_dropped_paths(&[&hidden]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, ".env");
    }

    #[test]
    fn test_directory_recursive_traversal_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "bbb").unwrap();
        fs::write(dir.path().join("a.txt"), "aaa").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("c.txt"), "cc").unwrap();

        let files = resolve_dropped_paths(&[dir.path()]).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_folder_walk_skips_dotfiles_and_os_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("visible.txt"), "yes").unwrap();
        fs::write(dir.path().join(".hidden"), "no").unwrap();
        fs::write(dir.path().join(".DS_Store"), "no").unwrap();
        fs::write(dir.path().join("Thumbs.db"), "no").unwrap();
        let macosx = dir.path().join("__MACOSX");
        fs::create_dir(&macosx).unwrap();
        fs::write(macosx.join("junk.txt"), "junk").unwrap();

        let files = resolve_dropped_paths(&[dir.path()]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "visible.txt");
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let result = resolve_dropped_paths(&["/nonexistent/path/xyz"]);
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("does not exist"), "Error: {}", err);
    }

    #[test]
    fn test_skipped_child_names() {
        assert!(is_skipped_child(".hidden"));
        assert!(is_skipped_child("desktop.ini"));
        assert!(is_skipped_child("__MACOSX"));
        assert!(!is_skipped_child("normal.txt"));
    }
}
