//! Immutable path → modification time maps of one replica

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::timestamp::{Timestamp, to_timestamp};
use crate::error::SyncError;

/// State of one replica at a point in time
///
/// Keys are root-relative, forward-slash separated paths of regular files.
/// Directories never appear on their own: a directory without files is
/// invisible to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Option<PathBuf>,
    files: BTreeMap<String, Timestamp>,
}

impl Snapshot {
    /// Walk `root` recursively and record every regular file
    ///
    /// Symlinks are not followed. Files whose names are not valid UTF-8 are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] if `root` does not exist, or the
    /// mapped I/O error if traversal fails part way.
    pub fn from_path(root: &Path) -> Result<Self, SyncError> {
        if !root.exists() {
            return Err(SyncError::NotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = BTreeMap::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                match e.into_io_error() {
                    Some(io) => SyncError::from_io(&path, io),
                    None => SyncError::NotFound { path },
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| {
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                SyncError::from_io(path, io)
            })?;
            let modified = metadata
                .modified()
                .map_err(|e| SyncError::from_io(path, e))?;

            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let Some(key) = normalize(relative) else {
                warn!("Skipping file with a non UTF-8 name: {}", path.display());
                continue;
            };
            files.insert(key, to_timestamp(modified));
        }

        Ok(Self {
            root: Some(root.to_path_buf()),
            files,
        })
    }

    /// Build a snapshot from a persisted map, without touching the filesystem
    #[must_use]
    pub const fn from_map(files: BTreeMap<String, Timestamp>) -> Self {
        Self { root: None, files }
    }

    /// An empty snapshot for a replica where the item does not exist yet
    #[must_use]
    pub const fn empty(root: PathBuf) -> Self {
        Self {
            root: Some(root),
            files: BTreeMap::new(),
        }
    }

    /// Root directory, if this snapshot was read from disk
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Modification time recorded for `path`
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Timestamp> {
        self.files.get(path).copied()
    }

    /// Whether `path` is recorded
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Recorded paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of recorded files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the snapshot, returning its map
    #[must_use]
    pub fn into_files(self) -> BTreeMap<String, Timestamp> {
        self.files
    }
}

/// Join path components with `/` regardless of platform; `None` if a
/// component is not valid UTF-8
fn normalize(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
