//! Sync actions and the replica pair they apply to

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the two replicas being reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The active workspace (replica A)
    Workspace,
    /// The library project (replica B)
    Library,
}

impl Side {
    /// The other replica
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Workspace => Self::Library,
            Self::Library => Self::Workspace,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace => f.write_str("workspace"),
            Self::Library => f.write_str("library"),
        }
    }
}

/// Why a path was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Neither side changed since the last sync
    Unchanged,
    /// Both sides carry the same modification time
    SameTime,
    /// Deleted on both sides
    DeletedOnBoth,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => f.write_str("unchanged since last sync"),
            Self::SameTime => f.write_str("same modification time"),
            Self::DeletedOnBoth => f.write_str("deleted on both sides"),
        }
    }
}

/// Sync action to perform on a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy the file from `from` onto the other side
    Copy {
        /// Path relative to the replica roots
        path: String,
        /// Side holding the winning copy
        from: Side,
    },
    /// Remove the file from `side`
    Remove {
        /// Path relative to the replica roots
        path: String,
        /// Side the file is removed from
        side: Side,
    },
    /// Leave the path alone
    Skip {
        /// Path relative to the replica roots
        path: String,
        /// Why nothing is done
        reason: SkipReason,
    },
}

impl SyncAction {
    /// Path the action applies to
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Copy { path, .. } | Self::Remove { path, .. } | Self::Skip { path, .. } => path,
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy { path, from } => write!(f, "copy {path} ({from} -> {})", from.other()),
            Self::Remove { path, side } => write!(f, "remove {path} from {side}"),
            Self::Skip { path, reason } => write!(f, "skip {path} ({reason})"),
        }
    }
}

/// Root directories of the two replicas for one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replicas {
    /// Workspace root
    pub workspace: PathBuf,
    /// Library project root
    pub library: PathBuf,
}

impl Replicas {
    /// Create a replica pair
    #[must_use]
    pub fn new(workspace: impl Into<PathBuf>, library: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            library: library.into(),
        }
    }

    /// Root of one side
    #[must_use]
    pub fn root(&self, side: Side) -> &Path {
        match side {
            Side::Workspace => &self.workspace,
            Side::Library => &self.library,
        }
    }

    /// Absolute location of a relative path on one side
    #[must_use]
    pub fn locate(&self, side: Side, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.root(side).to_path_buf(), |acc, part| acc.join(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Workspace.other(), Side::Library);
        assert_eq!(Side::Library.other(), Side::Workspace);
    }

    #[test]
    fn test_locate_splits_forward_slashes() {
        let replicas = Replicas::new("/ws", "/lib/proj");
        let expected: PathBuf = ["/lib/proj", "maps", "level.dat"].iter().collect();
        assert_eq!(replicas.locate(Side::Library, "maps/level.dat"), expected);
    }

    #[test]
    fn test_action_display() {
        let copy = SyncAction::Copy {
            path: "x".to_string(),
            from: Side::Workspace,
        };
        assert_eq!(copy.to_string(), "copy x (workspace -> library)");
        assert_eq!(copy.path(), "x");

        let skip = SyncAction::Skip {
            path: "y".to_string(),
            reason: SkipReason::Unchanged,
        };
        assert_eq!(skip.to_string(), "skip y (unchanged since last sync)");
    }
}
