//! Error types for the librarian library
//!
//! The synchronization engine reports structured [`SyncError`]s so callers can
//! tell which item and path failed and why. Project management reports
//! [`LibraryError`]s, usually wrapped in an [`anyhow::Error`] with context.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// Coarse classification of a [`SyncError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A root or file expected to exist does not
    NotFound,
    /// A copy or delete was refused by the filesystem
    PermissionDenied,
    /// Persisted state or the other replica disagrees with what is on disk
    Inconsistent,
    /// Any other I/O failure
    Io,
}

/// What kind of filesystem entry a tracked item resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// A regular file
    File,
    /// A directory
    Directory,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Errors raised while reconciling a tracked item
#[derive(Debug, Error)]
pub enum SyncError {
    /// Path does not exist
    #[error("Not found: {}", path.display())]
    NotFound {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// Access to a path was denied
    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        /// Path that could not be accessed
        path: PathBuf,
    },

    /// A tracked item is a file in one place and a directory in another
    #[error("Inconsistent item '{item}': expected {expected}, found {found} at {}", path.display())]
    Inconsistent {
        /// Tracked item name
        item: String,
        /// Offending path
        path: PathBuf,
        /// Type recorded in state or on the other replica
        expected: EntryType,
        /// Type found on disk
        found: EntryType,
    },

    /// Other I/O failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    /// Map an I/O error on `path` into the sync error taxonomy
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Inconsistent { .. } => ErrorKind::Inconsistent,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Path the error refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::Inconsistent { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Errors raised by project management in the library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Name does not refer to a project in the library
    #[error("\"{0}\" is invalid project or doesn't exist.")]
    InvalidProject(String),

    /// Library and workspace point at the same directory
    #[error("The library and workspace cannot be assigned the same directory.")]
    FolderCollision,

    /// Project already exists
    #[error("Project {0} exists.")]
    ProjectExists(String),

    /// Project would be created inside another project
    #[error("Project {0} is being created in another project directory.")]
    NestedProject(String),

    /// Copy source and destination are the same project
    #[error("Destination of copy cannot be source: {0}")]
    CopyOntoItself(String),

    /// Operation needs a current project but none is assigned
    #[error("No assigned project to {0}.")]
    NoCurrentProject(&'static str),
}
