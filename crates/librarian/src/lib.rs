//! # librarian
//!
//! Core library for the Librarian project checkout tool.
//!
//! A library directory holds named projects; a single workspace directory
//! holds the project being worked on. Projects can be pushed, pulled, and
//! reconciled with the workspace using modification times and the state
//! recorded at the previous sync.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types and the crate-wide result alias
pub mod error;

/// Two-replica synchronization engine
pub mod sync;

/// Persisted per-item sync baseline
pub mod state;

/// Controller metadata file
pub mod config;

/// Confirmation of destructive operations
pub mod confirm;

/// Project operations on the library
pub mod library;

/// Controller driven by the command line
pub mod controller;

pub use config::LibrarianData;
pub use confirm::{AlwaysConfirm, ConfirmationPolicy, NeverConfirm};
pub use controller::{Assignment, Deletion, InitPaths, Librarian};
pub use error::{ErrorKind, LibraryError, Result, SyncError};
pub use library::{LibraryService, PROJECT_MARKER};
pub use state::{ItemState, SyncState};
pub use sync::{SyncEngine, SyncOptions, SyncReporter, SyncResult};
