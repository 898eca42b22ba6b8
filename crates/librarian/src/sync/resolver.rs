//! Per-category conflict resolution
//!
//! Decisions only look at modification times and the last sync time. Content
//! is never compared: touching a file without changing it counts as an edit.

use std::cmp::Ordering;

use super::SyncResult;
use super::actions::{Replicas, Side, SkipReason, SyncAction};
use super::classifier::{Category, Classification};
use super::executor::FileOperationExecutor;
use super::snapshot::Snapshot;
use super::timestamp::Timestamp;
use crate::error::SyncError;

/// Decides and applies actions for classified paths
pub struct ConflictResolver<'a> {
    last_sync_time: Timestamp,
    executor: &'a FileOperationExecutor,
}

impl<'a> ConflictResolver<'a> {
    /// Create a resolver using `last_sync_time` as the change threshold
    #[must_use]
    pub const fn new(last_sync_time: Timestamp, executor: &'a FileOperationExecutor) -> Self {
        Self {
            last_sync_time,
            executor,
        }
    }

    /// Decide what to do with one path
    ///
    /// `workspace` and `library` are the current snapshots of both sides.
    #[must_use]
    pub fn decide(
        &self,
        category: Category,
        path: &str,
        workspace: &Snapshot,
        library: &Snapshot,
    ) -> SyncAction {
        let path_owned = path.to_string();
        match category {
            Category::Retained => {
                let (Some(a), Some(b)) = (workspace.get(path), library.get(path)) else {
                    return skip(path_owned, SkipReason::Unchanged);
                };
                if a.max(b) <= self.last_sync_time {
                    return skip(path_owned, SkipReason::Unchanged);
                }
                most_recent(path_owned, a, b)
            }
            Category::OneSidedDelete => {
                let (survivor, time) = match (workspace.get(path), library.get(path)) {
                    (Some(a), None) => (Side::Workspace, a),
                    (None, Some(b)) => (Side::Library, b),
                    _ => return skip(path_owned, SkipReason::Unchanged),
                };
                edited_or_deleted(path_owned, survivor, time, self.last_sync_time)
            }
            Category::ConcurrentNew => match (workspace.get(path), library.get(path)) {
                (Some(a), Some(b)) => most_recent(path_owned, a, b),
                _ => skip(path_owned, SkipReason::Unchanged),
            },
            Category::OneSidedNew => {
                let from = if workspace.contains(path) {
                    Side::Workspace
                } else {
                    Side::Library
                };
                SyncAction::Copy {
                    path: path_owned,
                    from,
                }
            }
            Category::MutualDelete => skip(path_owned, SkipReason::DeletedOnBoth),
        }
    }

    /// Decide actions for every classified path
    #[must_use]
    pub fn plan(
        &self,
        classification: &Classification,
        workspace: &Snapshot,
        library: &Snapshot,
    ) -> Vec<SyncAction> {
        classification
            .iter()
            .map(|(category, path)| self.decide(category, path, workspace, library))
            .collect()
    }

    /// Decide and apply actions for every classified path
    ///
    /// Stops at the first failing file operation.
    ///
    /// # Errors
    ///
    /// Returns the error of the first file operation that fails.
    pub fn apply(
        &self,
        classification: &Classification,
        workspace: &Snapshot,
        library: &Snapshot,
        replicas: &Replicas,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        for action in self.plan(classification, workspace, library) {
            self.executor.execute(&action, replicas, result)?;
        }
        Ok(())
    }
}

/// Copy the strictly newer side onto the other; equal times are left alone
pub(crate) fn most_recent(path: String, workspace: Timestamp, library: Timestamp) -> SyncAction {
    match workspace.partial_cmp(&library) {
        Some(Ordering::Greater) => SyncAction::Copy {
            path,
            from: Side::Workspace,
        },
        Some(Ordering::Less) => SyncAction::Copy {
            path,
            from: Side::Library,
        },
        _ => skip(path, SkipReason::SameTime),
    }
}

/// A survivor edited after the last sync overrides the deletion on the other
/// side; otherwise the deletion is completed
pub(crate) fn edited_or_deleted(
    path: String,
    survivor: Side,
    time: Timestamp,
    last_sync_time: Timestamp,
) -> SyncAction {
    if time > last_sync_time {
        SyncAction::Copy {
            path,
            from: survivor,
        }
    } else {
        SyncAction::Remove {
            path,
            side: survivor,
        }
    }
}

const fn skip(path: String, reason: SkipReason) -> SyncAction {
    SyncAction::Skip { path, reason }
}
