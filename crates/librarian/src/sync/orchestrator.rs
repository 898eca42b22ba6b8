//! Sync orchestration - reconciles every tracked item of a project

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use super::actions::{Replicas, Side, SyncAction};
use super::classifier::PathClassifier;
use super::executor::FileOperationExecutor;
use super::resolver::{ConflictResolver, edited_or_deleted, most_recent};
use super::snapshot::Snapshot;
use super::timestamp::{Timestamp, modified_time};
use super::{ItemFailure, SyncOptions, SyncOutcome, SyncResult};
use crate::error::{EntryType, SyncError};
use crate::state::{ItemState, SyncState};

/// Main sync engine
pub struct SyncEngine {
    executor: FileOperationExecutor,
}

impl SyncEngine {
    /// Create a new sync engine
    #[must_use]
    pub const fn new(options: SyncOptions) -> Self {
        Self {
            executor: FileOperationExecutor::new(options.dry_run),
        }
    }

    /// Reconcile every tracked item between the workspace and a library project
    ///
    /// `previous` is the state returned by the last successful pass; without
    /// it the workspace doubles as the baseline. A missing `last_sync_time`
    /// counts as the epoch, so every file looks changed.
    ///
    /// Items are processed in order and independently: a failing item is
    /// recorded in [`SyncResult::failures`], keeps its previous state entry,
    /// and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] before any work is done if either root
    /// is missing.
    pub fn reconcile<S: AsRef<str>>(
        &self,
        workspace_root: &Path,
        library_root: &Path,
        tracked_items: &[S],
        previous: Option<&SyncState>,
        last_sync_time: Option<Timestamp>,
    ) -> Result<SyncOutcome, SyncError> {
        for root in [workspace_root, library_root] {
            if !root.is_dir() {
                return Err(SyncError::NotFound {
                    path: root.to_path_buf(),
                });
            }
        }

        let last_sync_time = last_sync_time.unwrap_or(0.0);
        info!(
            "Reconciling {} with {} ({} tracked items)",
            workspace_root.display(),
            library_root.display(),
            tracked_items.len()
        );

        let mut state = SyncState::new();
        let mut result = SyncResult::default();
        let mut seen = BTreeSet::new();

        for item in tracked_items {
            let item = item.as_ref();
            if !seen.insert(item) {
                continue;
            }

            let baseline = previous.and_then(|p| p.get(item));
            let reconciled = self.reconcile_item(
                item,
                workspace_root,
                library_root,
                baseline,
                last_sync_time,
                &mut result,
            );

            match reconciled {
                Ok(new_state) => {
                    let recorded = if self.executor.is_dry_run() {
                        baseline.cloned()
                    } else {
                        new_state
                    };
                    if let Some(recorded) = recorded {
                        state.insert(item, recorded);
                    }
                }
                Err(error) => {
                    warn!("Failed to sync '{item}': {error}");
                    if let Some(baseline) = baseline {
                        state.insert(item, baseline.clone());
                    }
                    result.failures.push(ItemFailure {
                        item: item.to_string(),
                        error,
                    });
                }
            }
        }

        Ok(SyncOutcome { state, result })
    }

    fn reconcile_item(
        &self,
        item: &str,
        workspace_root: &Path,
        library_root: &Path,
        baseline: Option<&ItemState>,
        last_sync_time: Timestamp,
        result: &mut SyncResult,
    ) -> Result<Option<ItemState>, SyncError> {
        let workspace_path = workspace_root.join(item);
        let library_path = library_root.join(item);
        let workspace_type = entry_type(&workspace_path)?;
        let library_type = entry_type(&library_path)?;

        let item_type = match (workspace_type, library_type) {
            (None, None) => {
                debug!("Skipping '{item}': missing on both sides");
                return Ok(None);
            }
            (Some(a), Some(b)) if a != b => {
                return Err(SyncError::Inconsistent {
                    item: item.to_string(),
                    path: library_path,
                    expected: a,
                    found: b,
                });
            }
            (Some(t), _) | (None, Some(t)) => t,
        };

        if let Some(recorded) = baseline.filter(|r| r.entry_type() != item_type) {
            let path = if workspace_type.is_some() {
                workspace_path
            } else {
                library_path
            };
            return Err(SyncError::Inconsistent {
                item: item.to_string(),
                path,
                expected: recorded.entry_type(),
                found: item_type,
            });
        }

        match item_type {
            EntryType::File => {
                let replicas = Replicas::new(workspace_root, library_root);
                self.reconcile_file(item, &replicas, last_sync_time, result)
            }
            EntryType::Directory => {
                let replicas = Replicas::new(workspace_path, library_path);
                self.reconcile_directory(
                    &replicas,
                    workspace_type.is_some(),
                    library_type.is_some(),
                    baseline.and_then(ItemState::to_snapshot),
                    last_sync_time,
                    result,
                )
            }
        }
    }

    /// Reconcile a plain file item, using the item name as the path
    fn reconcile_file(
        &self,
        item: &str,
        replicas: &Replicas,
        last_sync_time: Timestamp,
        result: &mut SyncResult,
    ) -> Result<Option<ItemState>, SyncError> {
        let workspace_time = optional_mtime(&replicas.locate(Side::Workspace, item))?;
        let library_time = optional_mtime(&replicas.locate(Side::Library, item))?;

        let (action, kept) = match (workspace_time, library_time) {
            // Both present: newest wins with no last-sync gate
            (Some(a), Some(b)) => (most_recent(item.to_string(), a, b), Some(a.max(b))),
            (Some(a), None) => (
                edited_or_deleted(item.to_string(), Side::Workspace, a, last_sync_time),
                Some(a),
            ),
            (None, Some(b)) => (
                edited_or_deleted(item.to_string(), Side::Library, b, last_sync_time),
                Some(b),
            ),
            (None, None) => return Ok(None),
        };

        self.executor.execute(&action, replicas, result)?;

        Ok(match action {
            SyncAction::Remove { .. } => None,
            SyncAction::Copy { .. } | SyncAction::Skip { .. } => kept.map(ItemState::File),
        })
    }

    /// Reconcile a directory item through snapshot, classifier and resolver
    fn reconcile_directory(
        &self,
        replicas: &Replicas,
        workspace_exists: bool,
        library_exists: bool,
        baseline: Option<Snapshot>,
        last_sync_time: Timestamp,
        result: &mut SyncResult,
    ) -> Result<Option<ItemState>, SyncError> {
        let workspace = if workspace_exists {
            Snapshot::from_path(&replicas.workspace)?
        } else {
            Snapshot::empty(replicas.workspace.clone())
        };
        let library = if library_exists {
            Snapshot::from_path(&replicas.library)?
        } else {
            Snapshot::empty(replicas.library.clone())
        };
        let baseline = baseline.unwrap_or_else(|| workspace.clone());

        let classification = PathClassifier::classify(&workspace, &library, &baseline);
        debug!(
            "Classified {} paths under {}",
            classification.len(),
            replicas.workspace.display()
        );

        ConflictResolver::new(last_sync_time, &self.executor).apply(
            &classification,
            &workspace,
            &library,
            replicas,
            result,
        )?;

        if self.executor.is_dry_run() {
            return Ok(None);
        }

        // Both sides now hold the same files; an item that only exists as an
        // empty directory on the library side is recorded from there
        let merged = if replicas.workspace.is_dir() {
            &replicas.workspace
        } else {
            &replicas.library
        };
        Ok(Some(Snapshot::from_path(merged)?.into()))
    }
}

/// Type of the entry at `path`, or `None` if nothing is there
fn entry_type(path: &Path) -> Result<Option<EntryType>, SyncError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(Some(EntryType::Directory)),
        Ok(_) => Ok(Some(EntryType::File)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::from_io(path, e)),
    }
}

fn optional_mtime(path: &Path) -> Result<Option<Timestamp>, SyncError> {
    match modified_time(path) {
        Ok(time) => Ok(Some(time)),
        Err(SyncError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_fails_whole_pass() {
        let tmp = TempDir::new().unwrap();
        let engine = SyncEngine::new(SyncOptions::default());

        let err = engine
            .reconcile(
                tmp.path(),
                &tmp.path().join("missing"),
                &["UserData"],
                None,
                None,
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), tmp.path().join("missing"));
    }

    #[test]
    fn test_entry_type() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("f"), "").unwrap();

        assert_eq!(entry_type(tmp.path()).unwrap(), Some(EntryType::Directory));
        assert_eq!(entry_type(&tmp.path().join("f")).unwrap(), Some(EntryType::File));
        assert_eq!(entry_type(&tmp.path().join("none")).unwrap(), None);
    }
}
