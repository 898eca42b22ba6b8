//! File operations executor

use std::fs;
use std::path::Path;

use tracing::debug;

use super::SyncResult;
use super::actions::{Replicas, Side, SyncAction};
use super::timestamp::set_modified_time;
use crate::error::SyncError;

/// Applies sync actions to a pair of replicas
pub struct FileOperationExecutor {
    dry_run: bool,
}

impl FileOperationExecutor {
    /// Create a new executor
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Whether actions are only recorded
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute a sync action
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail.
    pub fn execute(
        &self,
        action: &SyncAction,
        replicas: &Replicas,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        match action {
            SyncAction::Copy { path, from } => {
                let source = replicas.locate(*from, path);
                let dest = replicas.locate(from.other(), path);
                if self.dry_run {
                    debug!("[DRY RUN] Would copy {} -> {}", source.display(), dest.display());
                } else {
                    debug!("Copying {} -> {}", source.display(), dest.display());
                    copy_file(&source, &dest)?;
                }
                match from.other() {
                    Side::Workspace => result.copied_to_workspace += 1,
                    Side::Library => result.copied_to_library += 1,
                }
            }
            SyncAction::Remove { path, side } => {
                let target = replicas.locate(*side, path);
                if self.dry_run {
                    debug!("[DRY RUN] Would remove {}", target.display());
                } else {
                    debug!("Removing {}", target.display());
                    remove_file(&target)?;
                }
                result.deleted += 1;
            }
            SyncAction::Skip { path, reason } => {
                debug!("Skipping {path} ({reason})");
                result.unchanged += 1;
                *result.skip_reasons.entry(*reason).or_insert(0) += 1;
            }
        }
        Ok(())
    }
}

/// Copy a file, creating parent directories and keeping the source mtime
///
/// # Errors
///
/// Returns an error if the source cannot be read or the destination written.
pub fn copy_file(source: &Path, dest: &Path) -> Result<(), SyncError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::from_io(parent, e))?;
    }

    let modified = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| SyncError::from_io(source, e))?;

    fs::copy(source, dest).map_err(|e| {
        // Attribute a missing source to the source, anything else to the destination
        if source.exists() {
            SyncError::from_io(dest, e)
        } else {
            SyncError::from_io(source, e)
        }
    })?;

    set_modified_time(dest, modified)
}

/// Remove a single file, never a directory
///
/// # Errors
///
/// Returns an error if the file cannot be removed.
pub fn remove_file(target: &Path) -> Result<(), SyncError> {
    fs::remove_file(target).map_err(|e| SyncError::from_io(target, e))
}

/// Copy a directory tree, keeping file mtimes
///
/// # Errors
///
/// Returns an error if directory operations fail.
pub fn copy_directory(source: &Path, dest: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(dest).map_err(|e| SyncError::from_io(dest, e))?;

    for entry in fs::read_dir(source).map_err(|e| SyncError::from_io(source, e))? {
        let entry = entry.map_err(|e| SyncError::from_io(source, e))?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| SyncError::from_io(&path, e))?;

        if file_type.is_dir() {
            copy_directory(&path, &dest_path)?;
        } else if file_type.is_file() {
            copy_file(&path, &dest_path)?;
        }
    }

    Ok(())
}
