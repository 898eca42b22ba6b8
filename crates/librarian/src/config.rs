//! Persisted controller metadata
//!
//! Everything the controller remembers between invocations lives in one YAML
//! file (by default `librarian.yaml` in the current directory):
//!
//! ```yaml
//! library-path: /data/library
//! workspace-path: /data/workspace
//! current-project: games/demo
//! create-time: 1700000000.5
//! modify-time: 1700000100.25
//! sync-targets:
//! - UserData
//! last-sync-time: 1700000090.0
//! sync-state:
//!   UserData:
//!     saves/slot1.dat: 1700000080.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};
use crate::state::SyncState;
use crate::sync::{Timestamp, now};

/// Default metadata file name
pub const DEFAULT_DATA_FILE: &str = "librarian.yaml";

/// Tracked item used when none is configured
pub const DEFAULT_SYNC_TARGET: &str = "UserData";

/// Controller metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LibrarianData {
    /// Root of the project library
    pub library_path: PathBuf,

    /// The active workspace directory
    pub workspace_path: PathBuf,

    /// Project currently checked out into the workspace
    #[serde(default)]
    pub current_project: Option<String>,

    /// When this file was first written
    pub create_time: Timestamp,

    /// When this file was last written
    pub modify_time: Timestamp,

    /// Tracked item names shared by workspace and projects
    #[serde(default)]
    pub sync_targets: Vec<String>,

    /// End of the last successful sync, push or pull
    #[serde(default)]
    pub last_sync_time: Option<Timestamp>,

    /// Baseline for the next sync
    #[serde(default)]
    pub sync_state: Option<SyncState>,
}

impl LibrarianData {
    /// Fresh metadata for a library/workspace pair
    ///
    /// An empty target list falls back to [`DEFAULT_SYNC_TARGET`].
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::FolderCollision`] if both paths are the same.
    pub fn new(
        library_path: PathBuf,
        workspace_path: PathBuf,
        sync_targets: Vec<String>,
    ) -> Result<Self> {
        let created = now();
        let data = Self {
            library_path,
            workspace_path,
            current_project: None,
            create_time: created,
            modify_time: created,
            sync_targets: Self::targets_or_default(sync_targets),
            last_sync_time: None,
            sync_state: None,
        };
        data.validate()?;
        Ok(data)
    }

    /// Read metadata from `path`; `None` if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is invalid.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read librarian data: {}", path.display()))?;
        let mut data: Self = serde_yml::from_str(&content)
            .with_context(|| format!("Failed to parse librarian data: {}", path.display()))?;

        data.sync_targets = Self::targets_or_default(std::mem::take(&mut data.sync_targets));
        data.validate()?;
        Ok(Some(data))
    }

    /// Write metadata to `path`, stamping the modification time
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.modify_time = now();
        let content =
            serde_yml::to_string(self).context("Failed to serialize librarian data")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write librarian data: {}", path.display()))?;
        Ok(())
    }

    /// Check invariants
    ///
    /// # Errors
    ///
    /// Returns an error if library and workspace collide or a target name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.library_path == self.workspace_path {
            return Err(LibraryError::FolderCollision.into());
        }

        for target in &self.sync_targets {
            if target.trim().is_empty() {
                anyhow::bail!("Sync target cannot be empty");
            }
        }

        Ok(())
    }

    fn targets_or_default(targets: Vec<String>) -> Vec<String> {
        if targets.is_empty() {
            vec![DEFAULT_SYNC_TARGET.to_string()]
        } else {
            targets
        }
    }
}
