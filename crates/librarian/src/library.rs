//! Project management inside the library
//!
//! A project is any directory below the library root that contains a
//! `.studio_project` marker file. Projects hold copies of the tracked items
//! of the workspace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::GlobBuilder;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::confirm::ConfirmationPolicy;
use crate::error::{LibraryError, Result};
use crate::state::{ItemState, SyncState};
use crate::sync::{
    Snapshot, SyncEngine, SyncOptions, SyncOutcome, Timestamp, copy_directory, copy_file,
    modified_time,
};

/// Marker file that turns a directory into a project
pub const PROJECT_MARKER: &str = ".studio_project";

/// Project operations on a library/workspace pair
#[derive(Debug, Clone)]
pub struct LibraryService {
    library_path: PathBuf,
    workspace_path: PathBuf,
    tracked_items: Vec<String>,
}

impl LibraryService {
    /// Create a service for the given roots and tracked item names
    #[must_use]
    pub const fn new(
        library_path: PathBuf,
        workspace_path: PathBuf,
        tracked_items: Vec<String>,
    ) -> Self {
        Self {
            library_path,
            workspace_path,
            tracked_items,
        }
    }

    /// Library root
    #[must_use]
    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    /// Workspace root
    #[must_use]
    pub fn workspace_path(&self) -> &Path {
        &self.workspace_path
    }

    /// Tracked item names
    #[must_use]
    pub fn tracked_items(&self) -> &[String] {
        &self.tracked_items
    }

    /// Directory of a project
    #[must_use]
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.library_path.join(name)
    }

    /// Whether `name` is a project in the library
    #[must_use]
    pub fn is_project(&self, name: &str) -> bool {
        !name.is_empty() && self.project_path(name).join(PROJECT_MARKER).is_file()
    }

    fn require_project(&self, name: &str) -> Result<PathBuf> {
        if self.is_project(name) {
            Ok(self.project_path(name))
        } else {
            Err(LibraryError::InvalidProject(name.to_string()).into())
        }
    }

    /// Replace every tracked item at `destination` with the one at `source`
    ///
    /// Items missing at the source are removed from the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if removing or copying fails.
    pub fn copy_items(&self, source: &Path, destination: &Path) -> Result<()> {
        for item in &self.tracked_items {
            let source_item = source.join(item);
            let dest_item = destination.join(item);

            if dest_item.is_dir() {
                fs::remove_dir_all(&dest_item)
                    .with_context(|| format!("Failed to remove {}", dest_item.display()))?;
            } else if dest_item.exists() {
                fs::remove_file(&dest_item)
                    .with_context(|| format!("Failed to remove {}", dest_item.display()))?;
            }

            if source_item.is_dir() {
                debug!("Copying directory {} -> {}", source_item.display(), dest_item.display());
                copy_directory(&source_item, &dest_item)?;
            } else if source_item.is_file() {
                debug!("Copying file {} -> {}", source_item.display(), dest_item.display());
                copy_file(&source_item, &dest_item)?;
            }
        }
        Ok(())
    }

    /// Create a project from `source` (the workspace if `None`)
    ///
    /// # Errors
    ///
    /// Returns an error if the project exists, would be nested inside another
    /// project, or copying fails.
    pub fn create_project(&self, name: &str, source: Option<&Path>) -> Result<()> {
        info!("Creating project {name}");
        let source = source.unwrap_or(&self.workspace_path);

        let mut level = self.library_path.clone();
        for part in name.split(['/', '\\']).filter(|p| !p.is_empty()) {
            if level.join(PROJECT_MARKER).exists() {
                return Err(LibraryError::NestedProject(name.to_string()).into());
            }
            level.push(part);
        }

        let project_path = self.project_path(name);
        let marker = project_path.join(PROJECT_MARKER);
        if marker.exists() {
            return Err(LibraryError::ProjectExists(name.to_string()).into());
        }

        fs::create_dir_all(&project_path)
            .with_context(|| format!("Failed to create directory: {}", project_path.display()))?;
        fs::write(&marker, "")
            .with_context(|| format!("Failed to write marker: {}", marker.display()))?;

        self.copy_items(source, &project_path)
    }

    /// Copy a project inside the library
    ///
    /// Without a destination, `-copy` is appended to the source name until the
    /// name is free. Overwriting an existing project asks `policy` first.
    /// Returns the destination name, or `None` if the overwrite was refused.
    ///
    /// # Errors
    ///
    /// Returns an error if source and destination are the same, the source is
    /// not a project, or copying fails.
    pub fn copy_project(
        &self,
        source: &str,
        destination: Option<&str>,
        policy: &mut dyn ConfirmationPolicy,
    ) -> Result<Option<String>> {
        if destination == Some(source) {
            return Err(LibraryError::CopyOntoItself(source.to_string()).into());
        }
        let source_path = self.require_project(source)?;

        let destination = match destination {
            Some(name) => name.to_string(),
            None => {
                let mut name = format!("{source}-copy");
                while self.is_project(&name) {
                    name.push_str("-copy");
                }
                name
            }
        };

        if self.is_project(&destination) {
            let question =
                format!("A project already exists with this name ({destination}). Override?");
            if !policy.confirm(&question)? {
                return Ok(None);
            }
            self.copy_items(&source_path, &self.project_path(&destination))?;
        } else {
            self.create_project(&destination, Some(&source_path))?;
        }

        Ok(Some(destination))
    }

    /// List projects, optionally filtered by a glob pattern
    ///
    /// Names are library-relative with `/` separators, sorted. In the pattern
    /// `*` also matches `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or the library cannot be walked.
    pub fn list_projects(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        debug!("Listing projects with pattern {pattern:?}");
        let matcher = pattern
            .map(|p| {
                GlobBuilder::new(p)
                    .literal_separator(false)
                    .build()
                    .map(|glob| glob.compile_matcher())
                    .with_context(|| format!("Invalid project pattern: '{p}'"))
            })
            .transpose()?;

        let mut projects = Vec::new();
        for entry in WalkDir::new(&self.library_path).follow_links(false) {
            let entry = entry.with_context(|| {
                format!("Failed to walk library: {}", self.library_path.display())
            })?;
            if !entry.file_type().is_file() || entry.file_name() != PROJECT_MARKER {
                continue;
            }
            let Some(project_dir) = entry.path().parent() else {
                continue;
            };
            let Ok(relative) = project_dir.strip_prefix(&self.library_path) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if name.is_empty() {
                continue;
            }
            if matcher.as_ref().is_none_or(|m| m.is_match(&name)) {
                projects.push(name);
            }
        }

        projects.sort();
        Ok(projects)
    }

    /// Load a project's tracked items into the workspace
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or copying fails.
    pub fn pull_project(&self, name: &str) -> Result<()> {
        info!("Pulling from project {name}");
        let project_path = self.require_project(name)?;
        self.copy_items(&project_path, &self.workspace_path)
    }

    /// Save the workspace's tracked items into a project
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or copying fails.
    pub fn push_project(&self, name: &str) -> Result<()> {
        info!("Pushing project {name}");
        let project_path = self.require_project(name)?;
        self.copy_items(&self.workspace_path, &project_path)
    }

    /// Delete a project after confirmation; returns whether it was deleted
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or removal fails.
    pub fn delete_project(&self, name: &str, policy: &mut dyn ConfirmationPolicy) -> Result<bool> {
        self.delete_projects(&[name.to_string()], policy)
    }

    /// Delete several projects after a single confirmation
    ///
    /// All names are validated before anything is asked or removed.
    ///
    /// # Errors
    ///
    /// Returns an error if any name is not a project or removal fails.
    pub fn delete_projects(
        &self,
        names: &[String],
        policy: &mut dyn ConfirmationPolicy,
    ) -> Result<bool> {
        let paths = names
            .iter()
            .map(|name| self.require_project(name))
            .collect::<Result<Vec<_>>>()?;

        let question = if let [name] = names {
            format!("Delete project {name}?")
        } else {
            let listing: String = names.iter().map(|n| format!("\n- {n}")).collect();
            format!("Delete the following projects?{listing}\n")
        };
        if !policy.confirm(&question)? {
            return Ok(false);
        }

        for (name, path) in names.iter().zip(paths) {
            info!("Deleting project {name}");
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to delete project: {}", path.display()))?;
        }
        Ok(true)
    }

    /// Current state of the workspace's tracked items
    ///
    /// Files map to their mtime, directories to a full snapshot; missing
    /// items are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing item cannot be read.
    pub fn collect_state(&self) -> Result<SyncState> {
        let mut state = SyncState::new();
        for item in &self.tracked_items {
            let path = self.workspace_path.join(item);
            if path.is_dir() {
                state.insert(item.as_str(), Snapshot::from_path(&path)?.into());
            } else if path.is_file() {
                state.insert(item.as_str(), ItemState::File(modified_time(&path)?));
            }
        }
        Ok(state)
    }

    /// Reconcile the workspace with a project
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or either root is missing.
    pub fn sync(
        &self,
        name: &str,
        previous: Option<&SyncState>,
        last_sync_time: Option<Timestamp>,
        options: SyncOptions,
    ) -> Result<SyncOutcome> {
        let project_path = self.require_project(name)?;
        let outcome = SyncEngine::new(options).reconcile(
            &self.workspace_path,
            &project_path,
            &self.tracked_items,
            previous,
            last_sync_time,
        )?;
        Ok(outcome)
    }
}
