//! Controller tying the metadata file to project operations
//!
//! [`Librarian`] is what the command line drives: it loads (or initialises)
//! the metadata file, tracks the current project and keeps the sync baseline
//! up to date after every operation that moves data.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::LibrarianData;
use crate::confirm::ConfirmationPolicy;
use crate::error::{LibraryError, Result};
use crate::library::LibraryService;
use crate::sync::{SyncOptions, SyncResult, now};

/// Paths used when no metadata file exists yet
#[derive(Debug, Clone, Default)]
pub struct InitPaths {
    /// Library root, asked for when absent
    pub library: Option<PathBuf>,
    /// Workspace root, asked for when absent
    pub workspace: Option<PathBuf>,
    /// Tracked item names; empty means the default target
    pub sync_targets: Vec<String>,
}

/// Outcome of [`Librarian::assign`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// No project matched
    NotFound,
    /// Several projects matched; the caller picks one
    Ambiguous(Vec<String>),
    /// The matched project is already current
    Unchanged(String),
    /// The current project changed
    Assigned {
        /// Project that was current before
        previous: Option<String>,
        /// Newly assigned project
        project: String,
    },
}

/// Outcome of [`Librarian::delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    /// Neither names nor a matching pattern were given
    NothingToDelete,
    /// Confirmation was refused
    Declined,
    /// These projects were removed
    Deleted(Vec<String>),
}

/// The librarian controller
#[derive(Debug)]
pub struct Librarian {
    data_path: PathBuf,
    data: LibrarianData,
    service: LibraryService,
    created: bool,
}

impl Librarian {
    /// Load the metadata file at `data_path`, or initialise new metadata
    ///
    /// `ask_path` is called with `"library"` or `"workspace"` for any root
    /// that `init` leaves out. Existing metadata ignores `init`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read or is invalid, or if
    /// asking for a path fails.
    pub fn open<F>(data_path: impl Into<PathBuf>, init: InitPaths, mut ask_path: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<PathBuf>,
    {
        let data_path = data_path.into();
        let (data, created) = if let Some(data) = LibrarianData::load(&data_path)? {
            info!("Retrieved librarian data from {}", data_path.display());
            (data, false)
        } else {
            let library = match init.library {
                Some(path) => path,
                None => ask_path("library")?,
            };
            let workspace = match init.workspace {
                Some(path) => path,
                None => ask_path("workspace")?,
            };
            let data = LibrarianData::new(library, workspace, init.sync_targets)?;
            info!("Initialized librarian data");
            (data, true)
        };

        let service = LibraryService::new(
            data.library_path.clone(),
            data.workspace_path.clone(),
            data.sync_targets.clone(),
        );

        Ok(Self {
            data_path,
            data,
            service,
            created,
        })
    }

    /// Whether the metadata was initialised by [`Librarian::open`]
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.created
    }

    /// Current metadata
    #[must_use]
    pub const fn data(&self) -> &LibrarianData {
        &self.data
    }

    /// Project service over the configured roots
    #[must_use]
    pub const fn service(&self) -> &LibraryService {
        &self.service
    }

    /// Location of the metadata file
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Current project, if assigned
    #[must_use]
    pub fn current_project(&self) -> Option<&str> {
        self.data.current_project.as_deref()
    }

    /// Current project after dropping an assignment that no longer exists
    pub fn status(&mut self) -> Option<&str> {
        if let Some(project) = self.data.current_project.as_deref() {
            if !self.service.is_project(project) {
                warn!("Current project {project} no longer exists");
                self.data.current_project = None;
            }
        }
        self.current_project()
    }

    /// Write the metadata file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        self.data.save(&self.data_path)
    }

    /// Create a project from the workspace and make it current
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be created.
    pub fn create(&mut self, name: &str) -> Result<()> {
        self.service.create_project(name, None)?;
        self.set_current(name)?;
        self.record_state()
    }

    /// Copy a project
    ///
    /// Unless `long` is set, `destination` is taken relative to the directory
    /// holding the source. Returns the destination name, or `None` when an
    /// overwrite was refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub fn copy(
        &self,
        source: &str,
        destination: Option<&str>,
        long: bool,
        policy: &mut dyn ConfirmationPolicy,
    ) -> Result<Option<String>> {
        let destination = match destination {
            Some(name) if !long => Some(sibling_name(source, name)),
            other => other.map(str::to_string),
        };
        self.service.copy_project(source, destination.as_deref(), policy)
    }

    /// Projects matching `pattern`, falling back to a basename match
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be listed.
    pub fn find_projects(&self, pattern: &str) -> Result<Vec<String>> {
        let projects = self.service.list_projects(Some(pattern))?;
        if !projects.is_empty() {
            return Ok(projects);
        }
        self.service.list_projects(Some(&format!("*{pattern}")))
    }

    /// Assign the project matching `pattern` as current
    ///
    /// With several matches nothing changes and the candidates are returned;
    /// pass the chosen one to [`Librarian::switch_to`].
    ///
    /// # Errors
    ///
    /// Returns an error if listing, pushing or pulling fails.
    pub fn assign(&mut self, pattern: &str, save_changes: bool) -> Result<Assignment> {
        let mut projects = self.find_projects(pattern)?;
        match projects.len() {
            0 => Ok(Assignment::NotFound),
            1 => {
                let project = projects.remove(0);
                self.switch_to(&project, save_changes)
            }
            _ => Ok(Assignment::Ambiguous(projects)),
        }
    }

    /// Make `project` current and load it into the workspace
    ///
    /// With `save_changes`, the workspace is pushed to the previous project
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if `project` is invalid or copying fails.
    pub fn switch_to(&mut self, project: &str, save_changes: bool) -> Result<Assignment> {
        if self.current_project() == Some(project) {
            return Ok(Assignment::Unchanged(project.to_string()));
        }
        if !self.service.is_project(project) {
            return Err(LibraryError::InvalidProject(project.to_string()).into());
        }

        let previous = self.data.current_project.clone();
        if save_changes {
            if let Some(previous) = previous.as_deref() {
                self.service.push_project(previous)?;
            }
        }

        self.set_current(project)?;
        self.service.pull_project(project)?;
        self.record_state()?;

        Ok(Assignment::Assigned {
            previous,
            project: project.to_string(),
        })
    }

    /// Load a project into the workspace, replacing the current assignment
    ///
    /// Replacing a different current project asks `policy` first. Returns
    /// whether the project was loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is invalid or copying fails.
    pub fn load_project(
        &mut self,
        project: &str,
        policy: &mut dyn ConfirmationPolicy,
    ) -> Result<bool> {
        if let Some(current) = self.current_project() {
            if current != project {
                let question = format!("\"{current}\" is assigned to current project. Overwrite?");
                if !policy.confirm(&question)? {
                    return Ok(false);
                }
            }
        }

        self.set_current(project)?;
        self.service.pull_project(project)?;
        self.record_state()?;
        Ok(true)
    }

    /// Replace the workspace's tracked items with the current project's
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NoCurrentProject`] without an assignment, or an
    /// error if copying fails.
    pub fn pull(&mut self) -> Result<()> {
        let project = self.require_current("pull from")?;
        self.service.pull_project(&project)?;
        self.record_state()
    }

    /// Replace the current project's tracked items with the workspace's
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NoCurrentProject`] without an assignment, or an
    /// error if copying fails.
    pub fn push(&mut self) -> Result<()> {
        let project = self.require_current("push to")?;
        self.service.push_project(&project)?;
        self.record_state()
    }

    /// Reconcile the workspace with the current project
    ///
    /// The returned state becomes the new baseline. `last-sync-time` only
    /// advances when every tracked item succeeded; a dry run changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NoCurrentProject`] without an assignment, or an
    /// error if either root is missing.
    pub fn sync(&mut self, options: SyncOptions) -> Result<SyncResult> {
        let project = self.require_current("sync with")?;
        let outcome = self.service.sync(
            &project,
            self.data.sync_state.as_ref(),
            self.data.last_sync_time,
            options,
        )?;

        if !options.dry_run {
            self.data.sync_state = Some(outcome.state);
            if outcome.result.is_success() {
                self.data.last_sync_time = Some(now());
            } else {
                warn!("Sync completed with failures; last sync time left unchanged");
            }
        }

        Ok(outcome.result)
    }

    /// Projects in the library, optionally filtered by a glob pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be listed.
    pub fn list(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        self.service.list_projects(pattern)
    }

    /// Delete projects by name, or by pattern when no names are given
    ///
    /// Deleting the current project unassigns it.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is not a project or removal fails.
    pub fn delete(
        &mut self,
        names: &[String],
        pattern: Option<&str>,
        policy: &mut dyn ConfirmationPolicy,
    ) -> Result<Deletion> {
        let names = match (names.is_empty(), pattern) {
            (false, _) => names.to_vec(),
            (true, Some(pattern)) => self.service.list_projects(Some(pattern))?,
            (true, None) => Vec::new(),
        };
        if names.is_empty() {
            return Ok(Deletion::NothingToDelete);
        }

        if !self.service.delete_projects(&names, policy)? {
            return Ok(Deletion::Declined);
        }

        if self
            .current_project()
            .is_some_and(|current| names.iter().any(|n| n == current))
        {
            info!("Unassigned deleted current project");
            self.data.current_project = None;
        }
        Ok(Deletion::Deleted(names))
    }

    fn set_current(&mut self, project: &str) -> Result<()> {
        if !self.service.is_project(project) {
            return Err(LibraryError::InvalidProject(project.to_string()).into());
        }
        if let Some(previous) = self.data.current_project.as_deref() {
            info!("Unassigned {previous} from current project");
        }
        info!("Assigned {project} to current project");
        self.data.current_project = Some(project.to_string());
        Ok(())
    }

    fn require_current(&self, action: &'static str) -> Result<String> {
        self.data
            .current_project
            .clone()
            .ok_or_else(|| LibraryError::NoCurrentProject(action).into())
    }

    fn record_state(&mut self) -> Result<()> {
        self.data.sync_state = Some(self.service.collect_state()?);
        self.data.last_sync_time = Some(now());
        Ok(())
    }
}

/// `name` placed next to `source` in its parent directory
fn sibling_name(source: &str, name: &str) -> String {
    match source.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => format!("{parent}/{name}"),
        _ => name.to_string(),
    }
}
