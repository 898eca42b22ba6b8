use clap::{Parser, Subcommand};
use librarian::config::DEFAULT_DATA_FILE;
use std::path::PathBuf;

/// Librarian project checkout tool
///
/// Keep a library of projects and check them out into a single workspace.
/// Run without a command to show the current project.
#[derive(Parser, Debug)]
#[command(name = "librarian")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Path to the project library (used when initialising)
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Path to the workspace (used when initialising)
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    /// Items kept in sync between workspace and projects (used when initialising)
    #[arg(
        long = "sync-targets",
        global = true,
        value_name = "NAME",
        value_delimiter = ','
    )]
    pub sync_targets: Vec<String>,

    /// Librarian data file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "LIBRARIAN_DATA",
        default_value = DEFAULT_DATA_FILE
    )]
    pub data: PathBuf,

    /// Logging level: debug, info, warning or error
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    pub log: String,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project from the workspace and make it current
    Create {
        /// Project name, relative to the library root
        project_name: String,
    },

    /// Copy a project in the library
    Copy {
        /// Project to copy
        source_project_name: String,

        /// Name of the copy (default: <source>-copy)
        destination_project_name: Option<String>,

        /// Take the destination relative to the library root instead of the source's directory
        #[arg(long)]
        long: bool,
    },

    /// Assign the current project to one in the library
    Assign {
        /// Project name, pattern or basename
        project_name: String,

        /// Do not push workspace changes to the current project before pulling the new one
        #[arg(long)]
        no_save: bool,
    },

    /// List projects in the library
    List {
        /// Glob pattern to filter project names
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Load the current project from the library
    Pull,

    /// Load a project from the library into the workspace
    Load {
        /// Project name
        project_name: String,
    },

    /// Save the workspace to the current project
    Push,

    /// Sync the workspace with the current project
    Sync {
        /// Preview changes without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete one or more projects
    Delete {
        /// Project names
        #[arg(short, long, num_args = 1..)]
        names: Vec<String>,

        /// Glob pattern, used when no names are given
        #[arg(short, long)]
        pattern: Option<String>,
    },
}
