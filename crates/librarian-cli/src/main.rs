mod cli;
mod commands;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Commands};
use interactive::TerminalConfirm;
use librarian::{InitPaths, Librarian};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_logging(&cli.log);

    let init = InitPaths {
        library: cli.library.as_deref().map(existing_path).transpose()?,
        workspace: cli.workspace.as_deref().map(existing_path).transpose()?,
        sync_targets: cli.sync_targets.clone(),
    };
    let mut librarian = Librarian::open(&cli.data, init, interactive::ask_path)
        .context("Failed to open librarian data")?;
    let mut confirm = TerminalConfirm::new(cli.yes);

    match &cli.command {
        None => commands::Status::execute(&mut librarian),
        Some(Commands::Create { project_name }) => {
            commands::Create::execute(&mut librarian, project_name)
                .context("Failed to execute create command")?;
        }
        Some(Commands::Copy {
            source_project_name,
            destination_project_name,
            long,
        }) => {
            commands::CopyProject::execute(
                &librarian,
                source_project_name,
                destination_project_name.as_deref(),
                *long,
                &mut confirm,
            )
            .context("Failed to execute copy command")?;
        }
        Some(Commands::Assign {
            project_name,
            no_save,
        }) => {
            commands::Assign::execute(&mut librarian, project_name, *no_save)
                .context("Failed to execute assign command")?;
        }
        Some(Commands::List { pattern }) => {
            commands::List::execute(&librarian, pattern.as_deref())
                .context("Failed to execute list command")?;
        }
        Some(Commands::Pull) => {
            commands::Pull::execute(&mut librarian).context("Failed to execute pull command")?;
        }
        Some(Commands::Load { project_name }) => {
            commands::Load::execute(&mut librarian, project_name, &mut confirm)
                .context("Failed to execute load command")?;
        }
        Some(Commands::Push) => {
            commands::Push::execute(&mut librarian).context("Failed to execute push command")?;
        }
        Some(Commands::Sync { dry_run }) => {
            commands::SyncProject::execute(&mut librarian, *dry_run)
                .context("Failed to execute sync command")?;
        }
        Some(Commands::Delete { names, pattern }) => {
            commands::Delete::execute(&mut librarian, names, pattern.as_deref(), &mut confirm)
                .context("Failed to execute delete command")?;
        }
    }

    librarian
        .save()
        .context("Failed to save librarian data")?;

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` takes precedence over `--log`
fn init_logging(level: &str) {
    let directive = match level.to_lowercase().as_str() {
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warning" | "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    if directive.is_none() {
        warn!("Invalid logging level selected: {level}");
    }
}

/// Canonical form of a path given on the command line
fn existing_path(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    dunce::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
