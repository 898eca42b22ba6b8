//! Terminal prompts
//!
//! Uses dialoguer for confirmations, project selection and path entry.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input, Select};
use librarian::ConfirmationPolicy;

/// Maximum number of rejected paths before giving up
const MAX_PATH_ATTEMPTS: usize = 3;

/// Confirmation policy backed by y/n prompts
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    /// Create a prompter; with `assume_yes` every question is approved silently
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmationPolicy for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .context("Failed to show prompt")
    }
}

/// Let the user pick one of several matching projects
///
/// Returns `None` if the selection was cancelled.
///
/// # Errors
///
/// Returns an error if terminal interaction fails.
pub fn select_project(candidates: &[String]) -> Result<Option<String>> {
    let index = Select::new()
        .with_prompt("Select a project (esc or q to quit)")
        .items(candidates)
        .default(0)
        .interact_opt()
        .context("Failed to show project selection")?;
    Ok(index.and_then(|i| candidates.get(i).cloned()))
}

/// Ask for an existing directory to use as `role`
///
/// An empty answer means the current directory. The path is canonicalised
/// and must be confirmed.
///
/// # Errors
///
/// Returns an error if terminal interaction fails, the user refuses too many
/// paths, or the path cannot be resolved.
pub fn ask_path(role: &str) -> Result<PathBuf> {
    for _ in 0..MAX_PATH_ATTEMPTS {
        let answer: String = Input::new()
            .with_prompt(format!("Enter path to {role} (enter to assign current directory)"))
            .allow_empty(true)
            .interact_text()
            .context("Failed to show prompt")?;
        let answer = if answer.trim().is_empty() { "." } else { answer.trim() };

        let Ok(path) = dunce::canonicalize(answer) else {
            eprintln!("Invalid path to {role}: {answer}. Please try again.");
            continue;
        };

        let confirmed = Confirm::new()
            .with_prompt(format!("Confirm path to {role}: {}", path.display()))
            .default(true)
            .interact()
            .context("Failed to show prompt")?;
        if confirmed {
            return Ok(path);
        }
    }

    bail!("No path to {role} given")
}
