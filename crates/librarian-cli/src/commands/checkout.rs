//! Whole-item transfers between the workspace and a project

use librarian::{ConfirmationPolicy, Librarian};

pub struct Pull;

impl Pull {
    pub fn execute(librarian: &mut Librarian) -> anyhow::Result<()> {
        librarian.pull()?;
        if let Some(project) = librarian.current_project() {
            println!("Pulled {project} into the workspace");
        }
        Ok(())
    }
}

pub struct Push;

impl Push {
    pub fn execute(librarian: &mut Librarian) -> anyhow::Result<()> {
        librarian.push()?;
        if let Some(project) = librarian.current_project() {
            println!("Pushed the workspace to {project}");
        }
        Ok(())
    }
}

pub struct Load;

impl Load {
    pub fn execute(
        librarian: &mut Librarian,
        project_name: &str,
        policy: &mut dyn ConfirmationPolicy,
    ) -> anyhow::Result<()> {
        if librarian.load_project(project_name, policy)? {
            println!("Loaded {project_name} into the workspace");
        } else {
            println!("Load cancelled.");
        }
        Ok(())
    }
}
