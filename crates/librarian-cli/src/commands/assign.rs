use librarian::{Assignment, Librarian};

use crate::interactive;

pub struct Assign;

impl Assign {
    pub fn execute(librarian: &mut Librarian, pattern: &str, no_save: bool) -> anyhow::Result<()> {
        let save_changes = !no_save;
        let assignment = match librarian.assign(pattern, save_changes)? {
            Assignment::Ambiguous(candidates) => {
                println!("Found multiple projects that match.");
                let Some(chosen) = interactive::select_project(&candidates)? else {
                    return Ok(());
                };
                librarian.switch_to(&chosen, save_changes)?
            }
            other => other,
        };

        match assignment {
            Assignment::NotFound => println!("No projects found."),
            Assignment::Unchanged(project) => {
                println!("Current project: {project}");
                println!("No changes to assignment.");
            }
            Assignment::Assigned { previous, project } => {
                println!("-----\nAssignment information: ");
                println!("Previous project: {}", previous.as_deref().unwrap_or("(none)"));
                println!("New project:      {project}");
                println!("-----");
            }
            Assignment::Ambiguous(_) => {}
        }
        Ok(())
    }
}
