use librarian::Librarian;

pub struct Create;

impl Create {
    pub fn execute(librarian: &mut Librarian, project_name: &str) -> anyhow::Result<()> {
        librarian.create(project_name)?;
        println!("Created project {project_name}");
        println!("Assigned {project_name} to current project");
        Ok(())
    }
}
