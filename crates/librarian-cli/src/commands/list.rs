use librarian::Librarian;

pub struct List;

impl List {
    pub fn execute(librarian: &Librarian, pattern: Option<&str>) -> anyhow::Result<()> {
        let projects = librarian.list(pattern)?;

        println!("-----");
        if projects.is_empty() {
            println!("No projects found in library.");
        }
        for project in &projects {
            println!("- {project}");
        }
        println!("-----");
        Ok(())
    }
}
