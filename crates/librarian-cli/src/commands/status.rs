use librarian::Librarian;

pub struct Status;

impl Status {
    pub fn execute(librarian: &mut Librarian) {
        let service = librarian.service();
        let library = service.library_path().display().to_string();
        let workspace = service.workspace_path().display().to_string();
        let tracked = service.tracked_items().join(", ");
        let data = librarian.data_path().display().to_string();

        println!("-----");
        println!("Library:   {library}");
        println!("Workspace: {workspace}");
        println!("Tracked:   {tracked}");
        println!("Data file: {data}");
        match librarian.status() {
            Some(project) => println!("Current project: {project}"),
            None => println!("There is no current project assigned."),
        }
        println!("-----");
    }
}
