use librarian::{ConfirmationPolicy, Librarian};

pub struct CopyProject;

impl CopyProject {
    pub fn execute(
        librarian: &Librarian,
        source: &str,
        destination: Option<&str>,
        long: bool,
        policy: &mut dyn ConfirmationPolicy,
    ) -> anyhow::Result<()> {
        match librarian.copy(source, destination, long, policy)? {
            Some(copied) => println!("Copied project {source} to {copied}"),
            None => println!("Copy cancelled."),
        }
        Ok(())
    }
}
