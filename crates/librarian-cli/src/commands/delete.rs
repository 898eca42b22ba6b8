use librarian::{ConfirmationPolicy, Deletion, Librarian};

pub struct Delete;

impl Delete {
    pub fn execute(
        librarian: &mut Librarian,
        names: &[String],
        pattern: Option<&str>,
        policy: &mut dyn ConfirmationPolicy,
    ) -> anyhow::Result<()> {
        match librarian.delete(names, pattern, policy)? {
            Deletion::NothingToDelete => println!("No projects to delete."),
            Deletion::Declined => println!("Deletion cancelled."),
            Deletion::Deleted(deleted) => {
                for name in deleted {
                    println!("Deleted project {name}");
                }
            }
        }
        Ok(())
    }
}
