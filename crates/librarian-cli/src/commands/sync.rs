use librarian::{Librarian, SyncOptions, SyncReporter};

pub struct SyncProject;

impl SyncProject {
    pub fn execute(librarian: &mut Librarian, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            println!("Dry run: no files will be changed");
        }

        let result = librarian.sync(SyncOptions { dry_run })?;

        let summary = SyncReporter::generate_summary(&result);
        println!("{summary}");

        Ok(())
    }
}
