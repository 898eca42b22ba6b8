//! Bidirectional synchronization engine
//!
//! Reconciles a workspace and a library project for a set of tracked items
//! using only modification times and the state remembered from the previous
//! pass. Directory items are treated as flat buckets of files: directories
//! themselves are never deleted, only the files inside them.
//!
//! Both replicas must be quiescent for the duration of a pass. A file changed
//! by another process between snapshotting and the copy or delete that acts
//! on it is not detected.

mod actions;
mod classifier;
mod executor;
mod orchestrator;
mod reporting;
mod resolver;
mod snapshot;
mod timestamp;

use std::collections::HashMap;

pub use actions::{Replicas, Side, SkipReason, SyncAction};
pub use classifier::{Category, Classification, PathClassifier};
pub use executor::{FileOperationExecutor, copy_directory, copy_file, remove_file};
pub use orchestrator::SyncEngine;
pub use reporting::SyncReporter;
pub use resolver::ConflictResolver;
pub use snapshot::Snapshot;
pub use timestamp::{Timestamp, modified_time, now, set_modified_time, to_system_time, to_timestamp};

use crate::error::SyncError;
use crate::state::SyncState;

/// Options for a sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Plan actions without touching either replica
    pub dry_run: bool,
}

/// A tracked item that could not be reconciled
#[derive(Debug)]
pub struct ItemFailure {
    /// Tracked item name
    pub item: String,
    /// What went wrong
    pub error: SyncError,
}

/// Synchronization result with statistics
#[derive(Debug, Default)]
pub struct SyncResult {
    /// Files copied from the library into the workspace
    pub copied_to_workspace: usize,
    /// Files copied from the workspace into the library
    pub copied_to_library: usize,
    /// Files deleted from either side
    pub deleted: usize,
    /// Paths left alone
    pub unchanged: usize,
    /// Unchanged paths by reason
    pub skip_reasons: HashMap<SkipReason, usize>,
    /// Items that failed
    pub failures: Vec<ItemFailure>,
}

impl SyncResult {
    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.copied_to_workspace + self.copied_to_library + self.deleted
    }

    /// Whether every item was reconciled
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Output of [`SyncEngine::reconcile`]
#[derive(Debug)]
pub struct SyncOutcome {
    /// State to persist as the baseline of the next pass
    pub state: SyncState,
    /// What was done
    pub result: SyncResult,
}

#[cfg(test)]
mod integration_tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::error::{EntryType, ErrorKind};
    use crate::state::ItemState;

    const ITEM: &str = "UserData";

    struct Fixture {
        _tmp: TempDir,
        workspace: std::path::PathBuf,
        library: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let workspace = tmp.path().join("workspace");
            let library = tmp.path().join("library/project");
            fs::create_dir_all(&workspace).unwrap();
            fs::create_dir_all(&library).unwrap();
            Self {
                _tmp: tmp,
                workspace,
                library,
            }
        }

        fn ws(&self, rel: &str) -> std::path::PathBuf {
            self.workspace.join(rel)
        }

        fn lib(&self, rel: &str) -> std::path::PathBuf {
            self.library.join(rel)
        }
    }

    fn write_at(path: &Path, content: &str, mtime: f64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        set_modified_time(path, to_system_time(mtime)).unwrap();
    }

    fn dir_state(entries: &[(&str, f64)]) -> SyncState {
        let files = entries
            .iter()
            .map(|(p, t)| ((*p).to_string(), *t))
            .collect::<BTreeMap<_, _>>();
        std::iter::once((ITEM.to_string(), ItemState::Directory(files))).collect()
    }

    fn reconcile(
        fx: &Fixture,
        previous: Option<&SyncState>,
        last_sync: Option<f64>,
    ) -> SyncOutcome {
        SyncEngine::new(SyncOptions::default())
            .reconcile(&fx.workspace, &fx.library, &[ITEM], previous, last_sync)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/x"), "x from workspace", 150.0);
        write_at(&fx.ws("UserData/y"), "y from workspace", 120.0);
        write_at(&fx.lib("UserData/x"), "x from library", 100.0);

        let previous = dir_state(&[("x", 100.0)]);
        let outcome = reconcile(&fx, Some(&previous), Some(110.0));

        assert!(outcome.result.is_success());
        assert_eq!(outcome.result.copied_to_library, 2);
        assert_eq!(
            fs::read_to_string(fx.lib("UserData/x")).unwrap(),
            "x from workspace"
        );
        assert_eq!(
            fs::read_to_string(fx.lib("UserData/y")).unwrap(),
            "y from workspace"
        );
        assert_eq!(outcome.state, dir_state(&[("x", 150.0), ("y", 120.0)]));
        assert_eq!(modified_time(&fx.lib("UserData/x")).unwrap(), 150.0);
    }

    #[test]
    fn test_idempotent_second_pass() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/a"), "a", 150.0);
        write_at(&fx.lib("UserData/b"), "b", 160.0);
        write_at(&fx.lib("UserData/nested/c"), "c", 170.0);

        let first = reconcile(&fx, None, None);
        assert!(first.result.is_success());

        let second = reconcile(&fx, Some(&first.state), Some(now()));

        assert_eq!(second.result.total_operations(), 0);
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn test_library_newer_wins() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/x"), "old", 100.0);
        write_at(&fx.lib("UserData/x"), "new", 200.0);

        let outcome = reconcile(&fx, Some(&dir_state(&[("x", 100.0)])), Some(150.0));

        assert_eq!(outcome.result.copied_to_workspace, 1);
        assert_eq!(fs::read_to_string(fx.ws("UserData/x")).unwrap(), "new");
    }

    #[test]
    fn test_modification_overrides_deletion() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/x"), "edited", 150.0);
        fs::create_dir_all(fx.lib(ITEM)).unwrap();

        let outcome = reconcile(&fx, Some(&dir_state(&[("x", 100.0)])), Some(110.0));

        assert_eq!(fs::read_to_string(fx.lib("UserData/x")).unwrap(), "edited");
        assert_eq!(outcome.state, dir_state(&[("x", 150.0)]));
    }

    #[test]
    fn test_stale_survivor_is_deleted() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/x"), "stale", 150.0);
        fs::create_dir_all(fx.lib(ITEM)).unwrap();

        let outcome = reconcile(&fx, Some(&dir_state(&[("x", 100.0)])), Some(160.0));

        assert!(!fx.ws("UserData/x").exists());
        assert!(!fx.lib("UserData/x").exists());
        assert!(fx.ws(ITEM).is_dir(), "directories are never removed");
        assert_eq!(outcome.result.deleted, 1);
        assert_eq!(outcome.state, dir_state(&[]));
    }

    #[test]
    fn test_novelty_propagates_regardless_of_last_sync() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/y"), "new", 200.0);
        fs::create_dir_all(fx.lib(ITEM)).unwrap();

        reconcile(&fx, Some(&dir_state(&[])), Some(1_000_000.0));

        assert_eq!(fs::read_to_string(fx.lib("UserData/y")).unwrap(), "new");
    }

    #[test]
    fn test_untouched_retained_paths_are_left_alone() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/x"), "workspace", 100.0);
        write_at(&fx.lib("UserData/x"), "library", 90.0);

        let outcome = reconcile(
            &fx,
            Some(&dir_state(&[("x", 100.0)])),
            Some(110.0),
        );

        assert_eq!(outcome.result.total_operations(), 0);
        assert_eq!(fs::read_to_string(fx.lib("UserData/x")).unwrap(), "library");
        assert_eq!(
            outcome.result.skip_reasons.get(&SkipReason::Unchanged),
            Some(&1)
        );
    }

    #[test]
    fn test_file_item_copies_newest_without_last_sync_gate() {
        // Same timestamps as the directory case above, but at item level the
        // newest copy wins even though both predate the last sync.
        let fx = Fixture::new();
        write_at(&fx.ws("settings.ini"), "workspace", 100.0);
        write_at(&fx.lib("settings.ini"), "library", 90.0);

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(
                &fx.workspace,
                &fx.library,
                &["settings.ini"],
                None,
                Some(110.0),
            )
            .unwrap();

        assert_eq!(outcome.result.copied_to_library, 1);
        assert_eq!(fs::read_to_string(fx.lib("settings.ini")).unwrap(), "workspace");
        assert_eq!(
            outcome.state.get("settings.ini"),
            Some(&ItemState::File(100.0))
        );
    }

    #[test]
    fn test_file_item_on_one_side() {
        let fx = Fixture::new();
        write_at(&fx.lib("fresh.cfg"), "fresh", 200.0);
        write_at(&fx.ws("stale.cfg"), "stale", 50.0);

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(
                &fx.workspace,
                &fx.library,
                &["fresh.cfg", "stale.cfg"],
                None,
                Some(100.0),
            )
            .unwrap();

        assert_eq!(fs::read_to_string(fx.ws("fresh.cfg")).unwrap(), "fresh");
        assert!(!fx.ws("stale.cfg").exists());
        assert_eq!(outcome.state.get("fresh.cfg"), Some(&ItemState::File(200.0)));
        assert!(outcome.state.get("stale.cfg").is_none());
    }

    #[test]
    fn test_missing_item_is_skipped() {
        let fx = Fixture::new();

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(&fx.workspace, &fx.library, &["nothing"], None, None)
            .unwrap();

        assert!(outcome.state.is_empty());
        assert!(outcome.result.is_success());
    }

    #[test]
    fn test_directory_missing_on_one_side_is_created() {
        let fx = Fixture::new();
        write_at(&fx.lib("UserData/deep/file"), "content", 10.0);

        let outcome = reconcile(&fx, None, None);

        assert_eq!(fs::read_to_string(fx.ws("UserData/deep/file")).unwrap(), "content");
        assert_eq!(outcome.state, dir_state(&[("deep/file", 10.0)]));
    }

    #[test]
    fn test_empty_directory_on_one_side_is_recorded() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.lib(ITEM)).unwrap();

        let outcome = reconcile(&fx, None, None);

        assert!(outcome.result.is_success());
        assert_eq!(outcome.state, dir_state(&[]));

        let fx = Fixture::new();
        fs::create_dir_all(fx.ws(ITEM)).unwrap();

        let outcome = reconcile(&fx, None, None);

        assert_eq!(outcome.state, dir_state(&[]));
    }

    #[test]
    fn test_inconsistent_item_does_not_stop_others() {
        let fx = Fixture::new();
        write_at(&fx.ws("Mixed"), "file here", 10.0);
        write_at(&fx.lib("Mixed/inner"), "dir there", 10.0);
        write_at(&fx.ws("UserData/a"), "a", 10.0);

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(&fx.workspace, &fx.library, &["Mixed", ITEM], None, None)
            .unwrap();

        assert_eq!(outcome.result.failures.len(), 1);
        let failure = &outcome.result.failures[0];
        assert_eq!(failure.item, "Mixed");
        assert_eq!(failure.error.kind(), ErrorKind::Inconsistent);
        assert!(fx.lib("UserData/a").exists());
        assert!(outcome.state.get(ITEM).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_item_reports_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new();
        write_at(&fx.ws("Locked/secret"), "hidden", 10.0);
        write_at(&fx.ws("UserData/a"), "a", 10.0);
        let locked = fx.ws("Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Privileged users bypass directory permissions
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(&fx.workspace, &fx.library, &["Locked", ITEM], None, None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let outcome = outcome.unwrap();

        assert_eq!(outcome.result.failures.len(), 1);
        let failure = &outcome.result.failures[0];
        assert_eq!(failure.item, "Locked");
        assert_eq!(failure.error.kind(), ErrorKind::PermissionDenied);
        assert_eq!(failure.error.path(), locked);
        assert!(outcome.state.get("Locked").is_none());

        assert_eq!(fs::read_to_string(fx.lib("UserData/a")).unwrap(), "a");
        assert_eq!(outcome.state.get(ITEM), dir_state(&[("a", 10.0)]).get(ITEM));
    }

    #[test]
    fn test_file_vanishing_after_snapshot_is_not_found() {
        let fx = Fixture::new();
        write_at(&fx.ws("Saves/slot1"), "slot", 150.0);
        let workspace = Snapshot::from_path(&fx.ws("Saves")).unwrap();
        let library = Snapshot::empty(fx.lib("Saves"));
        let classification = PathClassifier::classify(&workspace, &library, &library);
        fs::remove_file(fx.ws("Saves/slot1")).unwrap();

        let executor = FileOperationExecutor::new(false);
        let replicas = Replicas::new(fx.ws("Saves"), fx.lib("Saves"));
        let mut result = SyncResult::default();
        let err = ConflictResolver::new(0.0, &executor)
            .apply(&classification, &workspace, &library, &replicas, &mut result)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), fx.ws("Saves/slot1"));
        assert_eq!(result.copied_to_library, 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_name_does_not_block_item() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fx = Fixture::new();
        write_at(&fx.ws("UserData/ok.dat"), "ok", 10.0);
        let odd = fx.ws(ITEM).join(OsStr::from_bytes(b"save\xff.dat"));
        fs::write(&odd, "odd").unwrap();

        let outcome = reconcile(&fx, None, None);

        assert!(outcome.result.is_success());
        assert_eq!(fs::read_to_string(fx.lib("UserData/ok.dat")).unwrap(), "ok");
        assert_eq!(outcome.state, dir_state(&[("ok.dat", 10.0)]));
    }

    #[test]
    fn test_state_type_mismatch_is_inconsistent() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/a"), "a", 10.0);
        let previous: SyncState =
            std::iter::once((ITEM.to_string(), ItemState::File(5.0))).collect();

        let outcome = reconcile(&fx, Some(&previous), Some(1.0));

        match &outcome.result.failures[0].error {
            SyncError::Inconsistent {
                expected, found, ..
            } => {
                assert_eq!(*expected, EntryType::File);
                assert_eq!(*found, EntryType::Directory);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(outcome.state, previous, "failed items keep their baseline");
        assert!(!fx.lib("UserData/a").exists());
    }

    #[test]
    fn test_dry_run_keeps_replicas_and_state() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/a"), "a", 150.0);
        fs::create_dir_all(fx.lib(ITEM)).unwrap();
        let previous = dir_state(&[]);

        let outcome = SyncEngine::new(SyncOptions { dry_run: true })
            .reconcile(&fx.workspace, &fx.library, &[ITEM], Some(&previous), Some(100.0))
            .unwrap();

        assert_eq!(outcome.result.copied_to_library, 1);
        assert!(!fx.lib("UserData/a").exists());
        assert_eq!(outcome.state, previous);
    }

    #[test]
    fn test_duplicate_items_processed_once() {
        let fx = Fixture::new();
        write_at(&fx.ws("UserData/a"), "a", 150.0);

        let outcome = SyncEngine::new(SyncOptions::default())
            .reconcile(&fx.workspace, &fx.library, &[ITEM, ITEM], None, None)
            .unwrap();

        assert_eq!(outcome.result.copied_to_library, 1);
        assert_eq!(outcome.state.len(), 1);
    }
}
