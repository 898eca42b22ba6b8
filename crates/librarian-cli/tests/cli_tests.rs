use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    library: PathBuf,
    workspace: PathBuf,
    data: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let library = tmp.path().join("library");
        let workspace = tmp.path().join("workspace");
        fs::create_dir_all(&library).unwrap();
        fs::create_dir_all(workspace.join("UserData")).unwrap();
        fs::write(workspace.join("UserData/save.dat"), "level 1").unwrap();
        let data = tmp.path().join("librarian.yaml");
        Self {
            _tmp: tmp,
            library,
            workspace,
            data,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("librarian").unwrap();
        cmd.env_remove("RUST_LOG")
            .arg("--library")
            .arg(&self.library)
            .arg("--workspace")
            .arg(&self.workspace)
            .arg("--data")
            .arg(&self.data);
        cmd
    }
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("librarian").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Librarian project checkout tool"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("assign"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("librarian").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_status_initialises_data_file() {
    let env = TestEnv::new();

    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("There is no current project assigned."))
        .stdout(predicate::str::contains("Tracked:   UserData"))
        .stdout(predicate::str::contains("Data file:"));

    let yaml = fs::read_to_string(&env.data).unwrap();
    assert!(yaml.contains("library-path:"));
    assert!(yaml.contains("sync-targets:"));
    assert!(yaml.contains("UserData"));
}

#[test]
fn test_missing_library_path_fails() {
    let env = TestEnv::new();
    let mut cmd = Command::cargo_bin("librarian").unwrap();
    cmd.arg("--library")
        .arg(env.library.join("nope"))
        .arg("--workspace")
        .arg(&env.workspace)
        .arg("--data")
        .arg(&env.data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist"));
    assert!(!env.data.exists());
}

#[test]
fn test_create_and_list() {
    let env = TestEnv::new();

    env.cmd()
        .args(["create", "games/demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project games/demo"));
    assert!(env.library.join("games/demo/.studio_project").is_file());
    assert!(env.library.join("games/demo/UserData/save.dat").is_file());

    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- games/demo"));

    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Current project: games/demo"));
}

#[test]
fn test_sync_copies_new_workspace_file() {
    let env = TestEnv::new();
    env.cmd().args(["create", "demo"]).assert().success();
    fs::write(env.workspace.join("UserData/new.dat"), "fresh").unwrap();

    env.cmd()
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To library:   1"));
    assert!(!env.library.join("demo/UserData/new.dat").exists());

    env.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("To library:   1"))
        .stdout(predicate::str::contains("Success"));
    assert_eq!(
        fs::read_to_string(env.library.join("demo/UserData/new.dat")).unwrap(),
        "fresh"
    );
}

#[test]
fn test_pull_without_project_fails() {
    let env = TestEnv::new();

    env.cmd()
        .arg("pull")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No assigned project to pull from."));
}

#[test]
fn test_assign_unknown_project() {
    let env = TestEnv::new();

    env.cmd()
        .args(["assign", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_copy_and_delete_with_yes() {
    let env = TestEnv::new();
    env.cmd().args(["create", "games/demo"]).assert().success();

    env.cmd()
        .args(["copy", "games/demo", "backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied project games/demo to games/backup"));

    env.cmd()
        .args(["-y", "delete", "-p", "games/*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project games/backup"))
        .stdout(predicate::str::contains("Deleted project games/demo"));

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found in library."));
    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("There is no current project assigned."));
}

#[test]
fn test_invalid_log_level_falls_back() {
    let env = TestEnv::new();

    env.cmd()
        .args(["--log", "loud"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid logging level selected: loud"));
}
