use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Fixed commit date, so commit ids and log output are reproducible
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

pub const READABLE_COMMIT_DATE: &str = "Sun Jan 1 12:00:00 2023 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized repository with `a.txt` and `b.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("b.txt"),
        "two".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    run_twig_command(repository_dir.path(), &["add", "b.txt"])
        .assert()
        .success();
    twig_commit(repository_dir.path(), "first commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["commit", message]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE);
    cmd
}

/// Write `content` to `name`, stage it and commit it
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_twig_command(dir, &["add", name]).assert().success();
    twig_commit(dir, message).assert().success();
}

/// The commit id a branch points to
pub fn branch_oid(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".twig").join("refs").join("heads").join(branch);
    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read ref {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}

/// The commit id the current branch points to
pub fn head_oid(dir: &Path) -> String {
    let head =
        std::fs::read_to_string(dir.join(".twig").join("HEAD")).expect("Failed to read HEAD");
    let branch = head
        .trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD is not a symbolic ref");

    branch_oid(dir, branch)
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to run twig");
    String::from_utf8(output.stdout).expect("stdout is not UTF-8")
}
