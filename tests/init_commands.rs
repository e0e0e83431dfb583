use crate::common::command::{branch_oid, repository_dir, run_twig_command, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::areas::repository::Repository;

mod common;

#[rstest]
fn new_repository_initiated_with_twig_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty twig repository in",
        ))
        .stdout(predicate::str::contains(dir_absolute_path));

    let metadata_dir = repository_dir.path().join(".twig");
    assert!(metadata_dir.join("objects").is_dir());
    assert!(metadata_dir.join("refs").join("heads").join("master").is_file());
    assert!(metadata_dir.join("index").is_file());
    assert_eq!(
        std::fs::read_to_string(metadata_dir.join("HEAD"))?,
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
fn root_commit_has_no_parent_and_the_epoch_timestamp(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let root_oid = branch_oid(repository_dir.path(), "master");

    let log = stdout_of(&mut run_twig_command(repository_dir.path(), &["log"]));

    assert_eq!(
        log,
        format!("===\ncommit {root_oid}\nDate: Wed Dec 31 16:00:00 1969 -0800\ninitial commit\n\n")
    );

    let repository = Repository::new(
        repository_dir.path().to_str().unwrap(),
        Box::new(std::io::sink()),
    )?;
    let (head_oid, head_commit) = repository.head_commit()?;
    assert_eq!(head_oid.to_string(), root_oid);
    assert!(head_commit.is_root());
    assert!(head_commit.snapshot().is_empty());
    assert_eq!(head_commit.timestamp().timestamp(), 0);

    Ok(())
}

#[rstest]
fn every_repository_starts_from_the_same_root_commit() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    run_twig_command(first.path(), &["init"]).assert().success();
    run_twig_command(second.path(), &["init"]).assert().success();

    assert_eq!(
        branch_oid(first.path(), "master"),
        branch_oid(second.path(), "master")
    );
}

#[rstest]
fn init_twice_fails(repository_dir: TempDir) {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A twig version-control system already exists in the current directory.",
        ));
}

#[rstest]
#[case(&["status"])]
#[case(&["log"])]
#[case(&["add", "a.txt"])]
#[case(&["branch", "feature"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_twig_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not in an initialized twig directory.",
        ));

    assert!(!repository_dir.path().join(".twig").exists());
}

#[rstest]
fn path_option_selects_the_repository_root(repository_dir: TempDir) {
    let nested = repository_dir.path().join("project");

    run_twig_command(
        repository_dir.path(),
        &["--path", nested.to_str().unwrap(), "init"],
    )
    .assert()
    .success();

    assert!(nested.join(".twig").join("HEAD").is_file());
    assert!(!repository_dir.path().join(".twig").exists());
}
