use crate::common::command::{
    branch_oid, commit_file, head_oid, init_repository_dir, repository_dir, run_twig_command,
    stdout_of, twig_commit,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn commit_count(dir: &TempDir) -> usize {
    stdout_of(&mut run_twig_command(dir.path(), &["global-log"]))
        .matches("===\n")
        .count()
}

fn switch_to(dir: &TempDir, branch: &str) {
    run_twig_command(dir.path(), &["checkout", branch])
        .assert()
        .success();
}

#[rstest]
fn diverged_edits_of_the_same_file_conflict(repository_dir: TempDir) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();
    commit_file(dir.path(), "a.txt", "v1", "add a");
    commit_file(dir.path(), "a.txt", "v2", "a v2");

    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    switch_to(&dir, "feature");
    commit_file(dir.path(), "a.txt", "v3", "a v3");
    let feature = head_oid(dir.path());

    switch_to(&dir, "master");
    commit_file(dir.path(), "a.txt", "v4", "a v4");
    let master = head_oid(dir.path());

    run_twig_command(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.path().join("a.txt")),
        "<<<<<<< HEAD\nv4=======\nv3>>>>>>>\n"
    );

    let log = stdout_of(&mut run_twig_command(dir.path(), &["log"]));
    let merge = head_oid(dir.path());
    assert!(log.starts_with(&format!(
        "===\ncommit {merge}\nMerge: {} {}\nDate: ",
        &master[..7],
        &feature[..7]
    )));
    assert!(log.contains("\nMerged feature into master.\n"));
    // the first-parent walk skips the merged branch
    assert!(!log.contains("a v3"));
}

#[rstest]
fn clean_merge_combines_both_sides(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "other"])
        .assert()
        .success();
    commit_file(dir.path(), "c.txt", "master only", "add c");

    switch_to(&dir, "other");
    commit_file(dir.path(), "a.txt", "one on other", "edit a");
    run_twig_command(dir.path(), &["rm", "b.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "drop b").assert().success();
    commit_file(dir.path(), "d.txt", "other only", "add d");
    let other = head_oid(dir.path());

    switch_to(&dir, "master");
    let master = head_oid(dir.path());
    let commits_before = commit_count(&dir);

    run_twig_command(dir.path(), &["merge", "other"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.path().join("a.txt")), "one on other");
    assert!(!dir.path().join("b.txt").exists());
    assert_eq!(read_file(&dir.path().join("c.txt")), "master only");
    assert_eq!(read_file(&dir.path().join("d.txt")), "other only");
    assert_eq!(commit_count(&dir), commits_before + 1);
    assert_eq!(branch_oid(dir.path(), "other"), other);

    let log = stdout_of(&mut run_twig_command(dir.path(), &["log"]));
    assert!(log.contains(&format!("Merge: {} {}\n", &master[..7], &other[..7])));

    let status = stdout_of(&mut run_twig_command(dir.path(), &["status"]));
    assert!(status.contains("=== Staged Files ===\n\n=== Removed Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\n\n"));
}

#[rstest]
fn merge_into_an_ancestor_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    switch_to(&dir, "side");
    commit_file(dir.path(), "a.txt", "side version", "edit a on side");
    let side = head_oid(dir.path());
    switch_to(&dir, "master");
    let commits_before = commit_count(&dir);

    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(branch_oid(dir.path(), "master"), side);
    assert_eq!(read_file(&dir.path().join("a.txt")), "side version");
    assert_eq!(commit_count(&dir), commits_before);
}

#[rstest]
fn merging_an_ancestor_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "old"])
        .assert()
        .success();
    commit_file(dir.path(), "a.txt", "newer", "edit a");

    run_twig_command(dir.path(), &["merge", "old"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Given branch is an ancestor of the current branch.",
        ));
}

#[rstest]
fn merging_the_current_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["merge", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot merge a branch with itself."));
}

#[rstest]
fn merging_an_unknown_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["merge", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}

#[rstest]
fn uncommitted_changes_are_checked_first(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a.txt"), "staged".to_string()));
    run_twig_command(dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    run_twig_command(dir.path(), &["merge", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You have uncommitted changes."));
}

#[rstest]
fn untracked_file_in_the_way_aborts_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "other"])
        .assert()
        .success();
    commit_file(dir.path(), "a.txt", "master edit", "edit a");
    switch_to(&dir, "other");
    commit_file(dir.path(), "new.txt", "theirs", "add new");
    switch_to(&dir, "master");
    let master = head_oid(dir.path());
    write_file(FileSpec::new(dir.path().join("new.txt"), "mine".to_string()));

    run_twig_command(dir.path(), &["merge", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There is an untracked file in the way",
        ));

    assert_eq!(head_oid(dir.path()), master);
    assert_eq!(read_file(&dir.path().join("new.txt")), "mine");
    assert_eq!(read_file(&dir.path().join("a.txt")), "master edit");
}

#[rstest]
fn untracked_file_tracked_by_the_given_branch_aborts_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "other"])
        .assert()
        .success();
    switch_to(&dir, "other");
    commit_file(dir.path(), "c.txt", "three", "add c");
    switch_to(&dir, "master");
    run_twig_command(dir.path(), &["rm", "b.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "drop b").assert().success();
    let master = head_oid(dir.path());
    write_file(FileSpec::new(dir.path().join("b.txt"), "mine".to_string()));

    run_twig_command(dir.path(), &["merge", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There is an untracked file in the way",
        ));

    assert_eq!(head_oid(dir.path()), master);
    assert_eq!(read_file(&dir.path().join("b.txt")), "mine");
    assert!(!dir.path().join("c.txt").exists());
}
