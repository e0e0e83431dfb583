use crate::common::command::{
    branch_oid, commit_file, head_oid, init_repository_dir, run_twig_command, stdout_of,
    twig_commit,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn branch_points_at_the_current_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    assert_eq!(branch_oid(dir.path(), "feature"), head_oid(dir.path()));
    // creating a branch does not switch to it
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".twig").join("HEAD")).unwrap(),
        "ref: refs/heads/master"
    );
}

#[rstest]
#[case("topic/nested")]
#[case("release-1.0")]
#[case("fix_42")]
fn branch_accepts_valid_names(init_repository_dir: TempDir, #[case] name: &str) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", name])
        .assert()
        .success();

    let status = stdout_of(&mut run_twig_command(dir.path(), &["status"]));
    assert!(status.contains(&format!("{name}\n")));
}

#[rstest]
#[case("bad..name")]
#[case(".hidden")]
#[case("trailing/")]
#[case("with space")]
#[case("name.lock")]
fn branch_rejects_invalid_names(init_repository_dir: TempDir, #[case] name: &str) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid branch name"));
}

#[rstest]
fn duplicate_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name already exists.",
        ));
}

#[rstest]
fn rm_branch_deletes_only_the_pointer(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    let feature = branch_oid(dir.path(), "feature");

    run_twig_command(dir.path(), &["rm-branch", "feature"])
        .assert()
        .success();

    assert!(
        !dir.path()
            .join(".twig")
            .join("refs")
            .join("heads")
            .join("feature")
            .exists()
    );
    run_twig_command(dir.path(), &["find", "first commit"])
        .assert()
        .success()
        .stdout(format!("{feature}\n"));
}

#[rstest]
fn rm_branch_of_the_current_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["rm-branch", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot remove the current branch."));
}

#[rstest]
fn rm_branch_of_an_unknown_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["rm-branch", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}

#[rstest]
fn checkout_branch_switches_the_working_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to branch 'feature'"));

    commit_file(dir.path(), "feature.txt", "feature", "add feature");
    commit_file(dir.path(), "a.txt", "one on feature", "edit a");
    run_twig_command(dir.path(), &["rm", "b.txt"])
        .assert()
        .success();
    twig_commit(dir.path(), "drop b")
        .assert()
        .success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.path().join("a.txt")), "one");
    assert_eq!(read_file(&dir.path().join("b.txt")), "two");
    assert!(!dir.path().join("feature.txt").exists());

    run_twig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.path().join("a.txt")), "one on feature");
    assert_eq!(read_file(&dir.path().join("feature.txt")), "feature");
    assert!(!dir.path().join("b.txt").exists());
}

#[rstest]
fn checkout_branch_keeps_untracked_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("notes.txt"), "mine".to_string()));

    run_twig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.path().join("notes.txt")), "mine");
}

#[rstest]
fn checkout_branch_refuses_to_overwrite_an_untracked_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir.path(), "c.txt", "theirs", "add c");
    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("c.txt"), "mine".to_string()));

    run_twig_command(dir.path(), &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There is an untracked file in the way; delete it, or add and commit it first.",
        ));

    assert_eq!(read_file(&dir.path().join("c.txt")), "mine");
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".twig").join("HEAD")).unwrap(),
        "ref: refs/heads/master"
    );
}

#[rstest]
fn checkout_of_the_current_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No need to checkout the current branch.",
        ));
}

#[rstest]
fn checkout_of_an_unknown_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["checkout", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}
