use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;

use crate::common::{TestRepo, repo};

fn diffset_in(repo: &TestRepo) -> Command {
    let mut cmd = Command::cargo_bin("diffset").unwrap();
    cmd.current_dir(repo.root_path())
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_SYSTEM", "/dev/null");
    cmd
}

#[rstest]
fn test_branch_lists_files_with_footer(repo: TestRepo) {
    repo.checkout_new_branch("feature/x");
    repo.commit_files(&["src/a.rs", "src/b.rs"], "Add a and b");
    repo.checkout("main");

    diffset_in(&repo)
        .args(["branch", "feature/x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.rs"))
        .stdout(predicate::str::contains("src/b.rs"))
        .stdout(predicate::str::contains("2 files (0 modified) [branch-diff]"));
}

#[rstest]
fn test_branch_marks_modified_entries(repo: TestRepo) {
    repo.checkout_new_branch("feature/dirty");
    repo.commit_file("src/feature.rs", "fn f() {}\n", "Add feature");
    repo.write_file("src/feature.rs", "fn f() { todo!() }\n");

    diffset_in(&repo)
        .args(["branch", "feature/dirty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M src/feature.rs"))
        .stdout(predicate::str::contains("1 files (1 modified) [branch-diff]"));
}

#[rstest]
fn test_branch_with_no_changes_prints_notice(repo: TestRepo) {
    // Branch tip equals the base tip, so the diff is legitimately empty
    repo.git(&["branch", "feature/empty"]);

    diffset_in(&repo)
        .args(["branch", "feature/empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files changed"));
}

#[rstest]
fn test_branch_json_output(repo: TestRepo) {
    repo.checkout_new_branch("feature/json");
    repo.commit_files(&["src/a.rs"], "Add a");
    repo.checkout("main");

    let output = diffset_in(&repo)
        .args(["branch", "feature/json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["modified"], 0);
    assert_eq!(value["provenance"], "branch-diff");
    assert_eq!(value["files"][0]["path"], "src/a.rs");
    assert_eq!(value["files"][0]["modified"], false);
}

#[rstest]
fn test_commit_lists_single_commit_files(repo: TestRepo) {
    repo.commit_files(&["src/a.rs", "src/b.rs"], "Add a and b");
    let sha = repo.head_sha();
    repo.commit_file("src/c.rs", "// c\n", "Add c");

    diffset_in(&repo)
        .args(["commit", &sha])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.rs"))
        .stdout(predicate::str::contains("src/b.rs"))
        .stdout(predicate::str::contains("src/c.rs").not());
}

#[rstest]
fn test_branches_lists_local_and_remote(repo: TestRepo) {
    repo.git(&["branch", "feature"]);
    let sha = repo.head_sha();
    repo.set_remote_ref("origin", "main", &sha);

    diffset_in(&repo)
        .args(["branches"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main"))
        .stdout(predicate::str::contains("feature"))
        .stdout(predicate::str::contains("origin/main"));
}

#[rstest]
fn test_path_filter_flag(repo: TestRepo) {
    repo.checkout_new_branch("feature/scoped");
    repo.commit_files(&["src/a.rs", "docs/b.md"], "Add files");
    repo.checkout("main");

    diffset_in(&repo)
        .args(["branch", "feature/scoped", "--path", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/a.rs"))
        .stdout(predicate::str::contains("docs/b.md").not());
}

#[test]
fn test_explicit_repo_that_is_not_a_repository_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("diffset")
        .unwrap()
        .args(["--repo", dir.path().to_str().unwrap(), "branch", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn test_bare_invocation_outside_any_repository_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("diffset")
        .unwrap()
        .current_dir(dir.path())
        .args(["branch", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not inside a git repository"));
}
