use std::cell::RefCell;

use pretty_assertions::assert_eq;
use rstest::rstest;

use diffset::git::{BaseRef, BranchRef, Repository};
use diffset::resolve::{
    NoProgress, ProgressSink, Provenance, ResolveRequest, resolve_branch, resolve_commit,
};

use crate::common::{TestRepo, repo};

fn request<'a>(git: &'a Repository, branch: &str) -> ResolveRequest<'a> {
    ResolveRequest {
        repo: git,
        branch: BranchRef::parse(branch),
        base: BaseRef::resolve(git),
        path_filter: None,
        verify_commits: false,
    }
}

fn paths(result: &diffset::ResolutionResult) -> Vec<&str> {
    result.files.iter().map(|f| f.path.as_str()).collect()
}

// Scenario A: one commit on a feature branch, nothing modified locally.
#[rstest]
fn test_branch_diff_lists_committed_files_in_order(repo: TestRepo) {
    repo.checkout_new_branch("feature/x");
    repo.commit_files(&["src/a.rs", "src/b.rs"], "Add a and b");
    repo.checkout("main");

    let git = Repository::at(repo.root_path());
    let result = resolve_branch(&request(&git, "feature/x"), &NoProgress);

    assert_eq!(result.provenance, Provenance::BranchDiff);
    assert_eq!(paths(&result), vec!["src/a.rs", "src/b.rs"]);
    assert_eq!(result.modified_count(), 0);
}

// Scenario B: selecting the base branch itself must list the full history,
// not an empty self-diff.
#[rstest]
fn test_same_branch_uses_history_scan(repo: TestRepo) {
    repo.commit_file("src/lib.rs", "pub fn f() {}\n", "Add lib");

    let git = Repository::at(repo.root_path());
    let result = resolve_branch(&request(&git, "main"), &NoProgress);

    assert_eq!(result.provenance, Provenance::HistoryScan);
    assert_eq!(paths(&result), vec!["README.md", "src/lib.rs"]);
}

// Scenario C shape at the repository level: the configured base does not
// exist, so both diff tiers fail and resolution degrades to status output
// without surfacing an error.
#[test]
fn test_missing_base_degrades_to_status_fallback() {
    let repo = TestRepo::new();
    repo.commit_file("app.rs", "fn main() {}\n", "Initial commit");
    repo.git(&["branch", "-m", "main", "trunk"]);
    repo.write_file("app.rs", "fn main() { todo!() }\n");
    repo.write_file("notes.txt", "scratch\n");

    let git = Repository::at(repo.root_path());
    assert_eq!(BaseRef::resolve(&git), BaseRef::Master);

    let result = resolve_branch(&request(&git, "trunk"), &NoProgress);

    assert_eq!(result.provenance, Provenance::StatusFallback);
    let listed = paths(&result);
    assert!(listed.contains(&"app.rs"));
    assert!(listed.contains(&"notes.txt"));
    // app.rs is also picked up by the modification scan (trunk is checked out)
    let app = result.files.iter().find(|f| f.path == "app.rs").unwrap();
    assert!(app.modified);
}

// Scenario D: a committed file that is also locally modified appears once,
// marked modified.
#[rstest]
fn test_committed_file_also_modified_is_not_duplicated(repo: TestRepo) {
    repo.checkout_new_branch("feature/y");
    repo.commit_file("src/feature.rs", "fn f() {}\n", "Add feature");
    repo.write_file("src/feature.rs", "fn f() { todo!() }\n");

    let git = Repository::at(repo.root_path());
    let result = resolve_branch(&request(&git, "feature/y"), &NoProgress);

    assert_eq!(paths(&result), vec!["src/feature.rs"]);
    assert_eq!(result.modified_count(), 1);
}

// Scenario E: a remote-tracking selection never gets a modification scan,
// regardless of what is checked out or dirty.
#[rstest]
fn test_remote_tracking_selection_skips_modification_scan(repo: TestRepo) {
    repo.checkout_new_branch("feature/z");
    repo.commit_file("src/feature.rs", "fn f() {}\n", "Add feature");
    let sha = repo.head_sha();
    repo.set_remote_ref("origin", "feature/z", &sha);
    repo.write_file("src/feature.rs", "fn f() { todo!() }\n");

    let git = Repository::at(repo.root_path());
    let result = resolve_branch(&request(&git, "origin/feature/z"), &NoProgress);

    assert_eq!(paths(&result), vec!["src/feature.rs"]);
    assert_eq!(result.modified_count(), 0);
}

#[rstest]
fn test_resolution_is_idempotent(repo: TestRepo) {
    repo.checkout_new_branch("feature/stable");
    repo.commit_files(&["src/a.rs", "Makefile", "docs/guide.md"], "Add files");
    repo.write_file("src/a.rs", "// changed\n");

    let git = Repository::at(repo.root_path());
    let first = resolve_branch(&request(&git, "feature/stable"), &NoProgress);
    let second = resolve_branch(&request(&git, "feature/stable"), &NoProgress);

    assert_eq!(first, second);
}

#[rstest]
fn test_directory_like_entries_sort_first(repo: TestRepo) {
    repo.checkout_new_branch("feature/order");
    repo.commit_files(
        &["src/a.rs", "Makefile", "README.md", "scripts/build"],
        "Add files",
    );
    repo.checkout("main");

    let git = Repository::at(repo.root_path());
    let result = resolve_branch(&request(&git, "feature/order"), &NoProgress);

    // Makefile and scripts/build have no dot, so they classify as
    // directory-like and group at the top.
    assert_eq!(
        paths(&result),
        vec!["Makefile", "scripts/build", "README.md", "src/a.rs"]
    );
}

#[rstest]
fn test_path_filter_restricts_results(repo: TestRepo) {
    repo.checkout_new_branch("feature/filtered");
    repo.commit_files(&["src/a.rs", "docs/b.md"], "Add files");
    repo.checkout("main");

    let git = Repository::at(repo.root_path());
    let mut req = request(&git, "feature/filtered");
    req.path_filter = Some("src".to_string());
    let result = resolve_branch(&req, &NoProgress);

    assert_eq!(paths(&result), vec!["src/a.rs"]);
}

#[rstest]
fn test_resolve_commit_lists_only_that_commit(repo: TestRepo) {
    repo.commit_files(&["src/a.rs", "src/b.rs"], "Add a and b");
    let sha = repo.head_sha();
    repo.commit_file("src/c.rs", "// c\n", "Add c");

    let git = Repository::at(repo.root_path());
    let result = resolve_commit(&git, &sha, None).unwrap();

    assert_eq!(result.provenance, Provenance::CommitFiles);
    assert_eq!(paths(&result), vec!["src/a.rs", "src/b.rs"]);
}

#[rstest]
fn test_resolve_commit_bad_revision_errors(repo: TestRepo) {
    let git = Repository::at(repo.root_path());
    assert!(resolve_commit(&git, "does-not-exist", None).is_err());
}

struct RecordingProgress {
    reports: RefCell<Vec<u8>>,
}

impl ProgressSink for RecordingProgress {
    fn report(&self, percent: u8, _message: &str) {
        self.reports.borrow_mut().push(percent);
    }
}

#[rstest]
fn test_verified_history_scan_matches_plain_scan_and_reports_progress(repo: TestRepo) {
    repo.commit_file("src/lib.rs", "pub fn f() {}\n", "Add lib");
    repo.commit_file("src/util.rs", "pub fn g() {}\n", "Add util");

    let git = Repository::at(repo.root_path());
    let plain = resolve_branch(&request(&git, "main"), &NoProgress);

    let progress = RecordingProgress {
        reports: RefCell::new(Vec::new()),
    };
    let mut req = request(&git, "main");
    req.verify_commits = true;
    let verified = resolve_branch(&req, &progress);

    assert_eq!(verified.provenance, Provenance::HistoryScan);
    assert_eq!(paths(&verified), paths(&plain));

    let reports = progress.reports.borrow();
    assert!(!reports.is_empty());
    assert_eq!(*reports.last().unwrap(), 100);
}

#[rstest]
fn test_base_resolution_prefers_main(repo: TestRepo) {
    let git = Repository::at(repo.root_path());
    assert_eq!(BaseRef::resolve(&git), BaseRef::Main);

    repo.git(&["branch", "-m", "main", "master"]);
    assert_eq!(BaseRef::resolve(&git), BaseRef::Master);
}

#[rstest]
fn test_current_branch_and_detached_head(repo: TestRepo) {
    let git = Repository::at(repo.root_path());
    assert_eq!(git.current_branch().unwrap(), Some("main".to_string()));

    let sha = repo.head_sha();
    repo.git(&["checkout", "--detach", &sha]);
    assert_eq!(git.current_branch().unwrap(), None);
}

#[rstest]
fn test_all_branches_includes_remote_tracking(repo: TestRepo) {
    repo.git(&["branch", "feature"]);
    let sha = repo.head_sha();
    repo.set_remote_ref("origin", "main", &sha);

    let git = Repository::at(repo.root_path());
    let branches = git.all_branches().unwrap();

    assert!(branches.contains(&"main".to_string()));
    assert!(branches.contains(&"feature".to_string()));
    assert!(branches.contains(&"origin/main".to_string()));
}
