//! Changed-file resolution.
//!
//! The core flow: given a repository, a selected branch, and the resolved base
//! ref, produce the deduplicated, ordered list of files the branch changed,
//! annotated with whether each is currently modified in the working tree.
//!
//! Committed files come from a tiered strategy chain ([`strategies`]) that
//! degrades rather than fails: every git invocation that errors falls through
//! to the next tier, and exhausting all tiers yields an empty result with
//! "all strategies failed" provenance instead of an error. The modification
//! scan ([`worktree`]) runs only after committed resolution completes, and only
//! when the selected branch is actually checked out.
//!
//! Nothing here mutates the repository; every invocation builds its result
//! fresh and holds no state beyond the call.

mod progress;
mod strategies;
mod worktree;

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::git::{BaseRef, BranchRef, GitError, Repository};

pub use progress::{NoProgress, ProgressSink};

/// Inputs for one branch resolution.
pub struct ResolveRequest<'a> {
    pub repo: &'a Repository,
    pub branch: BranchRef,
    pub base: BaseRef,
    /// Repo-relative directory constraining all commands to a subtree.
    /// `None` means the whole repository.
    pub path_filter: Option<String>,
    /// Walk the history commit-by-commit instead of one log invocation,
    /// reporting progress between commits. Off by default.
    pub verify_commits: bool,
}

/// Which strategy produced the committed-file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Every file touched by any commit reachable from the branch.
    HistoryScan,
    /// Diff between the merge base of (base, branch) and the branch tip.
    BranchDiff,
    /// Files from the last 20 commits reachable from HEAD.
    RecentHistory,
    /// Three-dot (symmetric-difference) diff between base and branch.
    ThreeDotDiff,
    /// Working-tree status, branch comparison abandoned.
    StatusFallback,
    /// Every tier failed; the result is empty but not an error.
    AllFailed,
    /// Files touched by a single commit (the non-branch entry scenario).
    CommitFiles,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::HistoryScan => "history-since-branch-start",
            Provenance::BranchDiff => "branch-diff",
            Provenance::RecentHistory => "recent-history",
            Provenance::ThreeDotDiff => "three-dot-diff",
            Provenance::StatusFallback => "status-fallback",
            Provenance::AllFailed => "all strategies failed",
            Provenance::CommitFiles => "commit-files",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved file: repo-relative path plus the modification flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFileEntry {
    pub path: String,
    pub modified: bool,
}

/// Ordered, annotated resolution output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub files: Vec<ChangedFileEntry>,
    pub provenance: Provenance,
}

impl ResolutionResult {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn modified_count(&self) -> usize {
        self.files.iter().filter(|f| f.modified).count()
    }
}

/// Resolve the changed files for a branch.
///
/// Infallible by design: command failures degrade through the tier chain, and
/// an ineligible modification scan is an empty set, not an error. The caller
/// is responsible for having verified the repository location first.
pub fn resolve_branch(req: &ResolveRequest<'_>, progress: &dyn ProgressSink) -> ResolutionResult {
    let same_branch = req.branch.names_match(req.base.as_str());
    let tiers = strategies::committed_file_strategies(req, same_branch, progress);
    let (committed, provenance) = strategies::run_tiers(tiers);

    let modified = worktree::scan_modified(req.repo, &req.branch, req.path_filter.as_deref());

    ResolutionResult {
        files: merge_entries(committed, modified),
        provenance,
    }
}

/// Resolve the files touched by a single commit.
///
/// Unlike branch resolution this is a plain differential listing with no
/// fallback chain and no modification scan, so a bad revision is an error.
pub fn resolve_commit(
    repo: &Repository,
    rev: &str,
    path_filter: Option<&str>,
) -> Result<ResolutionResult, GitError> {
    let files = repo.commit_files(rev, path_filter)?;
    Ok(ResolutionResult {
        files: merge_entries(files, Vec::new()),
        provenance: Provenance::CommitFiles,
    })
}

/// Union committed and modified paths into sorted, annotated entries.
fn merge_entries(committed: Vec<String>, modified: Vec<String>) -> Vec<ChangedFileEntry> {
    let modified_set: HashSet<String> = modified
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let mut seen = HashSet::new();
    let mut entries: Vec<ChangedFileEntry> = committed
        .into_iter()
        .chain(modified)
        .filter_map(|path| {
            let path = path.trim().to_string();
            if path.is_empty() || !seen.insert(path.clone()) {
                return None;
            }
            let modified = modified_set.contains(&path);
            Some(ChangedFileEntry { path, modified })
        })
        .collect();

    entries.sort_by(|a, b| compare_paths(&a.path, &b.path));
    entries
}

/// Directory heuristic: a trailing separator, or no dot anywhere in the path.
///
/// Extensionless files (`Makefile`) deliberately classify as directory-like;
/// consumers depend on that grouping.
pub fn looks_like_directory(path: &str) -> bool {
    path.ends_with('/') || !path.contains('.')
}

/// Two-key ordering: directory-like entries first, then case-insensitive
/// alphabetical. Raw byte order is the final tie-break so the comparator is
/// total: distinct paths never compare equal.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let dir_a = looks_like_directory(a);
    let dir_b = looks_like_directory(b);
    dir_b
        .cmp(&dir_a)
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}
