//! Git subprocess plumbing.
//!
//! Everything here shells out to the `git` command-line tool. Commands run
//! synchronously in the repository's working directory; a non-zero exit or a
//! spawn failure is returned as a [`GitError`], never panicked on.

mod branch;
pub mod error;

use std::path::{Path, PathBuf};
use std::process::Command;

pub use branch::BranchRef;

#[derive(Debug)]
pub enum GitError {
    CommandFailed(String),
    ParseError(String),
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::CommandFailed(msg) => write!(f, "git command failed: {}", msg.trim()),
            GitError::ParseError(msg) => write!(f, "failed to parse git output: {}", msg),
        }
    }
}

impl std::error::Error for GitError {}

/// Repository context for git operations.
///
/// Encapsulates the repository path so callers don't thread it through every
/// call. All diff/status/branch queries used by the resolver live here.
///
/// # Examples
///
/// ```no_run
/// use diffset::git::Repository;
///
/// let repo = Repository::current();
/// let branch = repo.current_branch()?;
/// # Ok::<(), diffset::git::GitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

/// The diff base for branch resolution: whichever of the two conventional
/// default-branch names the repository uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRef {
    Main,
    Master,
}

impl BaseRef {
    /// Determine the repository's base branch.
    ///
    /// Probes `main` with a ref-verification command; if that fails, assumes
    /// `master` without verifying. The absence of `main` is treated as
    /// sufficient signal, so the returned base may not actually exist.
    /// Downstream diff strategies tolerate that by falling back (see
    /// [`crate::resolve`]).
    pub fn resolve(repo: &Repository) -> Self {
        if repo.ref_exists("main") {
            BaseRef::Main
        } else {
            BaseRef::Master
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaseRef::Main => "main",
            BaseRef::Master => "master",
        }
    }
}

impl std::fmt::Display for BaseRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Repository {
    /// Create a repository context at the specified path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a repository context for the current directory.
    pub fn current() -> Self {
        Self::at(".")
    }

    /// Get the path this repository context operates on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the path is inside a git working tree.
    ///
    /// This must hold before any diff operation runs; callers surface a
    /// terminal error otherwise rather than attempting fallbacks.
    pub fn is_work_tree(&self) -> bool {
        self.run_command(&["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    /// Check if a git reference resolves (branch, tag, commit SHA, HEAD, etc.).
    pub fn ref_exists(&self, reference: &str) -> bool {
        self.run_command(&["rev-parse", "--verify", "--quiet", reference])
            .is_ok()
    }

    /// Get the current branch name, or None if in detached HEAD state.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let stdout = self.run_command(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = stdout.trim();

        if branch.is_empty() || branch == "HEAD" {
            Ok(None) // Detached HEAD
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    /// Get all branch names, local and remote-tracking.
    ///
    /// Remote names keep their `<remote>/` prefix; symbolic `<remote>/HEAD`
    /// entries are skipped.
    pub fn all_branches(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run_command(&["branch", "--all", "--format=%(refname:short)"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.ends_with("/HEAD") && *s != "HEAD")
            .map(str::to_owned)
            .collect())
    }

    /// Get the merge base (nearest common ancestor) of two refs.
    pub fn merge_base(&self, base: &str, head: &str) -> Result<String, GitError> {
        let stdout = self.run_command(&["merge-base", base, head])?;
        let sha = stdout.trim();
        if sha.is_empty() {
            return Err(GitError::ParseError("empty merge-base output".to_string()));
        }
        Ok(sha.to_string())
    }

    /// List files touched by a single commit.
    pub fn commit_files(
        &self,
        rev: &str,
        path_filter: Option<&str>,
    ) -> Result<Vec<String>, GitError> {
        // --root so a parentless initial commit still lists its files
        let mut args = vec![
            "diff-tree",
            "--root",
            "--no-commit-id",
            "--name-only",
            "-r",
            rev,
        ];
        if let Some(filter) = path_filter {
            args.push("--");
            args.push(filter);
        }
        let stdout = self.run_command(&args)?;
        Ok(clean_lines(&stdout))
    }

    /// List commit SHAs reachable from a ref, newest first.
    pub fn rev_list(
        &self,
        rev: &str,
        path_filter: Option<&str>,
    ) -> Result<Vec<String>, GitError> {
        let mut args = vec!["rev-list", rev];
        if let Some(filter) = path_filter {
            args.push("--");
            args.push(filter);
        }
        let stdout = self.run_command(&args)?;
        Ok(clean_lines(&stdout))
    }

    /// Run a git command in this repository's context.
    ///
    /// Executes the git command with this repository's path as the working
    /// directory and returns the stdout output. Stderr from a failed command
    /// becomes the error detail. No retries happen at this level; fallback
    /// policy belongs to the caller.
    pub fn run_command(&self, args: &[&str]) -> Result<String, GitError> {
        log::debug!("$ git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .map_err(|e| GitError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Split command output into trimmed, non-blank, deduplicated lines.
///
/// Order of first appearance is preserved. Every strategy's raw output goes
/// through this before being treated as a file set.
pub(crate) fn clean_lines(stdout: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_owned)
        .collect()
}
