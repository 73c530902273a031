//! Working-tree modification scanning.
//!
//! The scanner only runs when the selected branch is the one actually checked
//! out: a remote-tracking selection is never "current" in that sense, and a
//! mismatched local branch means the working tree belongs to something else.
//! Ineligibility is a correct no-op, not a failure.

use crate::git::{BranchRef, Repository, clean_lines};

/// Collect the paths with local modifications, if the scan is eligible.
///
/// Unions two sources: porcelain status (modified/added/deleted/renamed
/// entries) and an explicit modified-files listing that traverses nested
/// repositories. Either source failing just drops out of the union.
pub(super) fn scan_modified(
    repo: &Repository,
    branch: &BranchRef,
    path_filter: Option<&str>,
) -> Vec<String> {
    if branch.is_remote() {
        return Vec::new();
    }
    let current = match repo.current_branch() {
        Ok(Some(name)) => name,
        // Detached HEAD or an unreadable HEAD: no branch is "current"
        Ok(None) | Err(_) => return Vec::new(),
    };
    if !branch.names_match(&current) {
        return Vec::new();
    }

    let mut seen = std::collections::HashSet::new();
    let mut paths = Vec::new();

    if let Ok(stdout) = repo.run_command(&["status", "--porcelain"]) {
        for path in filter_by_prefix(status_paths(&stdout, false), path_filter) {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    let mut args = vec!["diff", "--name-only", "--ignore-submodules=none"];
    if let Some(filter) = path_filter {
        args.push("--");
        args.push(filter);
    }
    if let Ok(stdout) = repo.run_command(&args) {
        for path in clean_lines(&stdout) {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Extract paths from `status --porcelain` output.
///
/// With `include_untracked` the `??` entries count too (the status-fallback
/// tier wants every uncommitted change); without it only
/// modified/added/deleted/renamed/copied entries qualify. Renames and copies
/// report the destination path.
pub(super) fn status_paths(porcelain: &str, include_untracked: bool) -> Vec<String> {
    porcelain
        .lines()
        .filter_map(|line| {
            if line.len() < 4 {
                return None;
            }
            let (code, rest) = line.split_at(3);
            let code = &code[..2];

            let tracked_change = code
                .chars()
                .any(|c| matches!(c, 'M' | 'A' | 'D' | 'R' | 'C'));
            let untracked = code == "??";
            if !(tracked_change || (include_untracked && untracked)) {
                return None;
            }

            // Renames/copies are "old -> new"; keep the destination
            let path = rest.rsplit(" -> ").next().unwrap_or(rest).trim();
            let path = path.trim_matches('"');
            (!path.is_empty()).then(|| path.to_string())
        })
        .collect()
}

/// Keep only paths under the filter directory, by prefix match.
pub(super) fn filter_by_prefix(paths: Vec<String>, path_filter: Option<&str>) -> Vec<String> {
    let Some(filter) = path_filter.filter(|f| !f.is_empty()) else {
        return paths;
    };
    let prefix = format!("{}/", filter.trim_end_matches('/'));
    paths
        .into_iter()
        .filter(|p| p.starts_with(&prefix) || p == filter)
        .collect()
}
