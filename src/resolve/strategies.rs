//! The tiered committed-file strategies and the driver that runs them.
//!
//! Each tier is a named strategy producing `Result<Vec<String>, GitError>`.
//! The driver tries them strictly in order and stops at the first success;
//! a failing tier is logged and skipped, never propagated. This keeps the
//! fallback policy in one flat list instead of nested recovery blocks.

use crate::git::{GitError, clean_lines};

use super::worktree::{filter_by_prefix, status_paths};
use super::{ProgressSink, Provenance, ResolveRequest};

/// How far back the recent-history fallback looks when the primary
/// history scan fails on the base branch itself.
const RECENT_HISTORY_DEPTH: &str = "-20";

/// One committed-file strategy: a provenance tag plus the command(s) that
/// produce its file list.
pub(super) struct Strategy<'a> {
    pub provenance: Provenance,
    pub run: Box<dyn Fn() -> Result<Vec<String>, GitError> + 'a>,
}

/// Try each strategy in priority order; first success wins.
///
/// Exhausting every tier yields an empty set tagged [`Provenance::AllFailed`],
/// not an error.
pub(super) fn run_tiers(strategies: Vec<Strategy<'_>>) -> (Vec<String>, Provenance) {
    for strategy in strategies {
        match (strategy.run)() {
            Ok(files) => return (files, strategy.provenance),
            Err(err) => {
                log::debug!("strategy {} failed: {}", strategy.provenance, err);
            }
        }
    }
    (Vec::new(), Provenance::AllFailed)
}

/// Build the tier list for one resolution.
///
/// Same-branch selections (the branch *is* the base) get history-scan
/// semantics: a two-point diff against itself would be empty, so the listing
/// must be unconditional. Differing branches get merge-base diff semantics.
pub(super) fn committed_file_strategies<'a>(
    req: &'a ResolveRequest<'a>,
    same_branch: bool,
    progress: &'a dyn ProgressSink,
) -> Vec<Strategy<'a>> {
    let repo = req.repo;
    let filter = req.path_filter.as_deref();
    let rev = req.branch.rev();
    let base = req.base.as_str();

    if same_branch {
        vec![
            Strategy {
                provenance: Provenance::HistoryScan,
                run: Box::new({
                    let rev = rev.clone();
                    move || {
                        if req.verify_commits {
                            verified_history_scan(req, &rev, progress)
                        } else {
                            history_scan(req, &rev)
                        }
                    }
                }),
            },
            Strategy {
                provenance: Provenance::RecentHistory,
                run: Box::new(move || {
                    let mut args =
                        vec!["log", RECENT_HISTORY_DEPTH, "--pretty=format:", "--name-only", "HEAD"];
                    if let Some(f) = filter {
                        args.push("--");
                        args.push(f);
                    }
                    Ok(clean_lines(&repo.run_command(&args)?))
                }),
            },
            status_fallback(req),
        ]
    } else {
        vec![
            Strategy {
                provenance: Provenance::BranchDiff,
                run: Box::new({
                    let rev = rev.clone();
                    move || {
                        let ancestor = repo.merge_base(base, &rev)?;
                        let mut args = vec![
                            "diff",
                            "--name-only",
                            "--ignore-submodules=none",
                            ancestor.as_str(),
                            rev.as_str(),
                        ];
                        if let Some(f) = filter {
                            args.push("--");
                            args.push(f);
                        }
                        Ok(clean_lines(&repo.run_command(&args)?))
                    }
                }),
            },
            Strategy {
                provenance: Provenance::ThreeDotDiff,
                run: Box::new(move || {
                    let range = format!("{}...{}", base, rev);
                    let mut args = vec!["diff", "--name-only", range.as_str()];
                    if let Some(f) = filter {
                        args.push("--");
                        args.push(f);
                    }
                    Ok(clean_lines(&repo.run_command(&args)?))
                }),
            },
            status_fallback(req),
        ]
    }
}

/// Tier 3, shared by both branch cases: abandon branch comparison and list
/// files with uncommitted changes, untracked included.
fn status_fallback<'a>(req: &'a ResolveRequest<'a>) -> Strategy<'a> {
    let repo = req.repo;
    let filter = req.path_filter.as_deref();
    Strategy {
        provenance: Provenance::StatusFallback,
        run: Box::new(move || {
            let stdout = repo.run_command(&["status", "--porcelain"])?;
            Ok(filter_by_prefix(status_paths(&stdout, true), filter))
        }),
    }
}

/// Every file touched by any commit reachable from the branch, in one log
/// invocation.
fn history_scan(req: &ResolveRequest<'_>, rev: &str) -> Result<Vec<String>, GitError> {
    let mut args = vec!["log", "--pretty=format:", "--name-only", rev];
    if let Some(f) = req.path_filter.as_deref() {
        args.push("--");
        args.push(f);
    }
    Ok(clean_lines(&req.repo.run_command(&args)?))
}

/// The same history scan, walked commit-by-commit with progress reporting.
///
/// Slower by construction (one subprocess per commit), so it only runs when
/// the verify-commits flag is set. The caller can observe progress through
/// the sink but not abort the walk.
fn verified_history_scan(
    req: &ResolveRequest<'_>,
    rev: &str,
    progress: &dyn ProgressSink,
) -> Result<Vec<String>, GitError> {
    let filter = req.path_filter.as_deref();
    let commits = req.repo.rev_list(rev, filter)?;
    let total = commits.len().max(1);

    let mut seen = std::collections::HashSet::new();
    let mut files = Vec::new();
    for (index, sha) in commits.iter().enumerate() {
        for path in req.repo.commit_files(sha, filter)? {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
        let percent = ((index + 1) * 100 / total) as u8;
        progress.report(
            percent,
            &format!("Scanned {} of {} commits", index + 1, commits.len()),
        );
    }
    Ok(files)
}
