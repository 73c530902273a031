//! `diffset branch` - resolve the files changed on a branch.

use std::cell::Cell;

use diffset::config::UserConfig;
use diffset::git::{BaseRef, BranchRef, Repository};
use diffset::resolve::{NoProgress, ProgressSink, ResolveRequest, resolve_branch};
use diffset::styling::{HINT, PROGRESS_EMOJI, eprint, eprintln};

use super::{OutputFormat, print_no_files_changed, render};

pub fn run(
    repo: &Repository,
    name: &str,
    path_filter: Option<String>,
    format: OutputFormat,
    verify_flag: bool,
) -> anyhow::Result<()> {
    let config = UserConfig::load();
    let request = ResolveRequest {
        repo,
        branch: BranchRef::parse(name),
        base: BaseRef::resolve(repo),
        path_filter,
        verify_commits: verify_flag || config.verify_commits,
    };

    let result = if request.verify_commits && format == OutputFormat::List {
        resolve_branch(&request, &ConsoleProgress::default())
    } else {
        // JSON consumers get no progress chatter on stderr
        resolve_branch(&request, &NoProgress)
    };

    if result.files.is_empty() && format == OutputFormat::List {
        print_no_files_changed(&format!("branch {}", request.branch), &result);
        return Ok(());
    }

    render(&result, format)
}

/// Progress sink for the commit-verification walk: rewrites one stderr line,
/// skipping reports that would not change the displayed percentage.
#[derive(Default)]
struct ConsoleProgress {
    last: Cell<Option<u8>>,
}

impl ProgressSink for ConsoleProgress {
    fn report(&self, percent: u8, message: &str) {
        if self.last.get() == Some(percent) {
            return;
        }
        self.last.set(Some(percent));
        eprint!("\r{PROGRESS_EMOJI} {HINT}{message} ({percent}%){HINT:#}");
        if percent >= 100 {
            eprintln!();
        }
    }
}
