//! `diffset commit` - list the files touched by a single commit.

use diffset::git::{Repository, error};
use diffset::resolve::resolve_commit;

use super::{OutputFormat, print_no_files_changed, render};

pub fn run(
    repo: &Repository,
    rev: &str,
    path_filter: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let result =
        resolve_commit(repo, rev, path_filter.as_deref()).map_err(|err| error::unexpected(err))?;

    if result.files.is_empty() && format == OutputFormat::List {
        print_no_files_changed(&format!("commit {rev}"), &result);
        return Ok(());
    }

    render(&result, format)
}
