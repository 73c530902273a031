//! `diffset branches` - list branches available for selection.

use diffset::git::{Repository, error};
use diffset::styling::{HINT, println};

use super::OutputFormat;

pub fn run(repo: &Repository, format: OutputFormat) -> anyhow::Result<()> {
    let branches = repo
        .all_branches()
        .map_err(|err| error::failed_to_get_branches(err))?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "branches": branches });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::List => {
            for branch in &branches {
                println!("{branch}");
            }
            println!("{HINT}{} branches{HINT:#}", branches.len());
        }
    }
    Ok(())
}
