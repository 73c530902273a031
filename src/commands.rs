//! CLI command handlers and shared rendering.

pub mod branch;
pub mod branches;
pub mod commit;

use clap::ValueEnum;

use diffset::resolve::{self, ResolutionResult};
use diffset::styling::{DIRECTORY, HINT, HINT_EMOJI, MODIFIED, println};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per file, modified entries prefixed with `M`
    List,
    /// A machine-readable object for non-terminal consumers
    Json,
}

/// Render a resolution result in the selected format.
pub(crate) fn render(result: &ResolutionResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::List => {
            render_list(result);
            Ok(())
        }
    }
}

fn render_list(result: &ResolutionResult) {
    for entry in &result.files {
        let path = &entry.path;
        let marker = if entry.modified {
            format!("{MODIFIED}M{MODIFIED:#}")
        } else {
            " ".to_string()
        };
        if resolve::looks_like_directory(path) {
            println!("{marker} {DIRECTORY}{path}{DIRECTORY:#}");
        } else {
            println!("{marker} {path}");
        }
    }
    println!(
        "{HINT}{} files ({} modified) [{}]{HINT:#}",
        result.total(),
        result.modified_count(),
        result.provenance
    );
}

fn render_json(result: &ResolutionResult) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "files": &result.files,
        "total": result.total(),
        "modified": result.modified_count(),
        "provenance": result.provenance.to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Styled notice for an empty result; informational, not an error.
pub(crate) fn print_no_files_changed(subject: &str, result: &ResolutionResult) {
    println!(
        "{HINT_EMOJI} {HINT}No files changed for {subject} [{}]{HINT:#}",
        result.provenance
    );
}
