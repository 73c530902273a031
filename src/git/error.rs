//! Error constructors and formatting helpers.
//!
//! Uses anyhow for error propagation. Known failure categories get specific,
//! styled messages; anything unanticipated goes through [`unexpected`] so the
//! user always sees a distinguishable generic message instead of a raw trace.

use std::path::Path;

use crate::styling::{ERROR, ERROR_BOLD, ERROR_EMOJI, HINT, HINT_EMOJI};

/// No repository path was given and the current directory is not a work tree.
pub fn no_workspace() -> anyhow::Error {
    anyhow::anyhow!(
        "{ERROR_EMOJI} {ERROR}Not inside a git repository{ERROR:#}\n\n{HINT_EMOJI} {HINT}Run from a repository, or pass one with --repo{HINT:#}"
    )
}

/// An explicitly supplied directory is not a git work tree.
pub fn not_a_repository(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "{ERROR_EMOJI} {ERROR}Not a git repository: {ERROR_BOLD}{}{ERROR_BOLD:#}{ERROR:#}",
        path.display()
    )
}

/// Branch enumeration failed.
pub fn failed_to_get_branches(detail: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!(
        "{ERROR_EMOJI} {ERROR}Failed to get branches{ERROR:#}\n{HINT}{}{HINT:#}",
        detail
    )
}

/// Anything outside the named failure categories.
pub fn unexpected(detail: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!(
        "{ERROR_EMOJI} {ERROR}An unexpected error occurred{ERROR:#}\n{HINT}{}{HINT:#}",
        detail
    )
}
