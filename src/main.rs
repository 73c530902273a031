mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use commands::OutputFormat;
use diffset::git::{GitError, Repository, error};
use diffset::styling::eprintln;

#[derive(Parser)]
#[command(name = "diffset", version)]
#[command(about = "Inspect the files changed on a branch or in a commit", long_about = None)]
struct Cli {
    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    /// Restrict results to a repo-relative directory
    #[arg(long, global = true, value_name = "DIR")]
    path: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "list")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the files changed on a branch relative to the default base
    Branch {
        /// Branch name; `origin/...` and `remotes/...` forms are accepted
        name: String,

        /// Walk the history commit-by-commit with progress reporting
        #[arg(long)]
        verify_commits: bool,
    },
    /// List the files touched by a single commit
    Commit {
        /// Any commit-ish revision
        rev: String,
    },
    /// List branches available for selection
    Branches,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        // Known failure categories arrive pre-formatted; a raw subprocess
        // error escaping this far is something we didn't anticipate.
        if err.downcast_ref::<GitError>().is_some() {
            eprintln!("{}", error::unexpected(err));
        } else {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let repo = open_repository(cli.repo.as_deref())?;

    match cli.command {
        Commands::Branch {
            name,
            verify_commits,
        } => commands::branch::run(&repo, &name, cli.path, cli.format, verify_commits),
        Commands::Commit { rev } => commands::commit::run(&repo, &rev, cli.path, cli.format),
        Commands::Branches => commands::branches::run(&repo, cli.format),
    }
}

/// Open and verify the repository location before any diff operation runs.
///
/// An explicit `--repo` names a directory that may sit outside the invoking
/// workspace; without it the current directory must itself be a work tree.
fn open_repository(path: Option<&Path>) -> anyhow::Result<Repository> {
    match path {
        Some(path) => {
            let repo = Repository::at(path);
            if !repo.is_work_tree() {
                return Err(error::not_a_repository(path));
            }
            Ok(repo)
        }
        None => {
            let repo = Repository::current();
            if !repo.is_work_tree() {
                return Err(error::no_workspace());
            }
            Ok(repo)
        }
    }
}
