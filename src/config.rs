//! User configuration.
//!
//! A small optional TOML file at `<config-dir>/diffset/config.toml`. Missing
//! or unreadable config degrades to defaults with a warning; configuration
//! problems never block a resolution.

use std::path::PathBuf;

use etcetera::BaseStrategy;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserConfig {
    /// Walk branch history commit-by-commit with progress reporting instead
    /// of a single log invocation. Off by default; the CLI flag overrides.
    pub verify_commits: bool,
}

impl UserConfig {
    /// Load the user config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// The config file location, if a config directory can be determined.
    pub fn path() -> Option<PathBuf> {
        let strategy = etcetera::choose_base_strategy().ok()?;
        Some(strategy.config_dir().join("diffset").join("config.toml"))
    }

    fn load_from(path: &std::path::Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                log::warn!("could not read {}: {}", path.display(), err);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("invalid config at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}
