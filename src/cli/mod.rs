pub mod links;
pub mod parse;
pub mod show;

use crate::models::ChangelogConfig;
use std::path::{Path, PathBuf};

/// Changelog path from the command line, or the configured default
pub fn resolve_input(file: Option<PathBuf>, config: &ChangelogConfig) -> PathBuf {
    file.unwrap_or_else(|| config.input.clone())
}

/// Load config from `--config`, or `.changelog.toml` in the current directory
pub fn load_config(path: Option<&Path>) -> crate::Result<ChangelogConfig> {
    match path {
        Some(path) => ChangelogConfig::load_from(path),
        None => ChangelogConfig::load(&std::env::current_dir()?),
    }
}
