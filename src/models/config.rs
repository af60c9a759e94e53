use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".changelog.toml";

/// How generated links are written
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Leave tokens in place and append `[token]: url` definitions
    #[default]
    Reference,
    /// Rewrite each token as `[token](url)`
    Inline,
}

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file to read
    pub input: PathBuf,

    /// Repository as `owner/name`, used for link generation
    pub repo: Option<String>,

    /// Repository host
    pub host: String,

    /// Style of generated links
    pub link_style: LinkStyle,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("CHANGELOG.md"),
            repo: None,
            host: default_host(),
            link_style: LinkStyle::default(),
        }
    }
}

fn default_host() -> String {
    "https://github.com".to_string()
}

impl ChangelogConfig {
    /// Load `.changelog.toml` from a project directory
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        Self::load_from(&project_root.join(CONFIG_FILE))
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file does not exist
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: ChangelogConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config as TOML
    pub fn save(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}
