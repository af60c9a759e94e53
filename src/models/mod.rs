pub mod changelog;
pub mod config;

pub use changelog::{Changelog, Changes, VersionInfo, GENERAL_SECTION};
pub use config::{ChangelogConfig, LinkStyle, CONFIG_FILE};
