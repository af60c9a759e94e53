// Changelog - Markdown changelog parser
// Turns loosely formatted changelogs into structured version records and
// resolves shorthand references into links.

pub mod cli;
pub mod links;
pub mod models;
pub mod parser;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use models::{Changelog, ChangelogConfig, Changes, LinkStyle, VersionInfo};
pub use parser::{parse, parse_file, try_parse, try_parse_file, ParseError, ParseResult};
