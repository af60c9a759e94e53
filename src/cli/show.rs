//! Show command: print the changes of one version

use super::parse::version_line;
use crate::models::{Changelog, Changes, VersionInfo};
use crate::parser;
use crate::{Context, Result};
use anyhow::anyhow;
use colored::Colorize;
use std::path::Path;

pub fn run(path: &Path, version: &str, json: bool) -> Result<()> {
    let changelog = parser::parse_file(path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let info = lookup(&changelog, version)
        .ok_or_else(|| anyhow!("Version '{}' not found in {}", version, path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    println!("{}", version_line(info));
    if let Some(url) = &info.url {
        println!("{}", url.dimmed());
    }

    match &info.changes {
        Changes::Flat(items) => print_items(items),
        Changes::Sectioned(sections) => {
            for (name, items) in sections {
                println!("\n{}", name.green().bold());
                print_items(items);
            }
        }
    }

    Ok(())
}

/// Find a version by name, accepting any casing of "unreleased"
fn lookup<'a>(changelog: &'a Changelog, version: &str) -> Option<&'a VersionInfo> {
    changelog.find_version(version).or_else(|| {
        if version.eq_ignore_ascii_case("unreleased") {
            changelog.unreleased()
        } else {
            None
        }
    })
}

fn print_items(items: &[String]) {
    for item in items {
        println!("   • {}", item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "# Changelog\n\n## [Unreleased]\n\n- Pending\n\n## [1.0.0] - 2024-01-01\n\n- First\n";

    #[test]
    fn test_lookup_unreleased_any_case() {
        let changelog = parser::parse(CONTENT).unwrap();
        for name in ["unreleased", "UNRELEASED", "Unreleased"] {
            let info = lookup(&changelog, name).unwrap();
            assert_eq!(info.name.as_deref(), Some("Unreleased"), "{}", name);
        }
    }

    #[test]
    fn test_lookup_release() {
        let changelog = parser::parse(CONTENT).unwrap();
        assert_eq!(
            lookup(&changelog, "v1.0.0").and_then(|v| v.name.as_deref()),
            Some("1.0.0")
        );
        assert!(lookup(&changelog, "2.0.0").is_none());
    }
}
