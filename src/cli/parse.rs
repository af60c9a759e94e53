//! Parse command: summarize a changelog

use crate::models::{Changelog, Changes, VersionInfo};
use crate::parser;
use crate::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let changelog = parser::parse_file(path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&changelog)?);
        return Ok(());
    }

    print_summary(&changelog);
    Ok(())
}

fn print_summary(changelog: &Changelog) {
    match &changelog.title {
        Some(title) => println!("{}", title.bold()),
        None => println!("{}", "(untitled changelog)".yellow()),
    }
    if let Some(intro) = &changelog.intro {
        println!("{}", intro.dimmed());
    }

    if changelog.versions.is_empty() {
        println!("\n{}", "No versions found.".yellow());
        return;
    }

    println!("\n{}", "Versions:".green().bold());
    for version in &changelog.versions {
        println!("   • {}", version_line(version));
        if let Some(url) = &version.url {
            println!("     {}", url.dimmed());
        }
    }
}

/// One-line description: name, date and change count
pub fn version_line(version: &VersionInfo) -> String {
    let name = version.name.as_deref().unwrap_or("?");
    let date = version
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    let count = version.changes.len();
    let noun = if count == 1 { "change" } else { "changes" };

    let sections = match &version.changes {
        Changes::Sectioned(sections) => format!(
            " in {}",
            sections.keys().cloned().collect::<Vec<_>>().join(", ")
        ),
        Changes::Flat(_) => String::new(),
    };

    format!("{} ({}) - {} {}{}", name.cyan(), date, count, noun, sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    #[test]
    fn test_version_line_flat() {
        colored::control::set_override(false);
        let version = VersionInfo {
            name: Some("1.0.0".to_string()),
            url: None,
            date: NaiveDate::from_ymd_opt(2024, 12, 25),
            changes: Changes::Flat(vec!["a".to_string()]),
        };
        assert_eq!(version_line(&version), "1.0.0 (2024-12-25) - 1 change");
    }

    #[test]
    fn test_version_line_sectioned() {
        colored::control::set_override(false);
        let mut sections = IndexMap::new();
        sections.insert("Added".to_string(), vec!["a".to_string(), "b".to_string()]);
        sections.insert("Fixed".to_string(), vec!["c".to_string()]);
        let version = VersionInfo {
            name: Some("Unreleased".to_string()),
            url: None,
            date: None,
            changes: Changes::Sectioned(sections),
        };
        assert_eq!(
            version_line(&version),
            "Unreleased (undated) - 3 changes in Added, Fixed"
        );
    }
}
