//! Links command: resolve shorthand tokens into hyperlinks

use crate::links::{self, LinkConfig};
use crate::models::{ChangelogConfig, LinkStyle};
use crate::{Context, Result};
use anyhow::bail;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Changelog to rewrite (default: configured input, CHANGELOG.md)
    file: Option<PathBuf>,

    /// Repository as owner/name (overrides config)
    #[arg(short, long)]
    repo: Option<String>,

    /// Repository host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Write inline links instead of reference definitions
    #[arg(long)]
    inline: bool,

    /// Write to this file instead of rewriting the input in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only check whether the file is up to date; exit non-zero if not
    #[arg(long)]
    check: bool,
}

pub fn run(args: LinksArgs, config: &ChangelogConfig) -> Result<()> {
    let input = super::resolve_input(args.file, config);

    let mut link_config = LinkConfig::from_config(config, args.repo.as_deref())?;
    if let Some(host) = args.host {
        link_config.host = host;
    }
    let style = if args.inline {
        LinkStyle::Inline
    } else {
        config.link_style
    };

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let generated = links::generate(&content, &link_config, style)?;

    if args.check {
        if generated != content {
            bail!(
                "{} has unresolved links; run 'changelog links' to update it",
                input.display()
            );
        }
        println!("{}", format!("✓ {} is up to date", input.display()).green());
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| input.clone());
    if generated == content && output == input {
        println!("{}", "No changes needed.".yellow());
        return Ok(());
    }

    std::fs::write(&output, generated)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "{}",
        format!("✓ Links written to {}", output.display()).green()
    );
    Ok(())
}
