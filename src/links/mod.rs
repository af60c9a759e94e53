//! Link generation
//!
//! Resolves shorthand tokens (`[#42]`, `[abc1234]`, `[@octocat]`, `[v1.2.0]`)
//! into links to a hosted repository, either as reference definitions
//! appended to the document or as inline links.

pub mod tokens;

use crate::models::{ChangelogConfig, LinkStyle};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub use tokens::{defined_labels, find_references, Reference, ReferenceKind};

/// Marker line opening the block of generated reference definitions
pub const GENERATED_MARKER: &str = "<!-- Links generated by changelog -->";

/// Repository that tokens resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// `owner/name`
    pub repo: String,
    /// e.g. `https://github.com`
    pub host: String,
}

impl LinkConfig {
    /// Validate and build a link config
    ///
    /// # Errors
    /// If `repo` is not of the form `owner/name`
    pub fn new(repo: impl Into<String>, host: impl Into<String>) -> Result<Self> {
        let repo = repo.into();
        let valid = matches!(
            repo.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );
        if !valid {
            bail!("Invalid repository '{}': expected owner/name", repo);
        }

        Ok(Self {
            repo,
            host: host.into(),
        })
    }

    /// Build from project configuration, with an optional repo override
    pub fn from_config(config: &ChangelogConfig, repo: Option<&str>) -> Result<Self> {
        let Some(repo) = repo.or(config.repo.as_deref()) else {
            bail!("No repository configured: pass --repo or set `repo` in the config file");
        };
        Self::new(repo, config.host.clone())
    }

    pub fn url_for(&self, kind: &ReferenceKind) -> String {
        kind.url(&self.host, &self.repo)
    }
}

/// Rewrite shorthand tokens in `text` into links
///
/// Any block produced by an earlier run is replaced, so running this on its
/// own output changes nothing. Tokens the document already defines are left
/// alone.
pub fn generate(text: &str, config: &LinkConfig, style: LinkStyle) -> Result<String> {
    let body = strip_generated(text);
    let defined = defined_labels(body);
    let references: Vec<Reference> = find_references(body)
        .into_iter()
        .filter(|r| !defined.contains(&r.token.to_lowercase()))
        .collect();

    let output = match style {
        LinkStyle::Reference => append_definitions(body, config, &references),
        LinkStyle::Inline => inline_links(body, config, &references),
    };
    Ok(output)
}

/// Read `input`, generate links, and write the result to `output`
pub fn generate_file(
    input: &Path,
    output: &Path,
    config: &LinkConfig,
    style: LinkStyle,
) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let generated = generate(&content, config, style)?;
    std::fs::write(output, generated)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

/// Text before a previously generated block, without trailing whitespace
fn strip_generated(text: &str) -> &str {
    let body = match text.find(GENERATED_MARKER) {
        Some(index) => &text[..index],
        None => text,
    };
    body.trim_end()
}

fn append_definitions(body: &str, config: &LinkConfig, references: &[Reference]) -> String {
    let mut seen = std::collections::HashSet::new();
    let definitions: Vec<String> = references
        .iter()
        .filter(|r| seen.insert(r.token.clone()))
        .map(|r| format!("[{}]: {}", r.token, config.url_for(&r.kind)))
        .collect();

    let mut output = body.to_string();
    if !output.is_empty() {
        output.push('\n');
    }
    if !definitions.is_empty() {
        output.push('\n');
        output.push_str(GENERATED_MARKER);
        output.push('\n');
        output.push_str(&definitions.join("\n"));
        output.push('\n');
    }
    output
}

fn inline_links(body: &str, config: &LinkConfig, references: &[Reference]) -> String {
    let mut output = String::with_capacity(body.len());
    let mut cursor = 0;
    for reference in references {
        output.push_str(&body[cursor..reference.span.start]);
        output.push_str(&format!(
            "[{}]({})",
            reference.token,
            config.url_for(&reference.kind)
        ));
        cursor = reference.span.end;
    }
    output.push_str(&body[cursor..]);
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
