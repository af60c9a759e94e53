//! Shorthand reference tokens
//!
//! A token is bracketed text such as `[#42]`, `[abc1234]`, `[@octocat]` or
//! `[v1.2.0]` that is not already a link.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[(?P<token>#\d+|@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?|[0-9a-f]{7,40}|v\d+(?:\.\d+)*(?:-[0-9A-Za-z.\-]+)?)\]",
    )
    .expect("valid regex")
});

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^ {0,3}\[(?P<label>[^\]]+)\]:[ \t]*\S").expect("valid regex")
});

/// What a token points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Issue or pull request number
    Issue(u64),
    /// Commit hash, abbreviated or full
    Commit(String),
    /// User or organization handle, without the `@`
    User(String),
    /// Release tag
    Version(String),
}

/// A token found in changelog text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Bracketed text without the brackets, e.g. `#42`
    pub token: String,
    pub kind: ReferenceKind,
    /// Byte range of `[token]` in the scanned text
    pub span: Range<usize>,
}

impl ReferenceKind {
    fn from_token(token: &str) -> Option<Self> {
        if let Some(number) = token.strip_prefix('#') {
            return number.parse().ok().map(ReferenceKind::Issue);
        }
        if let Some(user) = token.strip_prefix('@') {
            return Some(ReferenceKind::User(user.to_string()));
        }
        if token.starts_with('v') && token[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return Some(ReferenceKind::Version(token.to_string()));
        }
        // `[2024123]` is a number, not an abbreviated hash
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(ReferenceKind::Commit(token.to_string()))
    }

    /// Resolve to a URL for a repository (`owner/name`) on `host`
    pub fn url(&self, host: &str, repo: &str) -> String {
        let host = host.trim_end_matches('/');
        match self {
            ReferenceKind::Issue(number) => format!("{}/{}/issues/{}", host, repo, number),
            ReferenceKind::Commit(sha) => format!("{}/{}/commit/{}", host, repo, sha),
            ReferenceKind::User(user) => format!("{}/{}", host, user),
            ReferenceKind::Version(tag) => format!("{}/{}/releases/tag/{}", host, repo, tag),
        }
    }
}

/// Find every reference token in plain text, in order of appearance
///
/// Link text, images and code are not plain text. Tokens directly followed by
/// `(`, `[` or `:`, or directly preceded by `]`, are link syntax and are
/// skipped too.
pub fn find_references(text: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    for run in text_runs(text) {
        for caps in TOKEN.captures_iter(&text[run.clone()]) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let span = run.start + whole.start()..run.start + whole.end();
            if is_link_syntax(text, &span) {
                continue;
            }

            let token = caps["token"].to_string();
            if let Some(kind) = ReferenceKind::from_token(&token) {
                references.push(Reference { token, kind, span });
            }
        }
    }

    references
}

/// Labels of link reference definitions already present, lowercased
pub fn defined_labels(text: &str) -> HashSet<String> {
    DEFINITION
        .captures_iter(text)
        .map(|caps| caps["label"].to_lowercase())
        .collect()
}

/// Byte ranges of plain text outside links, images and code blocks
///
/// pulldown-cmark splits unresolved `[x]` into several text events, so
/// adjacent events are joined into one run.
fn text_runs(text: &str) -> Vec<Range<usize>> {
    let options = Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let mut runs: Vec<Range<usize>> = Vec::new();
    let mut excluded = 0usize;

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                excluded += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                excluded = excluded.saturating_sub(1);
            }
            Event::Text(_) if excluded == 0 => match runs.last_mut() {
                Some(last) if last.end == range.start => last.end = range.end,
                _ => runs.push(range),
            },
            _ => {}
        }
    }

    runs
}

/// `[x](url)`, `[x][ref]`, `[x]: url` and the `[ref]` of `[text][ref]`
fn is_link_syntax(text: &str, span: &Range<usize>) -> bool {
    text[span.end..].starts_with(&['(', '[', ':'][..]) || text[..span.start].ends_with(']')
}
