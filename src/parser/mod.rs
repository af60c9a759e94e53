//! Changelog parser
//!
//! Markdown text → [`MarkdownAst`] → [`HeadingTree`] → [`Changelog`].

pub mod ast;
pub mod header;
pub mod text;
pub mod tree;
pub mod version;

use crate::models::Changelog;
use std::path::Path;

pub use ast::{MarkdownAst, Node, NodeId, NodeKind};
pub use header::{normalize_header_text, parse_date, parse_header, ParsedHeader};
pub use text::{bullets_to_list, text_content};
pub use tree::{HeadingTree, TreeChild};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that abort a parse
///
/// Unconventional changelog content is never an error; these signal a broken
/// input tree, pathological heading text, or an unreadable file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Heading tree must be built from a document node")]
    NotADocument,

    #[error("Heading tree has {0} roots, expected exactly one")]
    MultipleRoots(usize),

    #[error("Heading text did not settle after stripping brackets: {input:?}")]
    NonConvergentNormalization { input: String },

    #[error("Failed to read changelog: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse changelog text
///
/// # Example
/// ```
/// let changelog = changelog::parse("# Changelog\n\n## [1.0.0] - 2024-12-25\n\n- First release\n").unwrap();
/// assert_eq!(changelog.title.as_deref(), Some("Changelog"));
/// assert_eq!(changelog.versions[0].name.as_deref(), Some("1.0.0"));
/// ```
pub fn parse(content: &str) -> ParseResult<Changelog> {
    let ast = MarkdownAst::parse(content);
    let tree = HeadingTree::build(&ast, ast.root())?;
    version::assemble(&ast, &tree)
}

/// Read and parse a changelog file
pub fn parse_file(path: &Path) -> ParseResult<Changelog> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Like [`parse`], but reports failures as a warning and returns `None`
pub fn try_parse(content: &str) -> Option<Changelog> {
    match parse(content) {
        Ok(changelog) => Some(changelog),
        Err(e) => {
            eprintln!("Warning: Failed to parse changelog: {}", e);
            None
        }
    }
}

/// Like [`parse_file`], but reports failures as a warning and returns `None`
pub fn try_parse_file(path: &Path) -> Option<Changelog> {
    match parse_file(path) {
        Ok(changelog) => Some(changelog),
        Err(e) => {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}
