//! Heading tree
//!
//! Markdown is flat: a heading and the paragraphs that follow it are siblings.
//! This module nests everything under the heading it belongs to, so that a
//! version's changes become descendants of the version heading.

use super::ast::{MarkdownAst, NodeId, NodeKind};
use super::{ParseError, ParseResult};
use std::collections::HashSet;

/// Child of a heading tree node
#[derive(Debug, Clone)]
pub enum TreeChild {
    /// AST element passed through with all of its original descendants
    Element(NodeId),
    /// Nested heading
    Heading(HeadingTree),
}

/// A heading (or the document root, at level 0) and everything under it
#[derive(Debug, Clone)]
pub struct HeadingTree {
    /// 0 for the document, 1-6 for headings
    pub level: u8,
    /// Back-reference to the document or heading node in the AST
    pub node: NodeId,
    pub children: Vec<TreeChild>,
}

impl HeadingTree {
    fn new(level: u8, node: NodeId) -> Self {
        Self {
            level,
            node,
            children: Vec::new(),
        }
    }

    /// Build the heading tree for a document node
    ///
    /// A heading's inline content is not part of the tree; it stays reachable
    /// through [`HeadingTree::node`].
    ///
    /// # Errors
    /// * `NotADocument` if `root` is not a document node
    /// * `MultipleRoots` if reparenting leaves more than one root
    pub fn build(ast: &MarkdownAst, root: NodeId) -> ParseResult<Self> {
        if ast.kind(root) != &NodeKind::Document {
            return Err(ParseError::NotADocument);
        }

        let flat = flatten(ast, root);
        nest(flat)
    }

    /// Direct heading children
    pub fn headings(&self) -> impl Iterator<Item = &HeadingTree> {
        self.children.iter().filter_map(|child| match child {
            TreeChild::Heading(tree) => Some(tree),
            TreeChild::Element(_) => None,
        })
    }

    /// Direct element children
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|child| match child {
            TreeChild::Element(id) => Some(*id),
            TreeChild::Heading(_) => None,
        })
    }

    /// First heading below this node in document order
    pub fn first_heading(&self) -> Option<&HeadingTree> {
        self.headings().next()
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Pre-order walk producing one tree node per document/heading, each holding
/// the elements that follow it
fn flatten(ast: &MarkdownAst, root: NodeId) -> Vec<HeadingTree> {
    let mut flat: Vec<HeadingTree> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        match ast.kind(id) {
            NodeKind::Document => flat.push(HeadingTree::new(0, id)),
            NodeKind::Heading(level) => {
                flat.push(HeadingTree::new(*level, id));
                // Heading text is not part of the body
                continue;
            }
            _ => {
                let parent_seen = ast.parent(id).is_some_and(|p| seen.contains(&p));
                seen.insert(id);
                if !parent_seen {
                    if let Some(current) = flat.last_mut() {
                        current.children.push(TreeChild::Element(id));
                    }
                }
            }
        }
        stack.extend(ast.children(id).iter().rev().copied());
    }

    flat
}

/// Attach every node to the nearest preceding node with a strictly smaller level
fn nest(flat: Vec<HeadingTree>) -> ParseResult<HeadingTree> {
    let levels: Vec<u8> = flat.iter().map(|tree| tree.level).collect();
    let parents: Vec<Option<usize>> = (0..levels.len())
        .map(|i| (0..i).rev().find(|&j| levels[j] < levels[i]))
        .collect();

    let mut slots: Vec<Option<HeadingTree>> = flat.into_iter().map(Some).collect();
    let mut pending: Vec<Vec<HeadingTree>> = vec![Vec::new(); slots.len()];
    let mut roots = Vec::new();

    // Walking backwards means every node's sub-headings are complete before
    // the node itself is moved into its parent.
    for i in (0..slots.len()).rev() {
        let Some(mut tree) = slots[i].take() else {
            continue;
        };
        let subheadings = std::mem::take(&mut pending[i]);
        tree.children
            .extend(subheadings.into_iter().rev().map(TreeChild::Heading));

        match parents[i] {
            Some(j) => pending[j].push(tree),
            None => roots.push(tree),
        }
    }

    match roots.len() {
        1 => Ok(roots.remove(0)),
        n => Err(ParseError::MultipleRoots(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(content: &str) -> (MarkdownAst, HeadingTree) {
        let ast = MarkdownAst::parse(content);
        let tree = HeadingTree::build(&ast, ast.root()).unwrap();
        (ast, tree)
    }

    #[test]
    fn test_rejects_non_document() {
        let ast = MarkdownAst::parse("# Title\n");
        let heading = ast.children(ast.root())[0];
        let result = HeadingTree::build(&ast, heading);
        assert!(matches!(result, Err(ParseError::NotADocument)));
    }

    #[test]
    fn test_empty_document() {
        let (_, tree) = build("");
        assert!(tree.is_root());
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_content_nests_under_heading() {
        let (ast, tree) = build("# Title\n\nIntro\n\n## 1.0.0\n\n- change\n");
        assert_eq!(tree.elements().count(), 0);

        let title = tree.first_heading().unwrap();
        assert_eq!(title.level, 1);
        let intro: Vec<NodeId> = title.elements().collect();
        assert_eq!(intro.len(), 1);
        assert_eq!(ast.kind(intro[0]), &NodeKind::Paragraph);

        let version = title.first_heading().unwrap();
        assert_eq!(version.level, 2);
        let elements: Vec<NodeId> = version.elements().collect();
        assert_eq!(elements.len(), 1);
        assert_eq!(ast.kind(elements[0]), &NodeKind::List);
    }

    #[test]
    fn test_siblings_keep_document_order() {
        let (ast, tree) = build("# T\n## A\n### A1\n## B\n### B1\n### B2\n");
        let title = tree.first_heading().unwrap();
        let versions: Vec<&HeadingTree> = title.headings().collect();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].headings().count(), 1);
        assert_eq!(versions[1].headings().count(), 2);
        assert!(ast.node(versions[0].node).children.len() == 1);
    }

    #[test]
    fn test_skipped_levels_attach_to_nearest_smaller() {
        let (_, tree) = build("# T\n#### Deep\n## Shallow\n");
        let title = tree.first_heading().unwrap();
        let levels: Vec<u8> = title.headings().map(|h| h.level).collect();
        assert_eq!(levels, vec![4, 2]);
    }

    #[test]
    fn test_content_before_first_heading_stays_on_root() {
        let (_, tree) = build("Preamble\n\n# Title\n");
        assert_eq!(tree.elements().count(), 1);
        assert_eq!(tree.headings().count(), 1);
    }

    #[test]
    fn test_nested_content_not_duplicated() {
        let (_, tree) = build("# T\n\n- a\n  - b\n- c\n");
        let title = tree.first_heading().unwrap();
        // Only the outer list is attached; items come through it
        assert_eq!(title.elements().count(), 1);
    }
}
