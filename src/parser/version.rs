//! Assembles a [`Changelog`] from a heading tree
//!
//! The first heading is the title. Each heading directly below it is a
//! version, and each heading below a version is a named section of changes.

use super::ast::{MarkdownAst, NodeId, NodeKind};
use super::header::{normalize_header_text, parse_header};
use super::text::{bullets_to_list, text_content};
use super::tree::{HeadingTree, TreeChild};
use super::ParseResult;
use crate::models::{Changelog, Changes, VersionInfo};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Build the changelog from the root of a heading tree
pub fn assemble(ast: &MarkdownAst, root: &HeadingTree) -> ParseResult<Changelog> {
    let Some(title) = root.first_heading() else {
        return Ok(Changelog::default());
    };

    let intro = title
        .elements()
        .find(|id| ast.kind(*id) == &NodeKind::Paragraph)
        .map(|id| text_content(ast, id).trim().to_string());

    let mut versions = Vec::new();
    for heading in title.headings() {
        if let Some(version) = version_info(ast, heading)? {
            versions.push(version);
        }
    }

    Ok(Changelog {
        title: non_empty(text_content(ast, title.node).trim()),
        intro,
        versions,
    })
}

/// Build one version record, or `None` when the heading yields no name
fn version_info(ast: &MarkdownAst, heading: &HeadingTree) -> ParseResult<Option<VersionInfo>> {
    let header = parse_header(&text_content(ast, heading.node))?;
    let Some(name) = header.name else {
        return Ok(None);
    };

    let url = find_version_url(ast, heading.node, &name)?;

    let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut consumed: HashSet<NodeId> = HashSet::new();

    for section in heading.headings() {
        let section_name = text_content(ast, section.node).trim().to_string();
        let nodes = change_nodes(ast, section);
        consumed.extend(nodes.iter().copied());
        // Repeated section headings accumulate under one name
        sections
            .entry(section_name)
            .or_default()
            .extend(bullets_to_list(ast, &nodes));
    }

    let general_nodes: Vec<NodeId> = change_nodes(ast, heading)
        .into_iter()
        .filter(|id| !consumed.contains(id))
        .collect();
    let general: Vec<String> = bullets_to_list(ast, &general_nodes)
        .into_iter()
        .filter(|change| !change.is_empty())
        .collect();

    Ok(Some(VersionInfo {
        name: Some(name),
        url,
        date: header.date,
        changes: Changes::combine(general, sections),
    }))
}

/// First link in the heading's own text whose label mentions the version name
fn find_version_url(
    ast: &MarkdownAst,
    heading: NodeId,
    name: &str,
) -> ParseResult<Option<String>> {
    let name = normalize_header_text(name)?;

    for id in ast.descendants(heading) {
        if let NodeKind::Link(destination) = ast.kind(id) {
            let label = normalize_header_text(&text_content(ast, id))?;
            if label.contains(&name) {
                return Ok(Some(destination.clone()));
            }
        }
    }

    Ok(None)
}

/// Bullet items and loose text runs below a heading, in document order
///
/// The search stops at items and text runs, so a bullet contributes itself
/// rather than the text inside it.
fn change_nodes(ast: &MarkdownAst, tree: &HeadingTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_tree(ast, tree, &mut out);
    out
}

fn collect_tree(ast: &MarkdownAst, tree: &HeadingTree, out: &mut Vec<NodeId>) {
    for child in &tree.children {
        match child {
            TreeChild::Element(id) => collect_element(ast, *id, out),
            TreeChild::Heading(sub) => collect_tree(ast, sub, out),
        }
    }
}

fn collect_element(ast: &MarkdownAst, id: NodeId, out: &mut Vec<NodeId>) {
    match ast.kind(id) {
        NodeKind::Item | NodeKind::Text(_) => out.push(id),
        _ => {
            for child in ast.children(id) {
                collect_element(ast, *child, out);
            }
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
