//! Plain-text extraction from AST nodes

use super::ast::{MarkdownAst, NodeId, NodeKind};

/// Flatten a node into plain text
///
/// Text yields its literal, inline code is wrapped in backticks, line breaks
/// become a single space, and containers concatenate their children. Anything
/// else (images without alt text, rules, raw HTML, code blocks) yields "".
pub fn text_content(ast: &MarkdownAst, id: NodeId) -> String {
    match ast.kind(id) {
        NodeKind::Text(literal) => literal.clone(),
        NodeKind::Code(literal) => format!("`{}`", literal),
        NodeKind::Break => " ".to_string(),
        _ => ast
            .children(id)
            .iter()
            .map(|child| text_content(ast, *child))
            .collect(),
    }
}

/// Turn candidate change nodes into a list of change strings
///
/// When every node is a bare text run the changes were written as prose, so
/// the runs are joined into one entry. Otherwise every node (usually a bullet)
/// becomes its own entry.
pub fn bullets_to_list(ast: &MarkdownAst, items: &[NodeId]) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    let all_text = items
        .iter()
        .all(|id| matches!(ast.kind(*id), NodeKind::Text(_)));

    if all_text {
        let joined = items
            .iter()
            .map(|id| text_content(ast, *id))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        vec![joined]
    } else {
        items.iter().map(|id| text_content(ast, *id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_block(ast: &MarkdownAst) -> NodeId {
        ast.children(ast.root())[0]
    }

    #[test]
    fn test_plain_text() {
        let ast = MarkdownAst::parse("Hello world\n");
        assert_eq!(text_content(&ast, first_block(&ast)), "Hello world");
    }

    #[test]
    fn test_inline_code_keeps_backticks() {
        let ast = MarkdownAst::parse("Use `cargo run` now\n");
        assert_eq!(text_content(&ast, first_block(&ast)), "Use `cargo run` now");
    }

    #[test]
    fn test_nested_inline_content() {
        let ast = MarkdownAst::parse("A **bold [link](https://x.y)** here\n");
        assert_eq!(text_content(&ast, first_block(&ast)), "A bold link here");
    }

    #[test]
    fn test_leaf_without_text_is_empty() {
        let ast = MarkdownAst::parse("---\n");
        assert_eq!(text_content(&ast, first_block(&ast)), "");
    }

    #[test]
    fn test_soft_break_becomes_space() {
        let ast = MarkdownAst::parse("line one\nline two\n");
        assert_eq!(text_content(&ast, first_block(&ast)), "line one line two");
    }

    #[test]
    fn test_bullets_one_entry_per_item() {
        let ast = MarkdownAst::parse("- first\n- second `code`\n");
        let list = first_block(&ast);
        let items = ast.children(list).to_vec();
        assert_eq!(
            bullets_to_list(&ast, &items),
            vec!["first".to_string(), "second `code`".to_string()]
        );
    }

    #[test]
    fn test_prose_joins_into_single_entry() {
        let ast = MarkdownAst::parse("Fixed the\nbroken build.\n");
        let paragraph = first_block(&ast);
        let texts: Vec<NodeId> = ast
            .children(paragraph)
            .iter()
            .copied()
            .filter(|id| matches!(ast.kind(*id), NodeKind::Text(_)))
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(
            bullets_to_list(&ast, &texts),
            vec!["Fixed the broken build.".to_string()]
        );
    }

    #[test]
    fn test_empty_input() {
        let ast = MarkdownAst::parse("");
        assert!(bullets_to_list(&ast, &[]).is_empty());
    }
}
