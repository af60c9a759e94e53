//! Owned Markdown AST
//!
//! pulldown-cmark hands out a flat stream of start/end events. The changelog
//! parser needs to look at parents and siblings, so the stream is folded into
//! an arena of typed nodes with parent and child links.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

/// Index of a node inside a [`MarkdownAst`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a Markdown element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    /// Heading with its level (1-6)
    Heading(u8),
    Paragraph,
    /// Literal text run (adjacent runs are merged)
    Text(String),
    /// Inline code span
    Code(String),
    /// List item
    Item,
    List,
    /// Hyperlink with its destination URL
    Link(String),
    /// Image with its source URL
    Image(String),
    BlockQuote,
    /// Fenced or indented code block with its literal content
    CodeBlock(String),
    Emphasis,
    Strong,
    Strikethrough,
    /// Raw HTML, block or inline
    Html(String),
    /// Soft or hard line break
    Break,
    FootnoteDefinition(String),
    FootnoteReference(String),
    Rule,
    Other,
}

/// A single node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Markdown document as an arena of nodes rooted at a single `Document`
#[derive(Debug, Clone)]
pub struct MarkdownAst {
    nodes: Vec<Node>,
}

impl MarkdownAst {
    /// Parse Markdown text with footnotes and strikethrough enabled
    pub fn parse(content: &str) -> Self {
        let options = Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(content, options);

        let mut ast = MarkdownAst {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        };
        let root = ast.root();
        let mut stack = vec![root];

        for event in parser {
            let parent = stack.last().copied().unwrap_or(root);
            match event {
                Event::Start(tag) => {
                    let id = ast.push(kind_for_tag(&tag), parent);
                    stack.push(id);
                }
                Event::End(_) => {
                    // Never pop the document itself
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(text) => ast.push_text(parent, &text),
                Event::Code(code) => {
                    ast.push(NodeKind::Code(code.to_string()), parent);
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    if let NodeKind::Html(literal) = &mut ast.nodes[parent.0].kind {
                        literal.push_str(&html);
                    } else {
                        ast.push(NodeKind::Html(html.to_string()), parent);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    ast.push(NodeKind::Break, parent);
                }
                Event::Rule => {
                    ast.push(NodeKind::Rule, parent);
                }
                Event::FootnoteReference(label) => {
                    ast.push(NodeKind::FootnoteReference(label.to_string()), parent);
                }
                _ => {}
            }
        }

        ast
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of nodes below the document
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when the document has no content
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Heading level, if the node is a heading
    pub fn heading_level(&self, id: NodeId) -> Option<u8> {
        match self.kind(id) {
            NodeKind::Heading(level) => Some(*level),
            _ => None,
        }
    }

    /// All descendants of `id` in pre-order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append text under `parent`, merging into a preceding text run or into
    /// the literal of an enclosing code block
    fn push_text(&mut self, parent: NodeId, text: &str) {
        if let NodeKind::CodeBlock(literal) = &mut self.nodes[parent.0].kind {
            literal.push_str(text);
            return;
        }

        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(literal) = &mut self.nodes[last.0].kind {
                literal.push_str(text);
                return;
            }
        }

        self.push(NodeKind::Text(text.to_string()), parent);
    }
}

fn kind_for_tag(tag: &Tag) -> NodeKind {
    match tag {
        Tag::Heading { level, .. } => NodeKind::Heading(heading_level_number(*level)),
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Item => NodeKind::Item,
        Tag::List(_) => NodeKind::List,
        Tag::BlockQuote(..) => NodeKind::BlockQuote,
        Tag::CodeBlock(_) => NodeKind::CodeBlock(String::new()),
        Tag::HtmlBlock => NodeKind::Html(String::new()),
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link { dest_url, .. } => NodeKind::Link(dest_url.to_string()),
        Tag::Image { dest_url, .. } => NodeKind::Image(dest_url.to_string()),
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition(label.to_string()),
        _ => NodeKind::Other,
    }
}

fn heading_level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
