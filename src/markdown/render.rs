//! Inline markdown to a small element tree, using tree-sitter-md's inline grammar.
//!
//! Only emphasis, strong emphasis, code spans, inline links and images are
//! styled; everything else is kept as literal text. Delimiters and link
//! destinations are dropped from the rendered text.

use super::source_map::SourceRange;
use crate::error::MarkdownError;
use log::warn;
use std::ops::Range;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor};

const SPAN_QUERY: &str = "[(emphasis) (strong_emphasis) (code_span) (inline_link) (image)] @span";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// What kind of element a rendered node is.
pub enum Style {
    /// The whole text of the outline node.
    Paragraph,
    /// `*text*` or `_text_`.
    Emphasis,
    /// `**text**`.
    Strong,
    /// `` `code` ``.
    Code,
    /// `[text](destination)`.
    Link,
    /// `![description](destination)`, rendered as its description.
    Image,
}

impl Style {
    fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "emphasis" => Some(Self::Emphasis),
            "strong_emphasis" => Some(Self::Strong),
            "code_span" => Some(Self::Code),
            "inline_link" => Some(Self::Link),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Index of a node in a [`RenderedDoc`].
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One node of the rendered tree: an element or a text leaf.
pub struct RenderNode {
    /// Enclosing element; `None` only for the paragraph.
    pub parent: Option<NodeId>,
    /// Preceding sibling under the same parent.
    pub previous: Option<NodeId>,
    /// Children in order; always empty for text leaves.
    pub children: Vec<NodeId>,
    /// Element kind, `None` for text leaves.
    pub style: Option<Style>,
    /// Rendered text, only set on leaves.
    pub text: String,
    /// Where in the source the element came from; leaves carry none.
    pub source: Option<SourceRange>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A run of one leaf's text on one rendered line.
pub struct Segment {
    /// The text leaf this run belongs to.
    pub node: NodeId,
    /// Character offset of the run within the leaf's text.
    pub offset: usize,
    /// The text of the run, without line breaks.
    pub text: String,
    /// Styles of every enclosing element, outermost first.
    pub styles: Vec<Style>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A rendered node text: an arena of elements and leaves, rooted at index 0.
pub struct RenderedDoc {
    nodes: Vec<RenderNode>,
}

impl RenderedDoc {
    fn with_paragraph(source: &str) -> Self {
        Self {
            nodes: vec![RenderNode {
                parent: None,
                previous: None,
                children: Vec::new(),
                style: Some(Style::Paragraph),
                text: String::new(),
                source: Some(SourceRange::whole(source)),
            }],
        }
    }

    fn push(&mut self, parent: NodeId, mut node: RenderNode) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        node.previous = self.nodes[parent].children.last().copied();
        self.nodes[parent].children.push(id);
        self.nodes.push(node);
        id
    }

    fn push_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(
            parent,
            RenderNode {
                parent: None,
                previous: None,
                children: Vec::new(),
                style: None,
                text: text.to_string(),
                source: None,
            },
        );
    }

    fn push_element(&mut self, parent: NodeId, style: Style, source: SourceRange) -> NodeId {
        self.push(
            parent,
            RenderNode {
                parent: None,
                previous: None,
                children: Vec::new(),
                style: Some(style),
                text: String::new(),
                source: Some(source),
            },
        )
    }

    #[must_use]
    /// The paragraph element everything hangs off.
    pub fn root(&self) -> NodeId {
        0
    }

    #[must_use]
    /// The node with index `id`.
    pub fn node(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id)
    }

    #[must_use]
    /// Number of nodes, elements and leaves together.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// Never true: the paragraph is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    /// Concatenated text of every leaf below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.nodes.get(id) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }

    #[must_use]
    /// Rendered lines, split at line breaks inside leaves. At least one line.
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        let mut lines = vec![Vec::new()];
        let mut styles = Vec::new();
        self.collect_lines(self.root(), &mut styles, &mut lines);
        lines
    }

    fn collect_lines(&self, id: NodeId, styles: &mut Vec<Style>, lines: &mut Vec<Vec<Segment>>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(style) = node.style {
            styles.push(style);
            for &child in &node.children {
                self.collect_lines(child, styles, lines);
            }
            styles.pop();
            return;
        }
        let mut offset = 0;
        for (index, part) in node.text.split('\n').enumerate() {
            if index > 0 {
                lines.push(Vec::new());
                offset += 1;
            }
            if !part.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(Segment {
                        node: id,
                        offset,
                        text: part.to_string(),
                        styles: styles.clone(),
                    });
                }
            }
            offset += part.chars().count();
        }
    }

    #[must_use]
    /// The text leaf and character offset within it drawn at (`row`, `column`).
    ///
    /// Columns past the end of a line resolve to the end of its last run.
    /// `None` for rows that are out of range or hold no text.
    pub fn hit(&self, row: usize, column: usize) -> Option<(NodeId, usize)> {
        let lines = self.lines();
        let line = lines.get(row)?;
        let mut start = 0;
        for segment in line {
            let width = segment.text.chars().count();
            if column < start + width {
                return Some((segment.node, segment.offset + column - start));
            }
            start += width;
        }
        line.last()
            .map(|segment| (segment.node, segment.offset + segment.text.chars().count()))
    }
}

struct Span {
    style: Style,
    outer: Range<usize>,
    content: Range<usize>,
    source: SourceRange,
}

/// The inline parser and compiled span query, reused across renders.
pub struct Renderer {
    parser: Parser,
    query: Query,
}

impl Renderer {
    /// Load the inline grammar and compile the span query.
    ///
    /// # Errors
    ///
    /// Fails if the grammar does not match the tree-sitter runtime.
    pub fn new() -> Result<Self, MarkdownError> {
        let language: tree_sitter::Language = tree_sitter_md::INLINE_LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let query = Query::new(&language, SPAN_QUERY)?;
        Ok(Self { parser, query })
    }

    /// Render `source`; falls back to plain text if parsing fails.
    pub fn render(&mut self, source: &str) -> RenderedDoc {
        let Some(tree) = self.parser.parse(source, None) else {
            warn!("markdown parse failed, rendering as plain text");
            return render_plain(source);
        };
        let mut spans = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), source.as_bytes());
        while let Some(m) = matches.next() {
            for capture in m.captures {
                if let Some(style) = Style::from_kind(capture.node.kind()) {
                    spans.push(Span {
                        style,
                        outer: capture.node.byte_range(),
                        content: content_range(capture.node, style),
                        source: SourceRange::of_node(&capture.node),
                    });
                }
            }
        }
        spans.sort_by(|a, b| {
            a.outer
                .start
                .cmp(&b.outer.start)
                .then(b.outer.end.cmp(&a.outer.end))
        });
        spans.dedup_by(|a, b| a.outer == b.outer);

        let mut doc = RenderedDoc::with_paragraph(source);
        let root = doc.root();
        fill(&mut doc, root, source, 0..source.len(), &spans);
        doc
    }
}

#[must_use]
/// A paragraph holding `source` as a single text leaf.
pub fn render_plain(source: &str) -> RenderedDoc {
    let mut doc = RenderedDoc::with_paragraph(source);
    let root = doc.root();
    doc.push_text(root, source);
    doc
}

/// Lay out `spans`, sorted by start, inside `range` of `parent`.
fn fill(doc: &mut RenderedDoc, parent: NodeId, source: &str, range: Range<usize>, spans: &[Span]) {
    let mut cursor = range.start;
    let mut index = 0;
    while let Some(span) = spans.get(index) {
        let nested = spans[index + 1..]
            .iter()
            .take_while(|inner| inner.outer.start < span.outer.end)
            .count();
        if span.outer.start >= cursor && span.outer.end <= range.end {
            doc.push_text(parent, source.get(cursor..span.outer.start).unwrap_or_default());
            let element = doc.push_element(parent, span.style, span.source);
            let inner = &spans[index + 1..index + 1 + nested];
            fill(doc, element, source, span.content.clone(), inner);
            cursor = span.outer.end;
        }
        index += 1 + nested;
    }
    if cursor < range.end {
        doc.push_text(parent, source.get(cursor..range.end).unwrap_or_default());
    }
}

/// The part of a span's source that renders as text.
fn content_range(node: Node<'_>, style: Style) -> Range<usize> {
    let mut walker = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut walker).collect();
    let wanted = match style {
        Style::Link => Some("link_text"),
        Style::Image => Some("image_description"),
        _ => None,
    };
    if let Some(kind) = wanted {
        return children
            .iter()
            .find(|child| child.kind() == kind)
            .map_or(node.start_byte()..node.start_byte(), Node::byte_range);
    }
    // The text between delimiters is not a node, so each end may only claim
    // delimiters from its own half of the children.
    let is_delimiter = |child: &&Node<'_>| child.kind().ends_with("_delimiter");
    let half = children.len() / 2;
    let start = children[..half]
        .iter()
        .take_while(is_delimiter)
        .last()
        .map_or(node.start_byte(), Node::end_byte);
    let end = children[children.len() - half..]
        .iter()
        .rev()
        .take_while(is_delimiter)
        .last()
        .map_or(node.end_byte(), Node::start_byte);
    start..end.max(start)
}

#[cfg(test)]
#[path = "../tests/markdown_render.rs"]
mod tests;
