//! Map a position in rendered markdown back to an offset in the raw source.
//!
//! Elements carry the source range they were rendered from. A position inside
//! a text leaf is resolved by finding the nearest annotated node (the leaf
//! itself, then its preceding sibling, then its ancestors) and searching for
//! the leaf's text in the source from there.
//!
//! The search is a plain substring match, so it is fuzzy: when the same text
//! occurs more than once after the annotated start, the first occurrence
//! wins, and a leaf whose text was altered by rendering (collapsed escapes,
//! for instance) is not found at all and maps to the start of the range.

use super::render::{NodeId, RenderedDoc};
use crate::selection::Position;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A half-open source range, 1-based rows and 1-based byte columns.
///
/// Written `startRow:startColumn-endRow:endColumn`.
pub struct SourceRange {
    /// First row of the range.
    pub start_row: usize,
    /// First byte column on `start_row`.
    pub start_column: usize,
    /// Row holding the end.
    pub end_row: usize,
    /// Byte column just past the range on `end_row`.
    pub end_column: usize,
}

impl SourceRange {
    #[must_use]
    /// The range covering all of `source`.
    pub fn whole(source: &str) -> Self {
        let last_row = source.split('\n').count();
        let last_len = source.rsplit('\n').next().map_or(0, str::len);
        Self {
            start_row: 1,
            start_column: 1,
            end_row: last_row,
            end_column: last_len + 1,
        }
    }

    #[must_use]
    /// The range a syntax node spans.
    pub fn of_node(node: &tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_row: start.row + 1,
            start_column: start.column + 1,
            end_row: end.row + 1,
            end_column: end.column + 1,
        }
    }

    #[must_use]
    /// Absolute byte offsets of the start and end within `source`.
    pub fn offsets(&self, source: &str) -> (usize, usize) {
        let at = |row: usize, column: usize| {
            (line_start(source, row.saturating_sub(1)) + column.saturating_sub(1)).min(source.len())
        };
        (
            at(self.start_row, self.start_column),
            at(self.end_row, self.end_column),
        )
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_row, self.start_column, self.end_row, self.end_column
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A source range annotation did not have the `r:c-r:c` shape.
pub struct ParseRangeError(String);

impl fmt::Display for ParseRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed source range `{}`", self.0)
    }
}

impl std::error::Error for ParseRangeError {}

impl FromStr for SourceRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseRangeError(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(malformed)?;
        let point = |part: &str| -> Option<(usize, usize)> {
            let (row, column) = part.split_once(':')?;
            Some((row.trim().parse().ok()?, column.trim().parse().ok()?))
        };
        let (start_row, start_column) = point(start).ok_or_else(malformed)?;
        let (end_row, end_column) = point(end).ok_or_else(malformed)?;
        Ok(Self {
            start_row,
            start_column,
            end_row,
            end_column,
        })
    }
}

#[must_use]
/// Byte offset where zero-based line `line` starts.
///
/// Lines past the end resolve to the start of the last line.
pub fn line_start(source: &str, line: usize) -> usize {
    let mut position = 0;
    for _ in 0..line {
        match source[position..].find('\n') {
            Some(index) => position += index + 1,
            None => return position,
        }
    }
    position
}

#[must_use]
/// Byte offset in `source` of character `offset` inside text leaf `node`.
///
/// Nodes without any annotated ancestor map to 0.
pub fn source_offset(source: &str, doc: &RenderedDoc, node: NodeId, offset: usize) -> usize {
    let content = doc.text_content(node);
    let within = content
        .char_indices()
        .nth(offset)
        .map_or(content.len(), |(byte, _)| byte);
    let search = |start: usize| {
        let start = floor_char_boundary(source, start);
        let found = source[start..]
            .find(content.as_str())
            .map_or(start, |index| start + index + within);
        floor_char_boundary(source, found)
    };

    let Some(current) = doc.node(node) else {
        return 0;
    };
    if let Some(range) = current.source {
        return search(range.offsets(source).0);
    }
    if let Some(range) = current.previous.and_then(|p| doc.node(p)).and_then(|p| p.source) {
        return search(range.offsets(source).1);
    }
    let mut parent = current.parent;
    while let Some(id) = parent {
        let Some(ancestor) = doc.node(id) else {
            break;
        };
        if let Some(range) = ancestor.source {
            return search(range.offsets(source).0);
        }
        parent = ancestor.parent;
    }
    0
}

#[must_use]
/// As [`source_offset`], converted to a caret position in `source`.
pub fn source_position(source: &str, doc: &RenderedDoc, node: NodeId, offset: usize) -> Position {
    Position::from_offset(source, source_offset(source, doc, node, offset))
}

fn floor_char_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
#[path = "../tests/markdown_source_map.rs"]
mod tests;
