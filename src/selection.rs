//! Caret and selection positions inside a node's text.
//!
//! Rows are the node's own lines, split on embedded newlines; columns count
//! characters within a row. Positions outside the text are never an error:
//! they clamp to the last row and to the end of the row.

use crate::item::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A (row, column) location in a node's text.
pub struct Position {
    /// Zero-based line within the node.
    pub row: usize,
    /// Zero-based character offset within the line.
    pub column: usize,
}

impl Position {
    /// The very start of the text.
    pub const START: Self = Self { row: 0, column: 0 };
    /// Sentinel that clamps to the very end of whatever text it is applied to.
    pub const END: Self = Self {
        row: usize::MAX,
        column: usize::MAX,
    };

    #[must_use]
    /// A position at `row`, `column`.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    #[must_use]
    /// Resolve against `text`, clamping out-of-range rows and columns.
    pub fn clamp(self, text: &str) -> Self {
        let rows = rows(text);
        let row = self.row.min(rows.len() - 1);
        let column = self.column.min(rows[row].chars().count());
        Self { row, column }
    }

    #[must_use]
    /// Byte offset of this position in `text`, after clamping.
    pub fn to_offset(self, text: &str) -> usize {
        let Self { row, column } = self.clamp(text);
        let line_start: usize = rows(text)[..row].iter().map(|r| r.len() + 1).sum();
        let line = rows(text)[row];
        line_start
            + line
                .char_indices()
                .nth(column)
                .map_or(line.len(), |(byte, _)| byte)
    }

    #[must_use]
    /// Position of byte `offset` in `text`; offsets past the end clamp to the end.
    ///
    /// An offset inside a multi-byte character resolves to that character.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let row = before.iter().filter(|b| **b == b'\n').count();
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        let column = text[line_start..]
            .char_indices()
            .take_while(|(byte, _)| line_start + byte < offset)
            .count();
        Self { row, column }
    }
}

#[must_use]
/// The rows of `text`. Always at least one, possibly empty.
pub fn rows(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A requested selection; a missing anchor means a collapsed caret at `focus`.
pub struct Selection {
    /// Fixed end of the selection.
    pub anchor: Option<Position>,
    /// Moving end of the selection, where the caret is drawn.
    pub focus: Position,
}

impl Selection {
    #[must_use]
    /// A collapsed caret at `focus`.
    pub fn caret(focus: Position) -> Self {
        Self {
            anchor: None,
            focus,
        }
    }

    #[must_use]
    /// Caret at the start of the text.
    pub fn start() -> Self {
        Self::caret(Position::START)
    }

    #[must_use]
    /// Caret at the end of the text.
    pub fn end() -> Self {
        Self::caret(Position::END)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A selection resolved against actual text and marked focused.
pub struct Resolved {
    /// Clamped anchor.
    pub anchor: Position,
    /// Clamped focus.
    pub focus: Position,
    /// Whether the node holding this selection owns the caret.
    pub has_focus: bool,
}

impl Resolved {
    #[must_use]
    /// Whether anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

#[must_use]
/// Project `selection` onto `text` and mark it focused.
///
/// Without a requested selection the `current` one is resumed (re-clamped in
/// case the text changed), or the caret goes to the start. Applying an already
/// valid selection returns it unchanged.
pub fn apply_selection(text: &str, selection: Option<&Selection>, current: Option<&Resolved>) -> Resolved {
    match (selection, current) {
        (Some(selection), _) => {
            let focus = selection.focus.clamp(text);
            let anchor = selection.anchor.map_or(focus, |a| a.clamp(text));
            Resolved {
                anchor,
                focus,
                has_focus: true,
            }
        }
        (None, Some(current)) => Resolved {
            anchor: current.anchor.clamp(text),
            focus: current.focus.clamp(text),
            has_focus: true,
        },
        (None, None) => Resolved {
            anchor: Position::START,
            focus: Position::START,
            has_focus: true,
        },
    }
}

#[derive(Clone, Debug, Default)]
/// Session-only record of the caret each node last had, keyed by id.
///
/// Ids survive structural moves, so a node re-entered after being indented
/// or reordered still resumes where it was.
pub struct CaretMemory {
    carets: HashMap<ItemId, Resolved>,
}

impl CaretMemory {
    /// Remember where the caret was when leaving `id`.
    pub fn remember(&mut self, id: &ItemId, selection: Resolved) {
        self.carets.insert(
            id.clone(),
            Resolved {
                has_focus: false,
                ..selection
            },
        );
    }

    #[must_use]
    /// The caret `id` last had, if any.
    pub fn recall(&self, id: &ItemId) -> Option<&Resolved> {
        self.carets.get(id)
    }

    /// Drop the memory of a removed node.
    pub fn forget(&mut self, id: &ItemId) {
        self.carets.remove(id);
    }
}

#[cfg(test)]
#[path = "tests/selection.rs"]
mod tests;
