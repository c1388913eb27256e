//! The keyboard command state machine.
//!
//! A node is either being viewed or being edited. While one is edited, every
//! command goes through [`dispatch`]: given the current root, the edited path
//! and any pending text, it returns the next root and the next edit target.
//! Paths are re-derived from the root on every call and never carried across
//! a mutation. [`Session`] is the single owner that applies outcomes and keeps
//! the ephemeral caret state.

use crate::error::TreeError;
use crate::item::{Item, ItemId};
use crate::navigation::{self, NodeContext};
use crate::path::Path;
use crate::selection::{apply_selection, CaretMemory, Resolved, Selection};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// A symbolic edit command, independent of the key that produced it.
pub enum Command {
    /// Submit and move to the previous node in document order.
    NavigatePrev,
    /// Submit and move to the next node, entering expanded children first.
    NavigateNext,
    /// Reinsert the node at its `prev` path.
    SwapPrev,
    /// Reinsert the node at its `next` path.
    SwapNext,
    /// Create a new node after this one, or un-indent an empty last child.
    Enter,
    /// Become the last child of the preceding sibling.
    Indent,
    /// Become the sibling after the parent.
    Unindent,
    /// Remove an empty leaf and move to its predecessor.
    Backspace,
    /// Leave editing without structural change.
    Exit,
    /// Flip the expand flag.
    Toggle,
    /// Set the expand flag.
    Expand,
    /// Clear the expand flag.
    Collapse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Which node should hold the caret next, and where inside it.
pub struct EditTarget {
    /// Node to edit, resolved against the outcome's root.
    pub path: Path,
    /// Requested caret; `None` resumes the node's last caret or starts at 0.
    pub selection: Option<Selection>,
}

impl EditTarget {
    #[must_use]
    /// Target `path` without a caret request.
    pub fn at(path: Path) -> Self {
        Self {
            path,
            selection: None,
        }
    }

    #[must_use]
    /// Target `path` with an explicit caret request.
    pub fn with(path: Path, selection: Selection) -> Self {
        Self {
            path,
            selection: Some(selection),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of one dispatch: always a whole new root.
pub struct Outcome {
    /// Root to commit.
    pub root: Item,
    /// Next edit target; `None` leaves editing.
    pub target: Option<EditTarget>,
    /// Ids of nodes removed by this command.
    pub removed: Vec<ItemId>,
    /// Whether the tree differs from the one passed in.
    pub changed: bool,
}

impl Outcome {
    fn unchanged(root: &Item, path: &Path) -> Self {
        Self {
            root: root.clone(),
            target: Some(EditTarget::at(path.clone())),
            removed: Vec::new(),
            changed: false,
        }
    }
}

/// Replace the text of the node at `path`.
///
/// # Errors
///
/// Returns [`TreeError::InvalidPath`] if the path does not resolve.
pub fn submit(root: &Item, path: &Path, text: &str) -> Result<Item, TreeError> {
    root.map_location(path, |node| Item {
        text: text.to_string(),
        ..node.clone()
    })
}

#[must_use]
/// Apply `command` to the node at `path`, rendering from `start`.
///
/// `pending` is the edited text not yet submitted; it is written into the
/// tree before the command runs. Invalid or stale paths produce an unchanged
/// outcome and a logged warning.
pub fn dispatch(
    root: &Item,
    start: &Path,
    path: &Path,
    pending: Option<&str>,
    command: Command,
) -> Outcome {
    match try_dispatch(root, start, path, pending, command) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("{command:?} at `{path}` ignored: {e}");
            Outcome::unchanged(root, path)
        }
    }
}

fn try_dispatch(
    root: &Item,
    start: &Path,
    path: &Path,
    pending: Option<&str>,
    command: Command,
) -> Result<Outcome, TreeError> {
    let (root, submitted) = match pending {
        Some(text) if root.find_by_path(path).is_some_and(|n| n.text != text) => {
            (submit(root, path, text)?, true)
        }
        _ => (root.clone(), false),
    };
    let context = navigation::context_in(&root, start, path)
        .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
    let node = root
        .find_by_path(path)
        .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
    let is_start = path == start;
    debug!("{command:?} at `{path}` (prev `{}`, next `{}`)", context.prev, context.next);

    let step = match command {
        Command::NavigatePrev => Step::Go(EditTarget::at(navigation::navigate_prev(&context))),
        Command::NavigateNext => match navigation::navigate_next(&root, &context) {
            Some(next) => Step::Go(EditTarget::at(next)),
            None => Step::Stay,
        },
        Command::SwapPrev if !is_start && !context.is_first_sibling() => {
            Step::Changed(root.move_node(path, &context.prev)?, EditTarget::at(context.prev))
        }
        Command::SwapNext if !is_start && context.next.len() == path.len() => {
            Step::Changed(root.move_node(path, &context.next)?, EditTarget::at(context.next))
        }
        Command::Enter => enter(&root, start, &context, node)?,
        Command::Indent if !is_start => match root.indent(path)? {
            Some(moved) => Step::Changed(moved.root, EditTarget::at(moved.path)),
            None => Step::Stay,
        },
        Command::Unindent => unindent(&root, start, path)?,
        Command::Backspace if !is_start && !node.has_content() && node.is_leaf() => {
            Step::Removed(
                root.remove(path, 1)?,
                node.id.clone(),
                EditTarget::with(context.prev, Selection::end()),
            )
        }
        Command::Exit => Step::Exit,
        Command::Toggle => Step::Changed(
            set_expand(&root, path, !node.expand)?,
            EditTarget::at(path.clone()),
        ),
        Command::Expand => Step::Changed(set_expand(&root, path, true)?, EditTarget::at(path.clone())),
        Command::Collapse => Step::Changed(
            set_expand(&root, path, false)?,
            EditTarget::at(path.clone()),
        ),
        Command::SwapPrev | Command::SwapNext | Command::Indent | Command::Backspace => Step::Stay,
    };

    Ok(match step {
        Step::Stay => Outcome {
            target: Some(EditTarget::at(path.clone())),
            removed: Vec::new(),
            changed: submitted,
            root,
        },
        Step::Go(target) => Outcome {
            target: Some(target),
            removed: Vec::new(),
            changed: submitted,
            root,
        },
        Step::Exit => Outcome {
            target: None,
            removed: Vec::new(),
            changed: submitted,
            root,
        },
        Step::Changed(next, target) => Outcome {
            root: next,
            target: Some(target),
            removed: Vec::new(),
            changed: true,
        },
        Step::Removed(next, id, target) => Outcome {
            root: next,
            target: Some(target),
            removed: vec![id],
            changed: true,
        },
    })
}

enum Step {
    Stay,
    Go(EditTarget),
    Exit,
    Changed(Item, EditTarget),
    Removed(Item, ItemId, EditTarget),
}

/// An empty last child below the top level steps out a level; anything else
/// opens a fresh node, as first child of an expanded parent or as next sibling.
fn enter(root: &Item, start: &Path, context: &NodeContext, node: &Item) -> Result<Step, TreeError> {
    let path = &context.path;
    if context.is_last_sibling() && path.len() > 1 && !node.has_content() {
        if let step @ Step::Changed(..) = unindent(root, start, path)? {
            return Ok(step);
        }
    }
    let create = if path == start || (node.expand && !node.is_leaf()) {
        path.child(0)
    } else {
        path.next_sibling().ok_or(TreeError::Root)?
    };
    let next = root.insert(vec![Item::create("")], &create, 0)?;
    Ok(Step::Changed(next, EditTarget::with(create, Selection::start())))
}

/// Un-indenting never lifts a node out of the rendered subtree.
fn unindent(root: &Item, start: &Path, path: &Path) -> Result<Step, TreeError> {
    if path.len() <= start.len() + 1 {
        return Ok(Step::Stay);
    }
    Ok(match root.unindent(path)? {
        Some(moved) => Step::Changed(moved.root, EditTarget::with(moved.path, Selection::end())),
        None => Step::Stay,
    })
}

fn set_expand(root: &Item, path: &Path, expand: bool) -> Result<Item, TreeError> {
    root.map_location(path, |node| Item {
        expand,
        ..node.clone()
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The node currently holding the caret.
pub struct Editing {
    /// Where the node is in the current root.
    pub path: Path,
    /// Its id, for caret memory.
    pub id: ItemId,
    /// Caret resolved against its text.
    pub selection: Resolved,
}

/// Single owner of the root: commits outcomes and resolves carets.
///
/// The root is replaced wholesale on every change, never edited in place.
pub struct Session {
    root: Item,
    start: Path,
    editing: Option<Editing>,
    carets: CaretMemory,
}

impl Session {
    #[must_use]
    /// A session over `root`, rendering from the root, viewing.
    pub fn new(root: Item) -> Self {
        Self {
            root,
            start: Path::root(),
            editing: None,
            carets: CaretMemory::default(),
        }
    }

    #[must_use]
    /// The current root.
    pub fn root(&self) -> &Item {
        &self.root
    }

    #[must_use]
    /// Path rendering starts at (the zoomed node).
    pub fn start(&self) -> &Path {
        &self.start
    }

    #[must_use]
    /// The node being edited, if any.
    pub fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    /// Render from `start` instead of the root; leaves editing.
    ///
    /// Ignored when `start` does not resolve.
    pub fn zoom(&mut self, start: Path) {
        if self.root.find_by_path(&start).is_some() {
            self.leave();
            self.start = start;
        } else {
            warn!("zoom to `{start}` ignored: no such node");
        }
    }

    /// Swap in a root from elsewhere (a reload); editing and zoom are reset.
    pub fn replace_root(&mut self, root: Item) {
        self.root = root;
        self.start = Path::root();
        self.editing = None;
    }

    /// Put the caret in the node at `target.path`.
    ///
    /// Returns false, leaving the session as it was, if the path is invalid or
    /// outside the rendered subtree.
    pub fn begin(&mut self, target: &EditTarget) -> bool {
        if !self.start.is_sub_path_of(&target.path) {
            return false;
        }
        let Some(node) = self.root.find_by_path(&target.path) else {
            warn!("cannot edit `{}`: no such node", target.path);
            return false;
        };
        let id = node.id.clone();
        let text = node.text.clone();
        self.leave();
        let selection = apply_selection(&text, target.selection.as_ref(), self.carets.recall(&id));
        self.editing = Some(Editing {
            path: target.path.clone(),
            id,
            selection,
        });
        true
    }

    /// Stop editing, remembering the caret.
    pub fn leave(&mut self) {
        if let Some(editing) = self.editing.take() {
            self.carets.remember(&editing.id, editing.selection);
        }
    }

    /// Record where the caret moved to inside the edited node.
    pub fn set_caret(&mut self, selection: Resolved) {
        if let Some(editing) = self.editing.as_mut() {
            editing.selection = selection;
        }
    }

    /// Write `text` into the edited node without any structural change.
    ///
    /// Returns whether the tree changed.
    pub fn submit(&mut self, text: &str) -> bool {
        let Some(editing) = self.editing.as_ref() else {
            return false;
        };
        if self
            .root
            .find_by_path(&editing.path)
            .is_some_and(|n| n.text == text)
        {
            return false;
        }
        match submit(&self.root, &editing.path, text) {
            Ok(root) => {
                self.root = root;
                true
            }
            Err(e) => {
                warn!("submit at `{}` failed: {e}", editing.path);
                false
            }
        }
    }

    /// Dispatch `command` for the edited node and commit the outcome.
    ///
    /// Returns `None` when nothing is being edited.
    pub fn apply(&mut self, command: Command, pending: Option<&str>) -> Option<Outcome> {
        let editing = self.editing.clone()?;
        let outcome = dispatch(&self.root, &self.start, &editing.path, pending, command);
        self.root = outcome.root.clone();
        self.leave();
        for id in &outcome.removed {
            self.carets.forget(id);
        }
        if let Some(target) = &outcome.target {
            if !self.begin(target) {
                warn!("edit target `{}` is not reachable", target.path);
            }
        }
        Some(outcome)
    }
}

#[cfg(test)]
#[path = "tests/edit.rs"]
mod tests;
