//! Document-order navigation context derived top-down from the live tree.
//!
//! Each node is handed, by its parent, the path Up should land on (`prev`) and
//! the path Down should fall through to once its own children are exhausted
//! (`next`). Both depend on sibling order and collapse state, so they are
//! recomputed from the root on every pass and never cached on the nodes.

use crate::item::{Item, ItemId};
use crate::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a node sits in document order, as seen from its ancestors.
pub struct NodeContext {
    /// Path of the node itself.
    pub path: Path,
    /// Target of "navigate up": the deepest visible node before this one.
    pub prev: Path,
    /// Target of "navigate down" once this node's subtree is exhausted.
    ///
    /// Empty when nothing follows in the rendered range.
    pub next: Path,
    /// Id of the parent, `None` for the node rendering starts at.
    pub parent_id: Option<ItemId>,
    /// Id of the preceding sibling, `None` for a first child.
    pub previous_id: Option<ItemId>,
    /// Depth below the node rendering starts at.
    pub depth: usize,
}

impl NodeContext {
    #[must_use]
    /// Context of the node rendering starts at: it behaves like a root.
    pub fn start(path: &Path) -> Self {
        Self {
            path: path.clone(),
            prev: path.clone(),
            next: Path::root(),
            parent_id: None,
            previous_id: None,
            depth: 0,
        }
    }

    #[must_use]
    /// Context of the `index`th child of `parent`, whose own context is `self`.
    ///
    /// `index` must be in range for `parent.children`.
    pub fn child(&self, parent: &Item, index: usize) -> Self {
        let path = self.path.child(index);
        let preceding = index.checked_sub(1).and_then(|i| parent.children.get(i));
        let prev = match preceding {
            None => self.path.clone(),
            Some(sibling) => visible_tail(sibling, &self.path.child(index - 1)),
        };
        let next = if index + 1 < parent.children.len() {
            self.path.child(index + 1)
        } else {
            self.next.clone()
        };
        Self {
            path,
            prev,
            next,
            parent_id: Some(parent.id.clone()),
            previous_id: preceding.map(|s| s.id.clone()),
            depth: self.depth + 1,
        }
    }

    #[must_use]
    /// Whether this node is the last among its siblings.
    pub fn is_last_sibling(&self) -> bool {
        self.next.len() < self.path.len()
    }

    #[must_use]
    /// Whether this node is the first among its siblings.
    pub fn is_first_sibling(&self) -> bool {
        self.path.last() == Some(0)
    }
}

#[must_use]
/// The deepest visible last descendant of `item`, which lives at `path`.
///
/// Stops descending at collapsed nodes, unlike [`Item::tail`].
pub fn visible_tail(item: &Item, path: &Path) -> Path {
    match item.children.last() {
        Some(last) if item.expand => visible_tail(last, &path.child(item.children.len() - 1)),
        _ => path.clone(),
    }
}

#[must_use]
/// Derive the context of the node at `path`, rendering from the root.
pub fn context_at(root: &Item, path: &Path) -> Option<NodeContext> {
    context_in(root, &Path::root(), path)
}

#[must_use]
/// Derive the context of the node at `path` when rendering starts at `start`.
///
/// `None` when `path` is outside the subtree at `start` or does not resolve.
pub fn context_in(root: &Item, start: &Path, path: &Path) -> Option<NodeContext> {
    if !start.is_sub_path_of(path) {
        return None;
    }
    let mut node = root.find_by_path(start)?;
    let mut context = NodeContext::start(start);
    for &index in &path.indices()[start.len()..] {
        let child = node.children.get(index)?;
        context = context.child(node, index);
        node = child;
    }
    Some(context)
}

#[must_use]
/// Every node reachable by navigation from `start`, in document order.
///
/// Children of collapsed nodes are skipped; the start node is always included.
pub fn visible_nodes(root: &Item, start: &Path) -> Vec<NodeContext> {
    let mut out = Vec::new();
    if let Some(node) = root.find_by_path(start) {
        collect_visible(node, NodeContext::start(start), &mut out);
    }
    out
}

fn collect_visible(node: &Item, context: NodeContext, out: &mut Vec<NodeContext>) {
    let expanded = node.expand;
    let parent = context.clone();
    out.push(context);
    if expanded {
        for (index, child) in node.children.iter().enumerate() {
            collect_visible(child, parent.child(node, index), out);
        }
    }
}

#[must_use]
/// Where "navigate down" lands from the node described by `context`.
///
/// Into the first child when expanded with children, otherwise to `next`.
/// `None` when this is the last node of the rendered range.
pub fn navigate_next(root: &Item, context: &NodeContext) -> Option<Path> {
    let node = root.find_by_path(&context.path)?;
    if node.expand && !node.is_leaf() {
        Some(context.path.child(0))
    } else if !context.path.is_root() && context.next.is_root() {
        None
    } else {
        Some(context.next.clone())
    }
}

#[must_use]
/// Where "navigate up" lands: the precomputed `prev`.
pub fn navigate_prev(context: &NodeContext) -> Path {
    context.prev.clone()
}

#[cfg(test)]
#[path = "tests/navigation.rs"]
mod tests;
