//! The outline node and the pure structural operations over a tree of them.
//!
//! Every operation borrows the tree and returns a new root. Nothing is mutated
//! in place, so a caller that gets an `Err` back still holds the tree it had.
//! Addressing is always by [`Path`]; ids only exist to key nodes for sync and
//! for the caret memory, never to locate them during an edit.

use crate::error::TreeError;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque identifier assigned when a node is created and never reassigned.
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    /// A fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    /// The identifier as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A node in the outline.
pub struct Item {
    /// Stable identity, used for keying and server correlation only.
    pub id: ItemId,
    /// Plain-text content; markdown syntax is kept as literal characters.
    pub text: String,
    /// Ordered children. Order defines document order and path indices.
    pub children: Vec<Item>,
    /// When false the children are kept but skipped by navigation.
    pub expand: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of a structural move: the new root and where the moved node now lives.
pub struct Moved {
    /// Root after the move.
    pub root: Item,
    /// Path of the moved node in `root`.
    pub path: Path,
}

impl Item {
    #[must_use]
    /// A new expanded leaf with a fresh id.
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
            children: Vec::new(),
            expand: true,
        }
    }

    #[must_use]
    /// Builder-style helper: this node with `children` as its children.
    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    /// Whether the node has no children at all, hidden or not.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    /// Whether the node carries any text.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty()
    }

    #[must_use]
    /// Copy of `self` with `child` inserted at `position`, appended when `None`.
    ///
    /// Out-of-range positions are clamped to the end.
    pub fn add_child(&self, child: Item, position: Option<usize>) -> Self {
        let mut children = self.children.clone();
        let index = position.map_or(children.len(), |p| p.min(children.len()));
        children.insert(index, child);
        Self {
            children,
            ..self.shallow()
        }
    }

    #[must_use]
    /// Depth-first pre-order search by id.
    pub fn find_by_id(&self, id: &ItemId) -> Option<(&Item, Path)> {
        if &self.id == id {
            return Some((self, Path::root()));
        }
        self.children.iter().enumerate().find_map(|(index, child)| {
            child
                .find_by_id(id)
                .map(|(found, rest)| (found, Path::from(vec![index]).join(&rest)))
        })
    }

    #[must_use]
    /// Walk `path` from this node; `None` when any index is out of range.
    pub fn find_by_path(&self, path: &Path) -> Option<&Item> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    #[must_use]
    /// Path to the deepest last-child-at-every-level descendant, appended to `path`.
    ///
    /// This ignores collapse state; the navigation layer decides whether to call it.
    pub fn tail(&self, path: &Path) -> Path {
        match self.children.last() {
            None => path.clone(),
            Some(last) => last.tail(&path.child(self.children.len() - 1)),
        }
    }

    /// Apply `mapper` to the node at `path` and rebuild its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidPath`] if the path does not resolve.
    pub fn map_location<F>(&self, path: &Path, mapper: F) -> Result<Item, TreeError>
    where
        F: FnOnce(&Item) -> Item,
    {
        self.try_map_location(path, |item| Ok(mapper(item)))
    }

    /// As [`Item::map_location`] with a mapper that may itself fail.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidPath`] if the path does not resolve, or the
    /// mapper's own error.
    pub fn try_map_location<F>(&self, path: &Path, mapper: F) -> Result<Item, TreeError>
    where
        F: FnOnce(&Item) -> Result<Item, TreeError>,
    {
        self.map_indices(path.indices(), path, mapper)
    }

    fn map_indices<F>(&self, indices: &[usize], path: &Path, mapper: F) -> Result<Item, TreeError>
    where
        F: FnOnce(&Item) -> Result<Item, TreeError>,
    {
        let Some((&index, rest)) = indices.split_first() else {
            return mapper(self);
        };
        let child = self
            .children
            .get(index)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
        let mapped = child.map_indices(rest, path, mapper)?;
        let children = self.children[..index]
            .iter()
            .cloned()
            .chain(std::iter::once(mapped))
            .chain(self.children[index + 1..].iter().cloned())
            .collect();
        Ok(Self {
            children,
            ..self.shallow()
        })
    }

    /// Remove `amount` consecutive siblings starting at the node addressed by `path`.
    ///
    /// # Errors
    ///
    /// Fails for the root path, for a parent that does not resolve, and for a
    /// start index past the last child.
    pub fn remove(&self, path: &Path, amount: usize) -> Result<Item, TreeError> {
        let parent = path.parent().ok_or(TreeError::Root)?;
        let index = path.last().ok_or(TreeError::Root)?;
        self.try_map_location(&parent, |node| {
            let len = node.children.len();
            if index >= len {
                return Err(TreeError::IndexOutOfRange {
                    path: path.clone(),
                    index,
                    len,
                });
            }
            let mut children = node.children.clone();
            children.drain(index..index.saturating_add(amount).min(len));
            Ok(Self {
                children,
                ..node.shallow()
            })
        })
    }

    /// Splice `items` in at `path`, replacing `remove_count` existing siblings there.
    ///
    /// The final index may equal the number of children, which appends.
    ///
    /// # Errors
    ///
    /// Fails for the root path, for a parent that does not resolve, and for an
    /// index beyond the end of the parent's children.
    pub fn insert(&self, items: Vec<Item>, path: &Path, remove_count: usize) -> Result<Item, TreeError> {
        let parent = path.parent().ok_or(TreeError::Root)?;
        let index = path.last().ok_or(TreeError::Root)?;
        self.try_map_location(&parent, |node| {
            let len = node.children.len();
            if index > len {
                return Err(TreeError::IndexOutOfRange {
                    path: path.clone(),
                    index,
                    len,
                });
            }
            let mut children = node.children.clone();
            children.splice(index..index.saturating_add(remove_count).min(len), items);
            Ok(Self {
                children,
                ..node.shallow()
            })
        })
    }

    /// Replace whatever is at `path` with `item`; the empty path replaces the root.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidPath`] if the path does not resolve.
    pub fn update(&self, item: Item, path: &Path) -> Result<Item, TreeError> {
        self.map_location(path, |_| item)
    }

    /// Detach the node at `from` and reinsert it at `to`.
    ///
    /// `to` is resolved against the tree after the removal.
    ///
    /// # Errors
    ///
    /// Fails if either path does not resolve.
    pub fn move_node(&self, from: &Path, to: &Path) -> Result<Item, TreeError> {
        let node = self
            .find_by_path(from)
            .ok_or_else(|| TreeError::InvalidPath(from.clone()))?
            .clone();
        self.remove(from, 1)?.insert(vec![node], to, 0)
    }

    /// Make the node at `path` the last child of its preceding sibling.
    ///
    /// The new parent is expanded so the node stays reachable. Returns `None`
    /// when there is no preceding sibling.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not resolve.
    pub fn indent(&self, path: &Path) -> Result<Option<Moved>, TreeError> {
        let node = self
            .find_by_path(path)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?
            .clone();
        let Some(sibling) = path.prev_sibling() else {
            return Ok(None);
        };
        let mut new_index = 0;
        let root = self.remove(path, 1)?.map_location(&sibling, |prev| {
            new_index = prev.children.len();
            let mut children = prev.children.clone();
            children.push(node);
            Self {
                children,
                expand: true,
                ..prev.shallow()
            }
        })?;
        Ok(Some(Moved {
            root,
            path: sibling.child(new_index),
        }))
    }

    /// Make the node at `path` the sibling directly after its parent.
    ///
    /// Returns `None` for nodes already at the top level.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not resolve.
    pub fn unindent(&self, path: &Path) -> Result<Option<Moved>, TreeError> {
        if path.len() < 2 {
            return Ok(None);
        }
        let Some(target) = path.parent().as_ref().and_then(Path::next_sibling) else {
            return Ok(None);
        };
        let root = self.move_node(path, &target)?;
        Ok(Some(Moved { root, path: target }))
    }

    /// The chain of nodes from this root down to the node at `path`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidPath`] if the path does not resolve.
    pub fn path_items(&self, path: &Path) -> Result<Vec<&Item>, TreeError> {
        let mut chain = vec![self];
        let mut node = self;
        for &index in path.indices() {
            node = node
                .children
                .get(index)
                .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
            chain.push(node);
        }
        Ok(chain)
    }

    #[must_use]
    /// Every node with its path, in document (pre-)order.
    pub fn preorder(&self) -> Vec<(Path, &Item)> {
        let mut out = Vec::new();
        self.collect_preorder(Path::root(), &mut out);
        out
    }

    fn collect_preorder<'a>(&'a self, path: Path, out: &mut Vec<(Path, &'a Item)>) {
        out.push((path.clone(), self));
        for (index, child) in self.children.iter().enumerate() {
            child.collect_preorder(path.child(index), out);
        }
    }

    #[must_use]
    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Item::count).sum::<usize>()
    }

    /// This node without children, used as the base when rebuilding.
    fn shallow(&self) -> Self {
        Self {
            id: self.id.clone(),
            text: self.text.clone(),
            children: Vec::new(),
            expand: self.expand,
        }
    }
}

#[cfg(test)]
#[path = "tests/item.rs"]
mod tests;
