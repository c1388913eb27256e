//! Deep links: a node named by its id plus the path it had when linked.
//!
//! Paths go stale as the outline is edited, so a link is re-validated on use:
//! the path is trusted only if the node there still has the linked id,
//! otherwise the whole tree is searched by id.

use crate::item::{Item, ItemId};
use crate::path::Path;
use log::debug;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
/// An external reference to one node.
pub struct Link {
    /// Id of the linked node.
    pub id: ItemId,
    /// Where the node was when the link was made, if known.
    pub path: Option<Path>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a link points in the current tree.
pub enum Resolution {
    /// The node exists at `path`.
    Found {
        /// Current path of the node.
        path: Path,
        /// Whether the recorded path was stale and the id had to be searched.
        relocated: bool,
    },
    /// No node with the id exists any more.
    NotFound,
}

impl Link {
    #[must_use]
    /// A link to `item`, currently at `path`.
    pub fn to(item: &Item, path: Path) -> Self {
        Self {
            id: item.id.clone(),
            path: Some(path),
        }
    }

    #[must_use]
    /// Resolve against `root`.
    pub fn resolve(&self, root: &Item) -> Resolution {
        if let Some(path) = &self.path {
            if root.find_by_path(path).is_some_and(|node| node.id == self.id) {
                return Resolution::Found {
                    path: path.clone(),
                    relocated: false,
                };
            }
        }
        match root.find_by_id(&self.id) {
            Some((_, path)) => {
                debug!("link `{self}` relocated to `{path}`");
                Resolution::Found {
                    path,
                    relocated: true,
                }
            }
            None => Resolution::NotFound,
        }
    }
}

impl fmt::Display for Link {
    /// `id` or `id@0.1.2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}@{path}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for Link {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('@') {
            Some((id, path)) => Ok(Self {
                id: ItemId::from(id),
                path: Some(path.parse()?),
            }),
            None => Ok(Self {
                id: ItemId::from(s),
                path: None,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/link.rs"]
mod tests;
