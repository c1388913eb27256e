//! Paths address nodes by the child indices leading from the root.
//!
//! A path is only meaningful against the root it was derived from. After any
//! structural change a path must be recomputed; nothing here tries to heal a
//! stale one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered sequence of zero-based child indices from the root to a node.
///
/// The empty path denotes the root itself.
pub struct Path(Vec<usize>);

impl Path {
    #[must_use]
    /// The root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    /// Number of indices, i.e. the depth of the addressed node.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    /// Alias of [`Path::is_root`] for collection-style call sites.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    /// The raw indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[must_use]
    /// Index of the addressed node among its siblings, `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    #[must_use]
    /// Path of the `index`th child of the addressed node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    #[must_use]
    /// Path of the parent, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, rest)| Self(rest.to_vec()))
    }

    #[must_use]
    /// Same parent, sibling index replaced.
    ///
    /// Returns `None` for the root, which has no siblings.
    pub fn with_last(&self, index: usize) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        let mut indices = rest.to_vec();
        indices.push(index);
        Some(Self(indices))
    }

    #[must_use]
    /// Path of the sibling directly after this node.
    pub fn next_sibling(&self) -> Option<Self> {
        self.with_last(self.last()? + 1)
    }

    #[must_use]
    /// Path of the sibling directly before this node.
    pub fn prev_sibling(&self) -> Option<Self> {
        self.with_last(self.last()?.checked_sub(1)?)
    }

    #[must_use]
    /// Concatenate `other` onto the end of this path.
    pub fn join(&self, other: &Path) -> Self {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&other.0);
        Self(indices)
    }

    #[must_use]
    /// True iff `self` lies on the route to `path`: every index of `self`
    /// matches the corresponding index of `path`.
    ///
    /// Reflexive, and false whenever `self` is longer than `path`.
    pub fn is_sub_path_of(&self, path: &Path) -> bool {
        self.0.len() <= path.0.len() && self.0.iter().zip(&path.0).all(|(a, b)| a == b)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for Path {
    type Err = std::num::ParseIntError;

    /// Parses the dotted form produced by `Display`; the empty string is the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<usize>, _>>()
            .map(Self)
    }
}

#[cfg(test)]
#[path = "tests/path.rs"]
mod tests;
