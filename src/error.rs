//! Error taxonomy for the tree engine, the record store and the markdown renderer.
//!
//! Tree errors are recoverable: every structural operation borrows its input,
//! so a failed operation leaves the caller holding the tree it started with.

use crate::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// A structural operation could not be applied to the tree.
pub enum TreeError {
    /// Some index along the path has no child.
    #[error("no node at path `{0}`")]
    InvalidPath(Path),
    /// The final index is past the end of the parent's children.
    #[error("index {index} out of range at `{path}` ({len} children)")]
    IndexOutOfRange {
        /// Path that was being resolved.
        path: Path,
        /// Offending child index.
        index: usize,
        /// Number of children actually present.
        len: usize,
    },
    /// The operation needs a parent or siblings and the path is the root.
    #[error("the root has no parent or siblings")]
    Root,
}

#[derive(Debug, Error)]
/// Loading or persisting outline records failed.
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file is not a valid record list.
    #[error("store JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    /// The record batch has no record with `parent = null`.
    #[error("record batch has no root")]
    NoRoot,
    /// More than one record claims to be the root.
    #[error("record batch has several roots: {0:?}")]
    ManyRoots(Vec<String>),
    /// A record names a parent that is not in the batch.
    #[error("record `{id}` names unknown parent `{parent}`")]
    UnknownParent {
        /// The orphaned record.
        id: String,
        /// The parent id it refers to.
        parent: String,
    },
}

#[derive(Debug, Error)]
/// The inline markdown renderer could not be set up.
pub enum MarkdownError {
    /// The grammar is incompatible with the linked tree-sitter runtime.
    #[error("markdown grammar rejected: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// The span query does not compile against the grammar.
    #[error("markdown span query is invalid: {0}")]
    Query(#[from] tree_sitter::QueryError),
}
