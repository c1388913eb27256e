//! outliner: an immutable tree-editing engine for keyboard-driven outlines.
//!
//! The library holds the core: a persistent tree of [`item::Item`]s addressed by
//! [`path::Path`], the edit state machine that turns key commands into a new
//! tree plus a new edit target, the caret model, and the mapping from rendered
//! markdown back into source offsets. The terminal shell in `main.rs` owns the
//! root and replaces it wholesale after every dispatch.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod debounce;
pub mod edit;
pub mod error;
pub mod item;
pub mod keymap;
pub mod link;
pub mod logging;
pub mod markdown;
pub mod navigation;
pub mod path;
pub mod selection;
pub mod store;
pub mod sync;
pub mod ui;
