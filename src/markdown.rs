//! Inline markdown rendering and the mapping from rendered positions back to
//! the raw source.
//!
//! A node's text is stored as plain markdown. The viewer renders a small
//! inline subset with tree-sitter-md, annotating every element with the
//! source range it came from, so that a click inside the rendered view can
//! be turned back into a caret position in the raw text.

pub mod render;
pub mod source_map;

pub use render::{render_plain, NodeId, RenderNode, RenderedDoc, Renderer, Segment, Style};
pub use source_map::{source_offset, source_position, SourceRange};
