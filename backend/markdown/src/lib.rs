//! Markdown intermediate representation and renderers.
//!
//! Replies from the tutor model are markdown (bold answer labels, the odd
//! list). They are parsed once into [`MarkdownNode`]s and then rendered for
//! whichever surface shows them: plain text, ANSI terminals, or the TUI.

pub mod ir;
pub mod renderer;

pub use ir::{IrParser, MarkdownNode};
pub use renderer::Renderer;
