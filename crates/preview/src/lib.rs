#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

//! Document preview splitter
//!
//! Breaks pasted document text into paragraphs and table-like regions so
//! the editor can lay out a preview. Detection is heuristic.

mod parse;
mod server;

pub use parse::{Alignment, Cell, Formatting, PreviewContent, TextBox, parse_content};
pub use server::endpoint_router;
