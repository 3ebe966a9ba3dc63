//! Parser module
//!
//! Readers for the two text inputs the shell consumes: the markup that
//! declares a VFS, and the command lines typed at the prompt.

pub mod types;
pub mod markup;
pub mod command_line;

// Re-exports
pub use types::{Content, Element, MarkupError};
pub use markup::{parse_markup, MAX_NESTING_DEPTH};
pub use command_line::{parse, tokenize, ParsedLine, TokenizeError};
