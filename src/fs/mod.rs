//! File System Module
//!
//! The virtual file system the shell navigates:
//! - Node model and errors (`types`)
//! - Arena-backed tree with listing and path rendering (`tree`)
//! - Declaration loading (`builder`)
//! - Path resolution (`resolve`)

pub mod types;
pub mod tree;
pub mod builder;
pub mod resolve;

pub use types::*;
pub use tree::{Children, NodeRef, Vfs};
pub use builder::{build_tree, load, load_file};
