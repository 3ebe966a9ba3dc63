//! vfs-shell - A minimal shell over a declaratively defined virtual file system
//!
//! The library builds an in-memory directory tree from a markup declaration,
//! resolves path expressions against it, and drives a small interactive
//! shell (`cd`, `ls`, `pwd`, `uptime`, `exit`) on top.

pub mod commands;
pub mod fs;
pub mod parser;
pub mod shell;

pub use fs::{load, load_file, LoadError, Node, NodeId, NodeKind, NodeRef, PathError, Vfs, VfsError};
pub use shell::{Shell, ShellOptions};
