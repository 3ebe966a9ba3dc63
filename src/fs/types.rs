//! File System Types
//!
//! Core node types and errors for the virtual file system.

use indexmap::IndexMap;
use thiserror::Error;

use crate::parser::MarkupError;

/// Node model errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    #[error("EINVAL: node name must not be empty")]
    InvalidName,

    #[error("ENOTDIR: not a directory, attach '{name}'")]
    NotADirectory { name: String },

    #[error("EEXIST: '{name}' already exists in '{parent}'")]
    DuplicateName { parent: String, name: String },
}

/// Errors that abort loading a VFS declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("cannot read VFS declaration '{path}': {message}")]
    Io { path: String, message: String },

    #[error("VFS declaration is not valid markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("malformed VFS: {reason}")]
    MalformedVfs { reason: String },

    #[error("<{element}> on line {line} has no name")]
    MissingName { element: String, line: usize },

    #[error("duplicate name '{name}' in directory '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("unknown element <{tag}> on line {line}")]
    UnknownElementKind { tag: String, line: usize },

    #[error("'{name}' is a file and cannot contain <{tag}>")]
    NotADirectory { name: String, tag: String },

    #[error("VFS root directory is empty")]
    EmptyVfs,
}

/// Path resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("{path}: No such file or directory")]
    PathNotFound { path: String },

    #[error("{path}: Not a directory")]
    NotADirectory { path: String },
}

/// Handle to a node stored in a [`Vfs`](super::Vfs) arena.
///
/// Ids are only handed out by the arena that owns the node, so they are
/// meaningless across two different trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is, plus the payload that only that kind may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory {
        children: IndexMap<String, NodeId>,
    },
    File {
        content: String,
    },
}

impl NodeKind {
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A directory or file.
///
/// Freshly constructed nodes are detached: no parent and no children.
/// They only become part of a tree through `Vfs::attach_child`, which sets
/// both sides of the relationship in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// Create a detached, empty directory.
    pub fn new_directory(name: impl Into<String>) -> Result<Self, VfsError> {
        let name = checked_name(name.into())?;
        Ok(Self {
            name,
            kind: NodeKind::Directory { children: IndexMap::new() },
            parent: None,
        })
    }

    /// Create a detached file holding `content`.
    pub fn new_file(name: impl Into<String>, content: impl Into<String>) -> Result<Self, VfsError> {
        let name = checked_name(name.into())?;
        Ok(Self {
            name,
            kind: NodeKind::File { content: content.into() },
            parent: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// File body, `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub(crate) fn children(&self) -> Option<&IndexMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

fn checked_name(name: String) -> Result<String, VfsError> {
    if name.is_empty() {
        return Err(VfsError::InvalidName);
    }
    Ok(name)
}

/// A file whose declared content could not be decoded cleanly.
///
/// Never fatal: the file is still mounted, with the warning recorded
/// alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}
