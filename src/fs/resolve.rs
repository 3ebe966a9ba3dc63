//! Path Resolution
//!
//! Walks `/`-separated path expressions over a [`Vfs`]. Absolute and
//! relative paths share one segment walk and differ only in the anchor
//! node the walk starts from.

use tracing::debug;

use super::tree::{NodeRef, Vfs};
use super::types::*;

impl Vfs {
    /// Resolve `path` starting from `current`.
    ///
    /// - `/` and the bare root name always address the root.
    /// - A leading `/` anchors at the root. A leading segment equal to the
    ///   root name also anchors at the root, unless `current` has a child
    ///   of that name. Anything else anchors at `current`.
    /// - `.` stays put, `..` moves to the parent and is absorbed at the root.
    /// - Intermediate segments only descend into directories; the last
    ///   segment may name a file.
    ///
    /// The kind of the returned node is not checked; see
    /// [`Vfs::resolve_directory`] for navigation targets.
    pub fn resolve(&self, path: &str, current: NodeId) -> Result<NodeRef<'_>, PathError> {
        let expr = strip_quotes(path.trim());
        let root = self.root();
        let root_name = self.node(root).name();

        if expr == "/" || expr == root_name {
            return Ok(self.node_ref(root));
        }

        let (anchor, rest) = match expr.strip_prefix('/') {
            Some(rest) => (root, rest),
            None => match expr.strip_prefix(root_name).and_then(|r| r.strip_prefix('/')) {
                // A real child of `current` with the root's name wins.
                Some(rest) if self.child(current, root_name).is_none() => (root, rest),
                _ => (current, expr),
            },
        };

        let mut at = anchor;
        let mut segments = rest.split('/').filter(|s| !s.is_empty()).peekable();
        while let Some(segment) = segments.next() {
            match segment {
                "." => {}
                ".." => {
                    if let Some(parent) = self.parent_of(at) {
                        at = parent;
                    }
                }
                name => {
                    let is_last = segments.peek().is_none();
                    let next = self
                        .child(at, name)
                        .filter(|&id| is_last || self.node(id).is_directory());
                    match next {
                        Some(id) => at = id,
                        None => {
                            debug!(path = expr, segment = name, "path segment not found");
                            return Err(PathError::PathNotFound { path: expr.to_string() });
                        }
                    }
                }
            }
        }

        Ok(self.node_ref(at))
    }

    /// Resolve `path` and require the target to be a directory, as a
    /// navigation command does.
    pub fn resolve_directory(&self, path: &str, current: NodeId) -> Result<NodeRef<'_>, PathError> {
        let target = self.resolve(path, current)?;
        if !target.is_directory() {
            return Err(PathError::NotADirectory { path: strip_quotes(path.trim()).to_string() });
        }
        Ok(target)
    }
}

/// Drop one pair of matching enclosing quotes, if present.
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
