//! Arena-backed VFS tree
//!
//! Every node lives in one `Vec` owned by [`Vfs`]. Parent/child links are
//! [`NodeId`] indices into that vector, so the upward `parent` link never
//! owns anything and dropping the `Vfs` frees the whole tree.

use std::fmt;

use indexmap::map::Values;

use super::types::*;

/// The root always occupies the first arena slot.
pub(crate) const ROOT_ID: NodeId = NodeId(0);

/// An immutable-after-load virtual file system.
#[derive(Debug, Clone)]
pub struct Vfs {
    nodes: Vec<Node>,
    root: NodeId,
    warnings: Vec<DecodeWarning>,
}

impl Vfs {
    /// Start a tree from a detached root directory.
    pub fn new(root: Node) -> Result<Self, VfsError> {
        if !root.is_directory() {
            return Err(VfsError::NotADirectory { name: root.name });
        }
        Ok(Self {
            nodes: vec![Node { parent: None, ..root }],
            root: ROOT_ID,
            warnings: Vec::new(),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        self.node_ref(self.root)
    }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// # Panics
    /// If `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// # Panics
    /// If `id` was not issued by this tree.
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node id {} out of range", id.0);
        NodeRef { vfs: self, id }
    }

    /// Per-file decoding problems recorded while the tree was built.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: DecodeWarning) {
        self.warnings.push(warning);
    }

    /// Attach a detached node under `parent`, returning the child's id.
    ///
    /// The parent's child map and the child's back-reference are written
    /// together; on error neither is touched.
    pub fn attach_child(&mut self, parent: NodeId, child: Node) -> Result<NodeId, VfsError> {
        let id = NodeId(self.nodes.len());
        let parent_node = &self.nodes[parent.0];
        let children = match &parent_node.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => {
                return Err(VfsError::NotADirectory { name: parent_node.name.clone() });
            }
        };
        if children.contains_key(&child.name) {
            return Err(VfsError::DuplicateName {
                parent: parent_node.name.clone(),
                name: child.name,
            });
        }

        let name = child.name.clone();
        let kind = match child.kind {
            // A detached directory cannot legally own ids from this arena.
            NodeKind::Directory { .. } => NodeKind::Directory { children: Default::default() },
            file => file,
        };
        self.nodes.push(Node { name: child.name, kind, parent: Some(parent) });
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.insert(name, id);
        }
        Ok(id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Direct child of `dir` named `name`, of either kind.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir).children()?.get(name).copied()
    }

    /// Child directories of `id` in insertion order; empty for a file.
    pub fn list_directories(&self, id: NodeId) -> Children<'_> {
        self.children_filtered(id, ChildFilter::Directories)
    }

    /// Child files of `id` in insertion order; empty for a file.
    pub fn list_files(&self, id: NodeId) -> Children<'_> {
        self.children_filtered(id, ChildFilter::Files)
    }

    /// All children of `id` in insertion order; empty for a file.
    pub fn list_children(&self, id: NodeId) -> Children<'_> {
        self.children_filtered(id, ChildFilter::All)
    }

    fn children_filtered(&self, id: NodeId, filter: ChildFilter) -> Children<'_> {
        Children {
            vfs: self,
            ids: self.node(id).children().map(|c| c.values()),
            filter,
        }
    }

    /// Canonical path of `id`: the root's name followed by `/name` for
    /// each step down. The root renders as its bare name.
    pub fn absolute_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        names.join("/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildFilter {
    Directories,
    Files,
    All,
}

/// Lazy, restartable (via `Clone`) sequence of child nodes.
#[derive(Clone)]
pub struct Children<'a> {
    vfs: &'a Vfs,
    ids: Option<Values<'a, String, NodeId>>,
    filter: ChildFilter,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let ids = self.ids.as_mut()?;
        for &id in ids.by_ref() {
            let node = self.vfs.node(id);
            let keep = match self.filter {
                ChildFilter::Directories => node.is_directory(),
                ChildFilter::Files => node.is_file(),
                ChildFilter::All => true,
            };
            if keep {
                return Some(NodeRef { vfs: self.vfs, id });
            }
        }
        None
    }
}

/// Borrowed view of one node together with the tree it lives in.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    vfs: &'a Vfs,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.vfs.node(self.id)
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.node().kind
    }

    pub fn is_directory(&self) -> bool {
        self.node().is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.node().is_file()
    }

    pub fn content(&self) -> Option<&'a str> {
        self.node().content()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.vfs.parent_of(self.id).map(|id| NodeRef { vfs: self.vfs, id })
    }

    pub fn absolute_path(&self) -> String {
        self.vfs.absolute_path(self.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.vfs, other.vfs) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("path", &self.absolute_path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vfs, NodeId, NodeId, NodeId) {
        let mut vfs = Vfs::new(Node::new_directory("root").unwrap()).unwrap();
        let root = vfs.root();
        let etc = vfs.attach_child(root, Node::new_directory("etc").unwrap()).unwrap();
        let motd = vfs.attach_child(etc, Node::new_file("motd", "hello").unwrap()).unwrap();
        let home = vfs.attach_child(root, Node::new_directory("home").unwrap()).unwrap();
        vfs.attach_child(root, Node::new_file("readme.txt", "hi").unwrap()).unwrap();
        (vfs, etc, motd, home)
    }

    #[test]
    fn test_root_must_be_directory() {
        let err = Vfs::new(Node::new_file("root", "").unwrap()).unwrap_err();
        assert_eq!(err, VfsError::NotADirectory { name: "root".to_string() });
    }

    #[test]
    fn test_attach_sets_parent() {
        let (vfs, etc, motd, _) = sample();
        assert_eq!(vfs.parent_of(motd), Some(etc));
        assert_eq!(vfs.parent_of(etc), Some(vfs.root()));
        assert_eq!(vfs.parent_of(vfs.root()), None);
        assert_eq!(vfs.child(etc, "motd"), Some(motd));
        assert_eq!(vfs.len(), 5);
    }

    #[test]
    fn test_attach_to_file_fails() {
        let (mut vfs, _, motd, _) = sample();
        let before = vfs.len();
        let err = vfs.attach_child(motd, Node::new_file("x", "").unwrap()).unwrap_err();
        assert_eq!(err, VfsError::NotADirectory { name: "motd".to_string() });
        assert_eq!(vfs.len(), before);
    }

    #[test]
    fn test_attach_duplicate_fails() {
        let (mut vfs, etc, _, _) = sample();
        let err = vfs.attach_child(etc, Node::new_directory("motd").unwrap()).unwrap_err();
        assert_eq!(
            err,
            VfsError::DuplicateName { parent: "etc".to_string(), name: "motd".to_string() }
        );
        assert_eq!(vfs.list_children(etc).count(), 1);
    }

    #[test]
    fn test_listing_by_kind_in_insertion_order() {
        let (vfs, _, motd, _) = sample();
        let root = vfs.root();
        let dirs: Vec<&str> = vfs.list_directories(root).map(|n| n.name()).collect();
        let files: Vec<&str> = vfs.list_files(root).map(|n| n.name()).collect();
        assert_eq!(dirs, vec!["etc", "home"]);
        assert_eq!(files, vec!["readme.txt"]);

        assert_eq!(vfs.list_directories(motd).count(), 0);
        assert_eq!(vfs.list_files(motd).count(), 0);
    }

    #[test]
    fn test_listing_is_restartable() {
        let (vfs, _, _, _) = sample();
        let listing = vfs.list_directories(vfs.root());
        let first: Vec<NodeId> = listing.clone().map(|n| n.id()).collect();
        let second: Vec<NodeId> = listing.map(|n| n.id()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absolute_path() {
        let (vfs, etc, motd, _) = sample();
        assert_eq!(vfs.absolute_path(vfs.root()), "root");
        assert_eq!(vfs.absolute_path(etc), "root/etc");
        assert_eq!(vfs.node_ref(motd).absolute_path(), "root/etc/motd");
    }

    #[test]
    fn test_node_ref_navigation() {
        let (vfs, etc, motd, _) = sample();
        let file = vfs.node_ref(motd);
        assert_eq!(file.content(), Some("hello"));
        assert_eq!(file.parent().map(|p| p.id()), Some(etc));
        assert_eq!(vfs.root_ref().parent(), None);
        assert_eq!(file, vfs.node_ref(motd));
    }
}
