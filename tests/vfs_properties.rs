use proptest::prelude::*;
use proptest::sample::Index;
use vfs_shell::{load, LoadError, Node, NodeId, PathError, Vfs, VfsError};

/// Grow a tree by attaching each generated node under one of the
/// directories created so far. Duplicate names are skipped.
fn build(spec: &[(Index, String, bool)]) -> Vfs {
    let mut vfs = Vfs::new(Node::new_directory("root").unwrap()).unwrap();
    let mut dirs = vec![vfs.root()];
    for (parent, name, is_dir) in spec {
        let parent = *parent.get(&dirs);
        let node = if *is_dir {
            Node::new_directory(name.as_str()).unwrap()
        } else {
            Node::new_file(name.as_str(), name.as_str()).unwrap()
        };
        match vfs.attach_child(parent, node) {
            Ok(id) if *is_dir => dirs.push(id),
            Ok(_) => {}
            Err(VfsError::DuplicateName { .. }) => {}
            Err(e) => panic!("unexpected attach error: {e}"),
        }
    }
    vfs
}

fn directories(vfs: &Vfs) -> Vec<NodeId> {
    let mut out = vec![vfs.root()];
    let mut i = 0;
    while i < out.len() {
        out.extend(vfs.list_directories(out[i]).map(|d| d.id()));
        i += 1;
    }
    out
}

fn tree_spec() -> impl Strategy<Value = Vec<(Index, String, bool)>> {
    prop::collection::vec((any::<Index>(), "[a-z]{1,3}", any::<bool>()), 0..40)
}

/// Like [`tree_spec`], but names often collide with the root's name.
fn rooty_tree_spec() -> impl Strategy<Value = Vec<(Index, String, bool)>> {
    let name = prop_oneof![Just("root".to_string()), "[a-z]{1,3}"];
    prop::collection::vec((any::<Index>(), name, any::<bool>()), 0..40)
}

proptest! {
    #[test]
    fn slash_always_resolves_to_root(spec in tree_spec()) {
        let vfs = build(&spec);
        for dir in directories(&vfs) {
            prop_assert_eq!(vfs.resolve("/", dir).unwrap().id(), vfs.root());
            prop_assert_eq!(vfs.resolve("root", dir).unwrap().id(), vfs.root());
        }
    }

    #[test]
    fn dotdot_at_root_is_absorbed(spec in tree_spec(), depth in 1usize..5) {
        let vfs = build(&spec);
        let path = vec![".."; depth].join("/");
        prop_assert_eq!(vfs.resolve(&path, vfs.root()).unwrap().id(), vfs.root());
    }

    #[test]
    fn dot_paths_stay_put(spec in tree_spec(), depth in 1usize..5) {
        let vfs = build(&spec);
        let path = vec!["."; depth].join("/");
        for dir in directories(&vfs) {
            prop_assert_eq!(vfs.resolve(&path, dir).unwrap().id(), dir);
        }
    }

    #[test]
    fn absolute_paths_are_anchor_independent(spec in tree_spec()) {
        let vfs = build(&spec);
        let dirs = directories(&vfs);
        for &target in &dirs {
            let path = vfs.absolute_path(target);
            let slash_path = path.strip_prefix("root").unwrap_or("/").to_string();
            let slash_path = if slash_path.is_empty() { "/".to_string() } else { slash_path };
            for &anchor in &dirs {
                prop_assert_eq!(vfs.resolve(&path, anchor).unwrap().id(), target);
                prop_assert_eq!(vfs.resolve(&slash_path, anchor).unwrap().id(), target);
            }
        }
    }

    #[test]
    fn slash_paths_ignore_dirs_named_root(spec in rooty_tree_spec()) {
        let vfs = build(&spec);
        let dirs = directories(&vfs);
        for &target in &dirs {
            let path = vfs.absolute_path(target);
            let slash_path = match path.strip_prefix("root") {
                Some("") | None => "/".to_string(),
                Some(rest) => rest.to_string(),
            };
            for &anchor in &dirs {
                prop_assert_eq!(vfs.resolve(&slash_path, anchor).unwrap().id(), target);
            }
        }
    }

    #[test]
    fn two_segment_relative_paths_stay_local(spec in rooty_tree_spec()) {
        let vfs = build(&spec);
        for dir in directories(&vfs) {
            for child in vfs.list_directories(dir) {
                for grandchild in vfs.list_children(child.id()) {
                    let path = format!("{}/{}", child.name(), grandchild.name());
                    prop_assert_eq!(vfs.resolve(&path, dir).unwrap().id(), grandchild.id());
                }
            }
        }
    }

    #[test]
    fn parent_links_match_child_maps(spec in tree_spec()) {
        let vfs = build(&spec);
        for dir in directories(&vfs) {
            for child in vfs.list_children(dir) {
                prop_assert_eq!(vfs.parent_of(child.id()), Some(dir));
                prop_assert_eq!(vfs.resolve(child.name(), dir).unwrap().id(), child.id());
                prop_assert_eq!(vfs.resolve("..", child.id()).ok().map(|n| n.id()), Some(dir));
            }
        }
    }

    #[test]
    fn resolution_is_repeatable(spec in tree_spec(), path in "[a-z./]{0,12}") {
        let vfs = build(&spec);
        for dir in directories(&vfs) {
            let first = vfs.resolve(&path, dir).map(|n| n.id());
            let second = vfs.resolve(&path, dir).map(|n| n.id());
            prop_assert_eq!(first, second);
        }
    }
}

#[test]
fn declared_file_is_found_but_not_a_cd_target() {
    let vfs = load(r#"<vfs><dir name="root"><dir name="a"><file name="b">X</file></dir></dir></vfs>"#)
        .unwrap();
    let b = vfs.resolve("a/b", vfs.root()).unwrap();
    assert!(b.is_file());
    assert_eq!(b.name(), "b");
    assert_eq!(b.content(), Some("X"));
    assert_eq!(
        vfs.resolve_directory("a/b", vfs.root()).unwrap_err(),
        PathError::NotADirectory { path: "a/b".to_string() }
    );
}

#[test]
fn duplicate_children_abort_the_load() {
    let result = load(r#"<vfs><dir name="root"><dir name="x"/><dir name="x"/></dir></vfs>"#);
    assert!(matches!(result, Err(LoadError::DuplicateName { .. })));
}

#[test]
fn empty_container_is_malformed() {
    assert!(matches!(load("<vfs></vfs>"), Err(LoadError::MalformedVfs { .. })));
}

#[test]
fn listing_a_file_is_empty() {
    let vfs = load(r#"<vfs><dir name="root"><file name="f">x</file></dir></vfs>"#).unwrap();
    let f = vfs.resolve("f", vfs.root()).unwrap().id();
    assert_eq!(vfs.list_directories(f).count(), 0);
    assert_eq!(vfs.list_files(f).count(), 0);
}
