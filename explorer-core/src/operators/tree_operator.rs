//! ``src/operators/tree_operator.rs``
//! ============================================================================
//! # Tree Operator: Copy-on-Write Mutations
//!
//! Four pure operations over a [`Tree`] snapshot: toggle, insert, rename and
//! remove. Each one walks the tree depth-first by id, rebuilds only the nodes
//! on the path from the root to the target, and passes every other subtree
//! through as the same `Arc`. When the target is missing or the operation
//! does not apply, the input tree is returned as is.
//!
//! ## Example
//! ```rust
//! use explorer_core::model::{Tree, TreeNode};
//! use explorer_core::operators::tree_operator::{insert_child, toggle_open};
//!
//! let tree = Tree::new([TreeNode::folder("src", "src")]);
//! let tree = insert_child(&tree, "src", TreeNode::file("a", "a.js"));
//! assert_eq!(tree.find("src").unwrap().is_open(), Some(true));
//!
//! let tree = toggle_open(&tree, "src");
//! assert_eq!(tree.find("src").unwrap().is_open(), Some(false));
//! ```

use std::sync::Arc;

use compact_str::CompactString;
use tracing::{debug, warn};

use crate::model::{
    node::{FileNode, FolderNode, TreeNode, language_from_name},
    tree::Tree,
};

/// Rebuilt sibling list, or `None` when nothing below this level changed.
type Rebuilt = Option<Vec<Arc<TreeNode>>>;

/// Flip `is_open` on the folder with `id`. Files and unknown ids are a no-op.
pub fn toggle_open(tree: &Tree, id: impl AsRef<str>) -> Tree {
    let id = id.as_ref();

    let rebuilt = update_node(tree.roots(), id, &mut |target: &TreeNode| match target {
        TreeNode::Folder(folder) => Some(TreeNode::Folder(FolderNode {
            is_open: !folder.is_open,
            ..folder.clone()
        })),
        TreeNode::File(_) => None,
    });

    finish(tree, rebuilt, "toggle_open", id)
}

/// Append `node` as the last child of the folder `parent_id` and open that
/// folder. No-op when the parent is missing or is a file, or when any id in
/// `node`'s subtree is already present in `tree`.
pub fn insert_child(tree: &Tree, parent_id: impl AsRef<str>, node: TreeNode) -> Tree {
    let parent_id = parent_id.as_ref();

    let incoming = Tree::new([node]);
    if let Some(clash) = incoming.ids().find(|id| tree.contains(id)) {
        warn!(
            operation_type = "insert_child",
            parent_id,
            id = %clash,
            "Refusing to insert a node whose id already exists"
        );
        return tree.clone();
    }

    let mut pending = incoming.roots().first().cloned();
    let rebuilt = update_node(tree.roots(), parent_id, &mut |target: &TreeNode| match target {
        TreeNode::Folder(folder) => {
            let child = pending.take()?;
            let mut children = folder.children.clone();
            children.push(child);

            Some(TreeNode::Folder(FolderNode {
                id: folder.id.clone(),
                name: folder.name.clone(),
                is_open: true,
                children,
            }))
        }
        TreeNode::File(_) => None,
    });

    finish(tree, rebuilt, "insert_child", parent_id)
}

/// Rename the node with `id` to the trimmed `new_name`.
///
/// Files whose new name contains a `.` take the text after the final `.` as
/// their language; otherwise the language is kept. No-op when the trimmed
/// name is empty or equal to the current one.
pub fn rename(tree: &Tree, id: impl AsRef<str>, new_name: &str) -> Tree {
    let id = id.as_ref();
    let name = new_name.trim();

    if name.is_empty() {
        debug!(operation_type = "rename", id, "Ignoring blank name");
        return tree.clone();
    }

    let rebuilt = update_node(tree.roots(), id, &mut |target: &TreeNode| {
        if target.name() == name {
            return None;
        }

        Some(match target {
            TreeNode::File(file) => TreeNode::File(FileNode {
                id: file.id.clone(),
                name: CompactString::new(name),
                language: language_from_name(name)
                    .map_or_else(|| file.language.clone(), CompactString::new),
            }),
            TreeNode::Folder(folder) => TreeNode::Folder(FolderNode {
                name: CompactString::new(name),
                ..folder.clone()
            }),
        })
    });

    finish(tree, rebuilt, "rename", id)
}

/// Remove the node with `id` and its whole subtree, at any depth.
pub fn remove(tree: &Tree, id: impl AsRef<str>) -> Tree {
    let id = id.as_ref();
    let rebuilt = remove_node(tree.roots(), id);

    finish(tree, rebuilt, "remove", id)
}

fn finish(tree: &Tree, rebuilt: Rebuilt, operation: &'static str, id: &str) -> Tree {
    match rebuilt {
        Some(roots) => {
            debug!(operation_type = operation, id, changed = true, "Tree mutated");
            Tree::from_shared(roots)
        }
        None => {
            debug!(operation_type = operation, id, changed = false, "Tree unchanged");
            tree.clone()
        }
    }
}

/// Shallow copy of `folder` with a new child list.
fn with_children(folder: &FolderNode, children: Vec<Arc<TreeNode>>) -> TreeNode {
    TreeNode::Folder(FolderNode {
        id: folder.id.clone(),
        name: folder.name.clone(),
        is_open: folder.is_open,
        children,
    })
}

/// Replace the node with `id` by whatever `update` returns for it.
///
/// `update` returning `None` means the operation does not apply to that node.
fn update_node<F>(nodes: &[Arc<TreeNode>], id: &str, update: &mut F) -> Rebuilt
where
    F: FnMut(&TreeNode) -> Option<TreeNode>,
{
    for (index, node) in nodes.iter().enumerate() {
        let replacement = if node.id().as_str() == id {
            // ids are unique, so a refused update ends the search
            update(node.as_ref())?
        } else if let TreeNode::Folder(folder) = node.as_ref() {
            match update_node(&folder.children, id, update) {
                Some(children) => with_children(folder, children),
                None => continue,
            }
        } else {
            continue;
        };

        let mut rebuilt = nodes.to_vec();
        rebuilt[index] = Arc::new(replacement);
        return Some(rebuilt);
    }

    None
}

fn remove_node(nodes: &[Arc<TreeNode>], id: &str) -> Rebuilt {
    if let Some(index) = nodes.iter().position(|node| node.id().as_str() == id) {
        let mut rebuilt = nodes.to_vec();
        rebuilt.remove(index);
        return Some(rebuilt);
    }

    nodes.iter().enumerate().find_map(|(index, node)| {
        let TreeNode::Folder(folder) = node.as_ref() else {
            return None;
        };

        let children = remove_node(&folder.children, id)?;
        let mut rebuilt = nodes.to_vec();
        rebuilt[index] = Arc::new(with_children(folder, children));
        Some(rebuilt)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeId;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        Tree::new([
            TreeNode::folder_with(
                "src",
                "src",
                false,
                [
                    TreeNode::folder_with(
                        "lib",
                        "lib",
                        false,
                        [TreeNode::folder_with(
                            "deep",
                            "deep",
                            false,
                            [TreeNode::file("leaf", "leaf.rs")],
                        )],
                    ),
                    TreeNode::file("main", "main.rs"),
                ],
            ),
            TreeNode::folder("docs", "docs"),
            TreeNode::file("readme", "README.md"),
        ])
    }

    fn language_of(tree: &Tree, id: &str) -> String {
        tree.find(id)
            .and_then(|node| node.as_file().map(|file| file.language.to_string()))
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let tree = Tree::new([TreeNode::folder_with("src-id", "src", true, [])]);

        let tree = insert_child(&tree, "src-id", TreeNode::file("a.js-id", "a.js"));
        assert_eq!(tree.roots().len(), 1);
        let src = tree.find("src-id").unwrap();
        assert_eq!(src.is_open(), Some(true));
        assert_eq!(src.children().len(), 1);
        assert_eq!(src.children()[0].name(), "a.js");
        assert_eq!(language_of(&tree, "a.js-id"), "js");

        let tree = rename(&tree, "a.js-id", "b.txt");
        assert_eq!(tree.find("a.js-id").unwrap().name(), "b.txt");
        assert_eq!(language_of(&tree, "a.js-id"), "txt");

        let tree = remove(&tree, "src-id");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_toggle_closed_nested_folder() {
        let tree = sample();
        let toggled = toggle_open(&tree, "deep");

        assert_eq!(toggled.find("deep").unwrap().is_open(), Some(true));
        assert_eq!(toggled.find("lib").unwrap().is_open(), Some(false));
        assert_eq!(toggle_open(&toggled, "deep"), tree);
    }

    #[test]
    fn test_toggle_file_is_noop() {
        let tree = sample();
        let same = toggle_open(&tree, "main");
        assert_eq!(same, tree);
        assert!(Arc::ptr_eq(&same.roots()[0], &tree.roots()[0]));
    }

    #[test]
    fn test_untouched_siblings_are_shared() {
        let tree = sample();
        let toggled = toggle_open(&tree, "deep");

        assert!(!Arc::ptr_eq(&toggled.roots()[0], &tree.roots()[0]));
        assert!(Arc::ptr_eq(&toggled.roots()[1], &tree.roots()[1]));
        assert!(Arc::ptr_eq(&toggled.roots()[2], &tree.roots()[2]));

        let old_main = &tree.roots()[0].children()[1];
        let new_main = &toggled.roots()[0].children()[1];
        assert!(Arc::ptr_eq(old_main, new_main));
    }

    #[test]
    fn test_insert_appends_and_opens() {
        let tree = sample();
        let inserted = insert_child(&tree, "src", TreeNode::folder("new", "new"));

        let src = inserted.find("src").unwrap();
        assert_eq!(src.is_open(), Some(true));
        let children: Vec<&str> = src.children().iter().map(|c| c.name()).collect();
        assert_eq!(children, vec!["lib", "main.rs", "new"]);
        assert_eq!(inserted.len(), tree.len() + 1);
    }

    #[test]
    fn test_insert_under_already_open_folder_stays_open() {
        let tree = toggle_open(&sample(), "docs");
        let inserted = insert_child(&tree, "docs", TreeNode::file("n", "notes.md"));
        assert_eq!(inserted.find("docs").unwrap().is_open(), Some(true));
    }

    #[test]
    fn test_insert_under_file_or_missing_is_noop() {
        let tree = sample();
        assert_eq!(insert_child(&tree, "main", TreeNode::file("x", "x.rs")), tree);
        assert_eq!(insert_child(&tree, "nowhere", TreeNode::file("x", "x.rs")), tree);
    }

    #[test]
    fn test_insert_with_existing_id_is_noop() {
        let tree = sample();
        assert_eq!(insert_child(&tree, "docs", TreeNode::file("leaf", "dup.rs")), tree);

        let nested_clash = TreeNode::folder_with("fresh", "fresh", false, [TreeNode::file("main", "m")]);
        assert_eq!(insert_child(&tree, "docs", nested_clash), tree);
    }

    #[test]
    fn test_rename_rules() {
        let tree = sample();

        assert_eq!(rename(&tree, "main", "   "), tree);
        assert_eq!(rename(&tree, "main", "main.rs"), tree);
        assert_eq!(rename(&tree, "main", "  main.rs  "), tree);
        assert_eq!(rename(&tree, "missing", "x.rs"), tree);

        let py = rename(&tree, "main", "x.py");
        assert_eq!(language_of(&py, "main"), "py");

        let trimmed = rename(&tree, "main", "  lib.go ");
        assert_eq!(trimmed.find("main").unwrap().name(), "lib.go");
        assert_eq!(language_of(&trimmed, "main"), "go");
    }

    #[test]
    fn test_rename_without_extension_keeps_language() {
        let tree = sample();
        let renamed = rename(&tree, "readme", "README");
        assert_eq!(renamed.find("readme").unwrap().name(), "README");
        assert_eq!(language_of(&renamed, "readme"), "md");
    }

    #[test]
    fn test_rename_folder_keeps_children() {
        let tree = sample();
        let renamed = rename(&tree, "lib", "lib.v2");

        let lib = renamed.find("lib").unwrap();
        assert_eq!(lib.name(), "lib.v2");
        assert!(lib.is_folder());
        assert!(Arc::ptr_eq(
            &lib.children()[0],
            &tree.find("lib").unwrap().children()[0]
        ));
    }

    #[test]
    fn test_remove_deep_subtree() {
        let tree = sample();
        let removed = remove(&tree, "lib");

        for id in ["lib", "deep", "leaf"] {
            assert!(!removed.contains(id), "{id} should be gone");
        }
        assert!(removed.contains("main"));
        assert_eq!(removed.len(), tree.len() - 3);

        let leaf_gone = remove(&tree, "leaf");
        assert_eq!(leaf_gone.find("deep").unwrap().children().len(), 0);
    }

    #[test]
    fn test_remove_root_and_missing() {
        let tree = sample();
        let removed = remove(&tree, "readme");
        assert_eq!(removed.roots().len(), 2);
        assert!(Arc::ptr_eq(&removed.roots()[0], &tree.roots()[0]));

        assert_eq!(remove(&tree, "missing"), tree);
    }

    #[test]
    fn test_old_snapshot_survives() {
        let tree = sample();
        let _ = remove(&tree, "src");
        let _ = rename(&tree, "main", "other.c");

        assert!(tree.contains("leaf"));
        assert_eq!(tree.find("main").unwrap().name(), "main.rs");
        assert_eq!(tree.ids().count(), 7);
        assert!(tree.ids().any(|id| *id == NodeId::from("docs")));
    }

    mod properties {
        use super::*;
        use proptest::{prelude::*, sample::Index};

        #[derive(Debug, Clone)]
        enum Shape {
            File(String),
            Folder(bool, Vec<Shape>),
        }

        fn shape() -> impl Strategy<Value = Shape> {
            let leaf = prop_oneof![
                "[a-z]{1,6}(\\.[a-z]{1,3})?".prop_map(Shape::File),
                any::<bool>().prop_map(|open| Shape::Folder(open, Vec::new())),
            ];

            leaf.prop_recursive(4, 48, 5, |inner| {
                (any::<bool>(), prop::collection::vec(inner, 0..5))
                    .prop_map(|(open, children)| Shape::Folder(open, children))
            })
        }

        fn build(shape: Shape, next: &mut usize) -> TreeNode {
            *next += 1;
            let id = format!("n{next}");

            match shape {
                Shape::File(name) => TreeNode::file(id.as_str(), name),
                Shape::Folder(open, children) => {
                    let children: Vec<TreeNode> =
                        children.into_iter().map(|child| build(child, next)).collect();
                    TreeNode::folder_with(id.as_str(), format!("dir{next}"), open, children)
                }
            }
        }

        fn arb_tree() -> impl Strategy<Value = Tree> {
            prop::collection::vec(shape(), 0..5).prop_map(|shapes| {
                let mut next = 0;
                Tree::new(shapes.into_iter().map(|shape| build(shape, &mut next)))
            })
        }

        fn folder_ids(tree: &Tree) -> Vec<NodeId> {
            tree.iter()
                .filter(|node| node.is_folder())
                .map(|node| node.id().clone())
                .collect()
        }

        /// Own fields of a node, ignoring its children.
        fn own_fields(node: &TreeNode) -> (String, String, Option<bool>, Option<String>) {
            (
                node.id().to_string(),
                node.name().to_string(),
                node.is_open(),
                node.as_file().map(|file| file.language.to_string()),
            )
        }

        proptest! {
            #[test]
            fn toggle_flips_only_target(tree in arb_tree(), pick in any::<Index>()) {
                let folders = folder_ids(&tree);
                prop_assume!(!folders.is_empty());
                let target = pick.get(&folders);

                let toggled = toggle_open(&tree, target);
                let before: Vec<_> = tree.iter().map(|n| own_fields(n)).collect();
                let after: Vec<_> = toggled.iter().map(|n| own_fields(n)).collect();
                prop_assert_eq!(before.len(), after.len());

                for (old, new) in before.iter().zip(&after) {
                    prop_assert_eq!(&old.0, &new.0);
                    if old.0 == target.as_str() {
                        prop_assert_eq!(old.2.map(|open| !open), new.2);
                    } else {
                        prop_assert_eq!(old, new);
                    }
                }

                prop_assert_eq!(toggle_open(&toggled, target), tree);
            }

            #[test]
            fn missing_id_is_noop_everywhere(tree in arb_tree()) {
                let missing = "not-in-tree";
                prop_assert_eq!(&toggle_open(&tree, missing), &tree);
                prop_assert_eq!(&insert_child(&tree, missing, TreeNode::file("fresh", "f.rs")), &tree);
                prop_assert_eq!(&rename(&tree, missing, "other.txt"), &tree);
                prop_assert_eq!(&remove(&tree, missing), &tree);
            }

            #[test]
            fn insert_appends_last_and_opens(tree in arb_tree(), pick in any::<Index>()) {
                let folders = folder_ids(&tree);
                prop_assume!(!folders.is_empty());
                let parent = pick.get(&folders);

                let inserted = insert_child(&tree, parent, TreeNode::file("fresh", "fresh.rs"));
                let folder = inserted.find(parent).unwrap();
                prop_assert_eq!(folder.is_open(), Some(true));
                prop_assert_eq!(folder.children().last().map(|c| c.id().as_str()), Some("fresh"));
                prop_assert_eq!(inserted.len(), tree.len() + 1);

                for node in tree.iter().filter(|n| n.id() != parent) {
                    let after = inserted.find(node.id()).unwrap();
                    prop_assert_eq!(own_fields(node), own_fields(after));
                }
            }

            #[test]
            fn remove_is_total(tree in arb_tree(), pick in any::<Index>()) {
                prop_assume!(!tree.is_empty());
                let ids: Vec<NodeId> = tree.ids().cloned().collect();
                let target = pick.get(&ids);

                let subtree: Vec<NodeId> = Tree::from_shared(vec![tree.find(target).unwrap().clone()])
                    .ids()
                    .cloned()
                    .collect();
                let removed = remove(&tree, target);

                for id in &subtree {
                    prop_assert!(!removed.contains(id));
                }
                let survivors: Vec<&NodeId> = ids.iter().filter(|id| !subtree.contains(id)).collect();
                let remaining: Vec<&NodeId> = removed.ids().collect();
                prop_assert_eq!(survivors, remaining);
            }
        }
    }
}
