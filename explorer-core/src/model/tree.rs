//! ``src/model/tree.rs``
//! ============================================================================
//! # `Tree`: Root Sequence of the Explorer
//!
//! An ordered list of root-level nodes plus read-only queries over it. A
//! `Tree` is a cheap-to-clone snapshot: every node sits behind an `Arc`, and
//! the mutation engine in [`crate::operators::tree_operator`] produces new
//! snapshots that share all untouched subtrees with the old one.

use std::{collections::HashSet, path::Path, slice, sync::Arc};

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::AppError,
    model::node::{FileNode, NodeId, TreeNode},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Arc<TreeNode>>,
}

/// A row the explorer panel draws: the node and its nesting depth.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub depth: usize,
    pub node: &'a Arc<TreeNode>,
}

impl Tree {
    /// Build a tree from owned root nodes. Ids are not checked; use
    /// [`Tree::validate`] for untrusted input.
    pub fn new(roots: impl IntoIterator<Item = TreeNode>) -> Self {
        Self {
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    pub(crate) const fn from_shared(roots: Vec<Arc<TreeNode>>) -> Self {
        Self { roots }
    }

    #[inline]
    pub fn roots(&self) -> &[Arc<TreeNode>] {
        &self.roots
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// True when both snapshots share every root allocation, which is how
    /// the mutation engine reports "nothing changed".
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first pre-order walk over every node, closed folders included.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.roots.iter()],
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.iter().map(|node| node.id())
    }

    pub fn find(&self, id: impl AsRef<str>) -> Option<&Arc<TreeNode>> {
        let id = id.as_ref();
        self.iter().find(|node| node.id().as_str() == id)
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.find(id).is_some()
    }

    /// Rows in display order, descending into a folder only while it is open.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        collect_visible(&self.roots, 0, &mut rows);
        rows
    }

    /// Check global id uniqueness and non-empty names.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for node in self.iter() {
            if !seen.insert(node.id().as_str()) {
                return Err(AppError::DuplicateId(node.id().clone()));
            }

            if node.name().trim().is_empty() {
                return Err(AppError::invalid_input(
                    "name",
                    format_compact!("node {} has an empty name", node.id()),
                ));
            }
        }

        Ok(())
    }

    /// Parse a seed in the `{"type": "folder", ...}` JSON shape and validate it.
    ///
    /// Nesting depth is not limited, so any tree this crate serializes can be
    /// read back.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();

        let tree = Self::deserialize(&mut de)?;
        de.end()?;
        tree.validate()?;

        debug!(nodes = tree.len(), "Parsed seed tree");
        Ok(tree)
    }

    pub fn load_seed(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(e).with_context(format!("reading {}", path.display())))?;

        Self::from_json(&text)
    }

    /// Built-in startup structure of the explorer panel.
    pub fn seed() -> Self {
        fn file(id: &str, name: &str, language: &str) -> TreeNode {
            TreeNode::File(FileNode {
                id: NodeId::from(id),
                name: CompactString::new(name),
                language: CompactString::new(language),
            })
        }

        let components = TreeNode::folder_with(
            "2",
            "components",
            true,
            [
                TreeNode::folder_with(
                    "3",
                    "Sidebar",
                    true,
                    [
                        file("4", "Sidebar.js", "javascript"),
                        file("5", "Sidebar.css", "css"),
                    ],
                ),
                TreeNode::folder_with(
                    "6",
                    "MainContent",
                    true,
                    [
                        file("7", "MainContent.js", "javascript"),
                        file("8", "MainContent.css", "css"),
                    ],
                ),
                TreeNode::folder_with(
                    "9",
                    "BottomPanel",
                    true,
                    [
                        file("10", "BottomPanel.js", "javascript"),
                        file("11", "BottomPanel.css", "css"),
                    ],
                ),
            ],
        );

        Self::new([
            TreeNode::folder_with(
                "1",
                "src",
                true,
                [
                    components,
                    file("12", "App.js", "javascript"),
                    file("13", "App.css", "css"),
                    file("14", "index.js", "javascript"),
                    file("15", "index.css", "css"),
                ],
            ),
            TreeNode::folder_with(
                "16",
                "public",
                false,
                [
                    file("17", "index.html", "html"),
                    file("18", "favicon.ico", "image"),
                ],
            ),
            file("19", "package.json", "json"),
            file("20", "README.md", "markdown"),
        ])
    }
}

fn collect_visible<'a>(nodes: &'a [Arc<TreeNode>], depth: usize, rows: &mut Vec<VisibleRow<'a>>) {
    for node in nodes {
        rows.push(VisibleRow { depth, node });

        if let TreeNode::Folder(folder) = node.as_ref()
            && folder.is_open
        {
            collect_visible(&folder.children, depth + 1, rows);
        }
    }
}

/// Pre-order iterator returned by [`Tree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<slice::Iter<'a, Arc<TreeNode>>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Arc<TreeNode>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;

            match level.next() {
                Some(node) => {
                    let children = node.children();
                    if !children.is_empty() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Arc<TreeNode>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
