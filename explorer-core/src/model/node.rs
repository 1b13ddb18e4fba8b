//! ``src/model/node.rs``
//! ============================================================================
//! # `TreeNode`: File and Folder Entities
//!
//! A node is either a `File` (carrying a language tag derived from its
//! extension) or a `Folder` (carrying an open flag and an ordered list of
//! children). Children are held as `Arc<TreeNode>` so that copy-on-write
//! updates can share every subtree they do not touch.

use std::{borrow::Borrow, fmt, sync::Arc};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Language assigned to files whose name has no extension.
pub const DEFAULT_LANGUAGE: &str = "text";

fn default_language() -> CompactString {
    CompactString::const_new(DEFAULT_LANGUAGE)
}

/// Opaque node identifier, unique across a whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(CompactString);

impl NodeId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(CompactString::new(id))
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(CompactString::from(id))
    }
}

impl From<CompactString> for NodeId {
    fn from(id: CompactString) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Variant discriminant of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    /// Capitalized label used in modal titles ("Rename File").
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Folder => "Folder",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// Extension after the final `.` of `name`, if the name has one.
///
/// `"archive.tar.gz"` yields `"gz"`; `"notes."` yields the empty string.
#[inline]
pub fn language_from_name(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: NodeId,
    pub name: CompactString,
    #[serde(default = "default_language")]
    pub language: CompactString,
}

impl FileNode {
    /// Create a file whose language comes from its extension, or `fallback`.
    pub fn with_fallback_language(
        id: NodeId,
        name: impl Into<CompactString>,
        fallback: &str,
    ) -> Self {
        let name = name.into();
        let language = CompactString::new(language_from_name(&name).unwrap_or(fallback));
        Self { id, name, language }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: NodeId,
    pub name: CompactString,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub children: Vec<Arc<TreeNode>>,
}

/// A file or folder in the explorer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    File(FileNode),
    Folder(FolderNode),
}

impl TreeNode {
    /// New file, language derived from the name or [`DEFAULT_LANGUAGE`].
    pub fn file(id: impl Into<NodeId>, name: impl Into<CompactString>) -> Self {
        Self::File(FileNode::with_fallback_language(
            id.into(),
            name,
            DEFAULT_LANGUAGE,
        ))
    }

    /// New closed, empty folder.
    pub fn folder(id: impl Into<NodeId>, name: impl Into<CompactString>) -> Self {
        Self::Folder(FolderNode {
            id: id.into(),
            name: name.into(),
            is_open: false,
            children: Vec::new(),
        })
    }

    /// Folder with explicit open state and children, used to build seeds.
    pub fn folder_with(
        id: impl Into<NodeId>,
        name: impl Into<CompactString>,
        is_open: bool,
        children: impl IntoIterator<Item = TreeNode>,
    ) -> Self {
        Self::Folder(FolderNode {
            id: id.into(),
            name: name.into(),
            is_open,
            children: children.into_iter().map(Arc::new).collect(),
        })
    }

    #[inline]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::File(file) => &file.id,
            Self::Folder(folder) => &folder.id,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    #[inline]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    #[inline]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    #[inline]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Open state for folders; files carry none.
    pub const fn is_open(&self) -> Option<bool> {
        match self {
            Self::File(_) => None,
            Self::Folder(folder) => Some(folder.is_open),
        }
    }

    /// Children of a folder; always empty for files.
    pub fn children(&self) -> &[Arc<TreeNode>] {
        match self {
            Self::File(_) => &[],
            Self::Folder(folder) => &folder.children,
        }
    }

    pub const fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    pub const fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Self::File(_) => None,
            Self::Folder(folder) => Some(folder),
        }
    }
}
