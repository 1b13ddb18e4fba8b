//! UI-facing interaction state: selection, context menu and pending modal.
//!
//! Nothing here touches the tree. [`crate::model::explorer_state`] combines
//! this state with the tree and the mutation engine.

use compact_str::CompactString;
use smallvec::{SmallVec, smallvec};

use crate::model::node::{NodeId, NodeKind, TreeNode};

/// Redraw flags so a renderer can repaint only what changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Tree = 1,
    Selection = 2,
    ContextMenu = 4,
    Modal = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Entries a context menu can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOption {
    Open,
    NewFile,
    NewFolder,
    Rename,
    Delete,
}

impl MenuOption {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::NewFile => "New File",
            Self::NewFolder => "New Folder",
            Self::Rename => "Rename",
            Self::Delete => "Delete",
        }
    }

    /// Modal opened by this option; `Open` acts immediately instead.
    pub const fn modal_kind(self) -> Option<ModalKind> {
        match self {
            Self::Open => None,
            Self::NewFile => Some(ModalKind::CreateFile),
            Self::NewFolder => Some(ModalKind::CreateFolder),
            Self::Rename => Some(ModalKind::Rename),
            Self::Delete => Some(ModalKind::Delete),
        }
    }
}

pub type MenuOptions = SmallVec<[MenuOption; 4]>;

/// Options offered for a node of the given kind, in display order.
pub fn menu_options(kind: NodeKind) -> MenuOptions {
    match kind {
        NodeKind::Folder => smallvec![
            MenuOption::NewFile,
            MenuOption::NewFolder,
            MenuOption::Rename,
            MenuOption::Delete,
        ],
        NodeKind::File => smallvec![MenuOption::Open, MenuOption::Rename, MenuOption::Delete],
    }
}

/// Context menu anchored at pointer coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
    pub target: Option<NodeId>,
    pub options: MenuOptions,
}

impl ContextMenu {
    pub fn offers(&self, option: MenuOption) -> bool {
        self.options.contains(&option)
    }
}

/// Kind of operation a modal is collecting confirmation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    CreateFile,
    CreateFolder,
    Rename,
    Delete,
}

impl ModalKind {
    /// Whether the modal shows a text field for the draft.
    pub const fn accepts_input(self) -> bool {
        !matches!(self, Self::Delete)
    }

    pub fn title(self, target: NodeKind) -> CompactString {
        match self {
            Self::CreateFile => CompactString::const_new("New File"),
            Self::CreateFolder => CompactString::const_new("New Folder"),
            Self::Rename => compact_str::format_compact!("Rename {}", target.label()),
            Self::Delete => compact_str::format_compact!("Delete {}", target.label()),
        }
    }
}

/// A pending operation waiting for the user to confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub target: NodeId,
    pub title: CompactString,
    pub draft: CompactString,
}

impl Modal {
    /// Build the modal for `kind` on `target`; rename drafts start from the
    /// current name, all others start empty.
    pub fn new(kind: ModalKind, target: &TreeNode) -> Self {
        let draft = match kind {
            ModalKind::Rename => CompactString::new(target.name()),
            _ => CompactString::const_new(""),
        };

        Self {
            kind,
            target: target.id().clone(),
            title: kind.title(target.kind()),
            draft,
        }
    }

    /// Confirm button state: text modals need a non-blank draft.
    pub fn can_confirm(&self) -> bool {
        !self.kind.accepts_input() || !self.draft.trim().is_empty()
    }

    pub fn push_char(&mut self, ch: char) {
        self.draft.push(ch);
    }

    pub fn backspace(&mut self) -> bool {
        self.draft.pop().is_some()
    }
}

/// Selection, context menu and modal state of the explorer panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIState {
    redraw_flags: u8,

    /// Currently selected file, resolved against the tree on read.
    pub selected: Option<NodeId>,

    pub context_menu: ContextMenu,

    pub modal: Option<Modal>,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            redraw_flags: RedrawFlag::All.bits(),
            selected: None,
            context_menu: ContextMenu::default(),
            modal: None,
        }
    }

    #[inline]
    pub fn request_redraw(&mut self, flag: RedrawFlag) {
        self.redraw_flags |= flag.bits();
    }

    #[inline]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw_flags != 0
    }

    #[inline]
    pub const fn needs(&self, flag: RedrawFlag) -> bool {
        self.redraw_flags & flag.bits() != 0
    }

    /// Return pending flags and clear them.
    #[inline]
    pub fn take_redraw(&mut self) -> u8 {
        std::mem::take(&mut self.redraw_flags)
    }

    // Selection management
    pub fn select(&mut self, id: NodeId) {
        if self.selected.as_ref() != Some(&id) {
            self.selected = Some(id);
            self.request_redraw(RedrawFlag::Selection);
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.request_redraw(RedrawFlag::Selection);
        }
    }

    // Context menu
    pub fn show_context_menu(&mut self, target: &TreeNode, x: i32, y: i32) {
        self.context_menu = ContextMenu {
            visible: true,
            x,
            y,
            target: Some(target.id().clone()),
            options: menu_options(target.kind()),
        };
        self.request_redraw(RedrawFlag::ContextMenu);
    }

    pub fn hide_context_menu(&mut self) {
        if self.context_menu.visible {
            self.context_menu = ContextMenu::default();
            self.request_redraw(RedrawFlag::ContextMenu);
        }
    }

    // Modal management
    pub fn open_modal(&mut self, kind: ModalKind, target: &TreeNode) {
        self.modal = Some(Modal::new(kind, target));
        self.request_redraw(RedrawFlag::Modal);
    }

    /// Drop the pending modal and its draft.
    pub fn close_modal(&mut self) -> Option<Modal> {
        let closed = self.modal.take();
        if closed.is_some() {
            self.request_redraw(RedrawFlag::Modal);
        }
        closed
    }

    pub fn draft(&self) -> Option<&str> {
        self.modal.as_ref().map(|modal| modal.draft.as_str())
    }

    /// Replace the draft text. Returns false when no modal is open.
    pub fn set_draft(&mut self, text: impl Into<CompactString>) -> bool {
        match self.modal.as_mut() {
            Some(modal) => {
                modal.draft = text.into();
                self.request_redraw(RedrawFlag::Modal);
                true
            }
            None => false,
        }
    }

    pub fn modal_accepts_input(&self) -> bool {
        self.modal
            .as_ref()
            .is_some_and(|modal| modal.kind.accepts_input())
    }

    pub fn modal_title(&self) -> Option<&str> {
        self.modal.as_ref().map(|modal| modal.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_menu_options_by_kind() {
        let folder: Vec<&str> = menu_options(NodeKind::Folder)
            .iter()
            .map(|o| o.label())
            .collect();
        assert_eq!(folder, vec!["New File", "New Folder", "Rename", "Delete"]);

        let file: Vec<&str> = menu_options(NodeKind::File)
            .iter()
            .map(|o| o.label())
            .collect();
        assert_eq!(file, vec!["Open", "Rename", "Delete"]);
    }

    #[test]
    fn test_modal_titles_and_drafts() {
        let file = TreeNode::file("1", "App.js");
        let folder = TreeNode::folder("2", "src");

        let rename = Modal::new(ModalKind::Rename, &file);
        assert_eq!(rename.title, "Rename File");
        assert_eq!(rename.draft, "App.js");

        let delete = Modal::new(ModalKind::Delete, &folder);
        assert_eq!(delete.title, "Delete Folder");
        assert!(delete.can_confirm());

        let create = Modal::new(ModalKind::CreateFile, &folder);
        assert_eq!(create.title, "New File");
        assert_eq!(create.draft, "");
        assert!(!create.can_confirm());
    }

    #[test]
    fn test_draft_editing() {
        let mut ui = UIState::new();
        assert!(!ui.set_draft("orphan"));
        assert_eq!(ui.draft(), None);

        ui.open_modal(ModalKind::CreateFolder, &TreeNode::folder("1", "src"));
        assert!(ui.modal_accepts_input());
        assert!(ui.set_draft("  "));
        assert!(!ui.modal.as_ref().unwrap().can_confirm());

        let modal = ui.modal.as_mut().unwrap();
        modal.push_char('x');
        assert_eq!(modal.draft, "  x");
        assert!(modal.backspace());
        assert!(modal.backspace());

        assert_eq!(ui.modal_title(), Some("New Folder"));
        assert!(ui.close_modal().is_some());
        assert!(ui.close_modal().is_none());
    }

    #[test]
    fn test_context_menu_show_hide() {
        let mut ui = UIState::new();
        ui.take_redraw();

        ui.show_context_menu(&TreeNode::file("7", "a.rs"), 10, 20);
        assert!(ui.needs(RedrawFlag::ContextMenu));
        assert!(ui.context_menu.visible);
        assert_eq!((ui.context_menu.x, ui.context_menu.y), (10, 20));
        assert!(ui.context_menu.offers(MenuOption::Open));
        assert!(!ui.context_menu.offers(MenuOption::NewFile));

        ui.hide_context_menu();
        assert_eq!(ui.context_menu, ContextMenu::default());
    }

    #[test]
    fn test_redraw_flags() {
        let mut ui = UIState::new();
        assert_eq!(ui.take_redraw(), RedrawFlag::All.bits());
        assert!(!ui.needs_redraw());

        ui.select(NodeId::from("1"));
        assert!(ui.needs(RedrawFlag::Selection));
        ui.take_redraw();

        ui.select(NodeId::from("1"));
        assert!(!ui.needs_redraw());

        ui.clear_selection();
        assert!(ui.needs(RedrawFlag::Selection));
        assert_eq!(ui.selected, None);
    }
}
