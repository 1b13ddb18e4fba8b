//! ``src/model/explorer_state.rs``
//! ============================================================================
//! # `ExplorerState`: Tree Ownership and Interaction Flow
//!
//! Owns the current [`Tree`] snapshot, the id generator and the [`UIState`].
//! Interactions (clicks, context-menu choices, modal confirmation) are
//! resolved here into calls to the mutation engine, and each resulting
//! snapshot replaces the previous one wholesale.

use compact_str::CompactString;
use tracing::{debug, info, instrument};

use crate::{
    config::ExplorerConfig,
    error::AppError,
    model::{
        id_gen::{IdGenerator, NanoIdGenerator},
        node::{DEFAULT_LANGUAGE, FileNode, TreeNode},
        tree::Tree,
        ui_state::{ContextMenu, MenuOption, Modal, ModalKind, RedrawFlag, UIState},
    },
    operators::tree_operator,
};

#[derive(Debug, Clone)]
pub struct ExplorerState<G = NanoIdGenerator> {
    tree: Tree,
    ids: G,
    default_language: CompactString,
    ui: UIState,
}

impl ExplorerState<NanoIdGenerator> {
    pub fn new(tree: Tree) -> Self {
        Self::with_generator(tree, NanoIdGenerator::default())
    }

    pub fn from_config(tree: Tree, config: &ExplorerConfig) -> Self {
        Self::with_generator(tree, NanoIdGenerator::new(config.id_length))
            .with_default_language(config.default_language.clone())
    }
}

impl<G: IdGenerator> ExplorerState<G> {
    pub fn with_generator(tree: Tree, ids: G) -> Self {
        Self {
            tree,
            ids,
            default_language: CompactString::const_new(DEFAULT_LANGUAGE),
            ui: UIState::new(),
        }
    }

    /// Language for created files whose name has no extension.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<CompactString>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Read-only snapshot for rendering.
    #[inline]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub const fn ui(&self) -> &UIState {
        &self.ui
    }

    #[inline]
    pub fn ui_mut(&mut self) -> &mut UIState {
        &mut self.ui
    }

    // ------------------------------------------------------------------
    // Tree operations
    // ------------------------------------------------------------------

    pub fn toggle_open(&mut self, id: impl AsRef<str>) -> bool {
        let next = tree_operator::toggle_open(&self.tree, id);
        self.replace_tree(next)
    }

    pub fn insert_child(&mut self, parent_id: impl AsRef<str>, node: TreeNode) -> bool {
        let next = tree_operator::insert_child(&self.tree, parent_id, node);
        self.replace_tree(next)
    }

    pub fn rename(&mut self, id: impl AsRef<str>, new_name: &str) -> bool {
        let next = tree_operator::rename(&self.tree, id, new_name);
        self.replace_tree(next)
    }

    pub fn remove(&mut self, id: impl AsRef<str>) -> bool {
        let next = tree_operator::remove(&self.tree, id);
        self.replace_tree(next)
    }

    /// Swap in a new snapshot; returns whether it differs from the old one.
    fn replace_tree(&mut self, next: Tree) -> bool {
        if next.ptr_eq(&self.tree) {
            return false;
        }

        self.tree = next;
        self.ui.request_redraw(RedrawFlag::Tree);
        self.drop_dangling_references();
        true
    }

    /// Forget selection, menu and modal targets that no longer exist.
    fn drop_dangling_references(&mut self) {
        if let Some(id) = &self.ui.selected
            && !self.tree.contains(id)
        {
            debug!(id = %id, "Selected file removed, clearing selection");
            self.ui.clear_selection();
        }

        if let Some(id) = &self.ui.context_menu.target
            && !self.tree.contains(id)
        {
            self.ui.hide_context_menu();
        }

        if let Some(modal) = &self.ui.modal
            && !self.tree.contains(&modal.target)
        {
            debug!(target_id = %modal.target, "Modal target removed, closing modal");
            self.ui.close_modal();
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a file for display. Folders and unknown ids are ignored.
    pub fn select_file(&mut self, id: impl AsRef<str>) -> bool {
        match self.tree.find(id) {
            Some(node) if node.is_file() => {
                let id = node.id().clone();
                self.ui.select(id);
                true
            }
            _ => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.ui.clear_selection();
    }

    pub fn selected_file(&self) -> Option<&FileNode> {
        let id = self.ui.selected.as_ref()?;
        self.tree.find(id)?.as_file()
    }

    /// Primary click: folders toggle open, files become selected.
    ///
    /// Returns whether the tree changed, which only a folder toggle does.
    pub fn activate(&mut self, id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        match self.tree.find(id).map(|node| node.is_folder()) {
            Some(true) => self.toggle_open(id),
            Some(false) => {
                self.select_file(id);
                false
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    pub fn open_context_menu(&mut self, id: impl AsRef<str>, x: i32, y: i32) -> bool {
        let Some(node) = self.tree.find(id) else {
            return false;
        };

        self.ui.show_context_menu(node, x, y);
        true
    }

    pub fn close_context_menu(&mut self) {
        self.ui.hide_context_menu();
    }

    pub const fn context_menu(&self) -> &ContextMenu {
        &self.ui.context_menu
    }

    /// Apply a context-menu choice. The menu is hidden first; options the
    /// menu does not offer for its target are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn choose_menu_option(&mut self, option: MenuOption) -> Result<(), AppError> {
        let menu = std::mem::take(&mut self.ui.context_menu);
        if menu.visible {
            self.ui.request_redraw(RedrawFlag::ContextMenu);
        }

        let offered = menu.offers(option);
        let Some(target) = menu.target.filter(|_| menu.visible) else {
            debug!("No context menu open");
            return Ok(());
        };

        if !offered {
            debug!(target_id = %target, "Option not offered for target");
            return Ok(());
        }

        match option.modal_kind() {
            Some(kind) => self.open_modal(kind, &target),
            None => {
                self.select_file(&target);
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Modal
    // ------------------------------------------------------------------

    /// Start a pending operation on `id`.
    ///
    /// Create operations need a folder target.
    pub fn open_modal(&mut self, kind: ModalKind, id: impl AsRef<str>) -> Result<(), AppError> {
        let id = id.as_ref();
        let node = self
            .tree
            .find(id)
            .ok_or_else(|| AppError::NotFound(id.into()))?;

        if matches!(kind, ModalKind::CreateFile | ModalKind::CreateFolder) && !node.is_folder() {
            return Err(AppError::invalid_input(
                "target",
                "new entries can only be created inside a folder",
            ));
        }

        debug!(?kind, target_id = id, "Opening modal");
        self.ui.open_modal(kind, node);
        Ok(())
    }

    pub const fn modal(&self) -> Option<&Modal> {
        self.ui.modal.as_ref()
    }

    pub fn draft(&self) -> Option<&str> {
        self.ui.draft()
    }

    pub fn set_draft(&mut self, text: impl Into<CompactString>) -> bool {
        self.ui.set_draft(text)
    }

    /// Discard the pending operation without touching the tree.
    pub fn cancel_modal(&mut self) {
        if let Some(modal) = self.ui.close_modal() {
            debug!(kind = ?modal.kind, target_id = %modal.target, "Modal cancelled");
        }
    }

    /// Confirm the pending operation.
    ///
    /// Returns whether the tree changed. A blank create/rename draft, or a
    /// rename to the current name, is rejected with
    /// [`AppError::InvalidInput`] and the modal stays open. A create that
    /// the engine refuses also keeps the modal and its draft: a vanished
    /// parent is [`AppError::NotFound`], an id clash is
    /// [`AppError::InvalidInput`] and can be retried with a fresh id.
    #[instrument(level = "debug", skip(self))]
    pub fn commit_modal(&mut self) -> Result<bool, AppError> {
        let modal = self.ui.modal.as_ref().ok_or(AppError::NoPendingOperation)?;
        let name = modal.draft.trim();
        let creates = matches!(modal.kind, ModalKind::CreateFile | ModalKind::CreateFolder);

        let next = match modal.kind {
            ModalKind::CreateFile | ModalKind::CreateFolder => {
                if name.is_empty() {
                    return Err(AppError::invalid_input("name", "name must not be empty"));
                }

                let id = self.ids.next_id();
                let node = if modal.kind == ModalKind::CreateFile {
                    TreeNode::File(FileNode::with_fallback_language(
                        id,
                        name,
                        &self.default_language,
                    ))
                } else {
                    TreeNode::folder(id, name)
                };

                tree_operator::insert_child(&self.tree, &modal.target, node)
            }
            ModalKind::Rename => {
                if name.is_empty() {
                    return Err(AppError::invalid_input("name", "name must not be empty"));
                }

                let current = self.tree.find(&modal.target).map(|node| node.name());
                if current == Some(name) {
                    return Err(AppError::invalid_input("name", "name is unchanged"));
                }

                tree_operator::rename(&self.tree, &modal.target, name)
            }
            ModalKind::Delete => tree_operator::remove(&self.tree, &modal.target),
        };

        if creates && next.ptr_eq(&self.tree) {
            return Err(if self.tree.contains(&modal.target) {
                AppError::invalid_input("id", "generated id already exists, try again")
            } else {
                AppError::NotFound(modal.target.clone())
            });
        }

        let Some(modal) = self.ui.close_modal() else {
            return Err(AppError::NoPendingOperation);
        };
        let changed = self.replace_tree(next);

        info!(
            kind = ?modal.kind,
            target_id = %modal.target,
            changed,
            "Modal committed"
        );
        Ok(changed)
    }
}
