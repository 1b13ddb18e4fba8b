//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Explorer Interaction Commands
//!
//! Defines the `Action` enum, which represents every interaction the explorer
//! panel can respond to. A renderer translates clicks and key presses into
//! actions; the [`ActionDispatcher`](crate::controller::action_dispatcher::ActionDispatcher)
//! applies them to the interaction state.

use compact_str::CompactString;

use crate::model::{
    node::NodeId,
    ui_state::{MenuOption, ModalKind},
};

/// Represents a high-level action on the explorer tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Primary click on a row: folders toggle, files are selected.
    Activate(NodeId),

    /// Cancel the pending modal.
    CancelModal,

    /// Apply a choice from the open context menu.
    ChooseMenuOption(MenuOption),

    ClearSelection,

    CloseContextMenu,

    /// Confirm the pending modal.
    CommitModal,

    /// Secondary click at pointer coordinates.
    OpenContextMenu { id: NodeId, x: i32, y: i32 },

    /// Open a modal directly, bypassing the context menu.
    OpenModal { kind: ModalKind, id: NodeId },

    SelectFile(NodeId),

    /// Replace the text in the pending modal's input field.
    SetDraft(CompactString),

    ToggleOpen(NodeId),
}

impl Action {
    /// Stable name used in log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Activate(_) => "activate",
            Self::CancelModal => "cancel_modal",
            Self::ChooseMenuOption(_) => "choose_menu_option",
            Self::ClearSelection => "clear_selection",
            Self::CloseContextMenu => "close_context_menu",
            Self::CommitModal => "commit_modal",
            Self::OpenContextMenu { .. } => "open_context_menu",
            Self::OpenModal { .. } => "open_modal",
            Self::SelectFile(_) => "select_file",
            Self::SetDraft(_) => "set_draft",
            Self::ToggleOpen(_) => "toggle_open",
        }
    }

    /// Whether applying this action can produce a new tree snapshot.
    pub const fn may_mutate_tree(&self) -> bool {
        matches!(
            self,
            Self::Activate(_) | Self::ToggleOpen(_) | Self::CommitModal
        )
    }
}
