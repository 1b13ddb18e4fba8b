//! ActionDispatcher: applies explorer actions to the interaction state.
//!
//! Each [`Action`] is resolved against an [`ExplorerState`]. Tree-changing
//! actions go through the mutation engine and the outcome reports whether a
//! new snapshot replaced the old one, so a renderer knows what to repaint.

use tracing::{debug, warn};

use crate::{
    controller::actions::Action,
    error::AppError,
    model::{explorer_state::ExplorerState, id_gen::IdGenerator},
};

/// Result of dispatching one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A new tree snapshot replaced the previous one.
    pub tree_changed: bool,

    /// Redraw flags pending after the action, see
    /// [`RedrawFlag`](crate::model::ui_state::RedrawFlag).
    pub redraw: u8,
}

impl DispatchOutcome {
    #[inline]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw != 0
    }
}

/// Stateless dispatcher; all state lives in [`ExplorerState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    /// Apply a single action. Pending redraw flags are handed to the caller
    /// through the returned outcome.
    pub fn dispatch<G: IdGenerator>(
        state: &mut ExplorerState<G>,
        action: Action,
    ) -> Result<DispatchOutcome, AppError> {
        let name = action.name();
        let tree_changed = Self::apply(state, action)?;
        let redraw = state.ui_mut().take_redraw();

        debug!(action = name, tree_changed, redraw, "Action dispatched");
        Ok(DispatchOutcome {
            tree_changed,
            redraw,
        })
    }

    /// Apply actions in order, stopping at the first error. Outcomes are
    /// merged so one repaint covers the whole batch.
    pub fn dispatch_all<G: IdGenerator>(
        state: &mut ExplorerState<G>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<DispatchOutcome, AppError> {
        let mut merged = DispatchOutcome::default();

        for action in actions {
            let outcome = Self::dispatch(state, action)?;
            merged.tree_changed |= outcome.tree_changed;
            merged.redraw |= outcome.redraw;
        }

        Ok(merged)
    }

    fn apply<G: IdGenerator>(
        state: &mut ExplorerState<G>,
        action: Action,
    ) -> Result<bool, AppError> {
        let changed = match action {
            Action::Activate(id) => state.activate(&id),

            Action::ToggleOpen(id) => state.toggle_open(&id),

            Action::SelectFile(id) => {
                if !state.select_file(&id) {
                    debug!(id = %id, "Selection ignored: not a file");
                }
                false
            }

            Action::ClearSelection => {
                state.clear_selection();
                false
            }

            Action::OpenContextMenu { id, x, y } => {
                if !state.open_context_menu(&id, x, y) {
                    warn!(id = %id, "Context menu requested for unknown node");
                }
                false
            }

            Action::CloseContextMenu => {
                state.close_context_menu();
                false
            }

            Action::ChooseMenuOption(option) => {
                state.choose_menu_option(option)?;
                false
            }

            Action::OpenModal { kind, id } => {
                state.open_modal(kind, &id)?;
                false
            }

            Action::SetDraft(text) => {
                if !state.set_draft(text) {
                    debug!("Draft ignored: no modal open");
                }
                false
            }

            Action::CommitModal => state.commit_modal()?,

            Action::CancelModal => {
                state.cancel_modal();
                false
            }
        };

        Ok(changed)
    }
}
