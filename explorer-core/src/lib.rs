pub mod error;
pub use error::AppError;

pub mod config;

pub mod logging;

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;
    pub use action_dispatcher::{ActionDispatcher, DispatchOutcome};
}

pub mod model {
    pub mod node;
    pub use node::{FileNode, FolderNode, NodeId, NodeKind, TreeNode};

    pub mod tree;
    pub use tree::{Tree, VisibleRow};

    pub mod id_gen;
    pub use id_gen::{IdGenerator, NanoIdGenerator, SequentialIdGenerator};

    pub mod ui_state;
    pub use ui_state::{ContextMenu, MenuOption, Modal, ModalKind, RedrawFlag, UIState};

    pub mod explorer_state;
    pub use explorer_state::ExplorerState;
}

pub mod operators {
    pub mod tree_operator;
}
