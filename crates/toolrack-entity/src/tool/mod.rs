//! Tool entity: model, status, actions, and audit events.

pub mod action;
pub mod event;
pub mod model;
pub mod status;

pub use action::{HolderChange, ToolAction, ToolTransition};
pub use event::{EventCondition, NewToolEvent, ToolEvent};
pub use model::{Tool, ToolRowUpdate};
pub use status::ToolStatus;
