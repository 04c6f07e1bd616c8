//! Workspace - pane state machines and the actor that owns them

pub mod actor;
pub mod pane;
pub mod templates;

pub use actor::{FollowUpOutcome, WorkspaceActor, WorkspaceArguments, WorkspaceError, WorkspaceMsg};
pub use pane::{OutboundRequest, Pane, PanePhase, PaneTransitionError};
pub use templates::{instruction_for, InstructionTemplate};
