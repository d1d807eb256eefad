//! Debate orchestration engine.
//!
//! Drives two concurrent, independently-cancelable streaming conversations
//! against the chat backend. Each side has its own lens configuration,
//! conversation identity, and message log; the coordinator fans user input
//! to both sides in parallel and optionally cross-feeds each side's reply
//! as the other side's next input for auto-continued rounds.

pub mod coordinator;
pub mod error;
pub mod events;
mod session;
pub mod types;

pub use coordinator::{ContinuationPolicy, DebateCoordinator, DebateCoordinatorBuilder};
pub use error::{SendError, SendResult};
pub use events::{event_channel, DebateEvent, EventSink};
pub use types::{
    AutoContinueConfig, DebateMessage, DebateState, MessageRole, Side, SideConfig,
    SideConfigUpdate, SideState, MAX_ACTIVE_LENSES, MAX_AUTO_ROUNDS, MIN_AUTO_ROUNDS,
};
