//! Debate state model.
//!
//! The aggregate [`DebateState`] is owned exclusively by the coordinator;
//! both sides have a statically-checked shape (`{left, right}`) rather than
//! stringly-keyed fields. Message logs are append-only; only a full reset
//! clears them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub use crate::lenses::MAX_ACTIVE_LENSES;

/// Lower bound for the auto-continue round budget.
pub const MIN_AUTO_ROUNDS: u32 = 1;

/// Upper bound for the auto-continue round budget.
pub const MAX_AUTO_ROUNDS: u32 = 10;

/// Default auto-continue round budget.
const DEFAULT_MAX_ROUNDS: u32 = 3;

/// One of the two debate participants. The design is fixed at two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other side.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Default display label for this side.
    pub fn default_label(&self) -> &'static str {
        match self {
            Side::Left => "Perspective A",
            Side::Right => "Perspective B",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Role of a message author within one side's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A message in one side's log. Append-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateMessage {
    /// Unique message identifier.
    pub id: String,
    /// Which side's log this message belongs to.
    pub side: Side,
    /// Author role.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl DebateMessage {
    /// Creates a new message with a generated id and current timestamp.
    pub fn new(side: Side, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            side,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Per-side configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConfig {
    /// Which side this configures.
    pub side: Side,
    /// Display label.
    pub label: String,
    /// Ordered ids of active lenses, at most [`MAX_ACTIVE_LENSES`].
    pub lens_ids: Vec<String>,
}

impl SideConfig {
    /// Creates the default configuration for a side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            label: side.default_label().to_string(),
            lens_ids: Vec::new(),
        }
    }

    /// Merges a partial update, clamping `lens_ids` to the activation cap.
    pub fn apply(&mut self, update: SideConfigUpdate) {
        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(mut lens_ids) = update.lens_ids {
            if lens_ids.len() > MAX_ACTIVE_LENSES {
                tracing::warn!(
                    side = %self.side,
                    requested = lens_ids.len(),
                    limit = MAX_ACTIVE_LENSES,
                    "Lens activation over the cap; keeping the first entries"
                );
                lens_ids.truncate(MAX_ACTIVE_LENSES);
            }
            self.lens_ids = lens_ids;
        }
    }
}

/// Partial update for a [`SideConfig`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SideConfigUpdate {
    pub label: Option<String>,
    pub lens_ids: Option<Vec<String>>,
}

/// Auto-continue configuration for multi-round debates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoContinueConfig {
    /// Whether cross-feed continuation is enabled.
    pub enabled: bool,
    /// Round budget, within `[MIN_AUTO_ROUNDS, MAX_AUTO_ROUNDS]`.
    pub max_rounds: u32,
    /// Completed-or-started exchanges so far; the initial exchange is
    /// round 1.
    pub current_round: u32,
}

impl Default for AutoContinueConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_rounds: DEFAULT_MAX_ROUNDS,
            current_round: 0,
        }
    }
}

impl AutoContinueConfig {
    /// Whether another cross-fed round may start.
    pub fn eligible(&self) -> bool {
        self.enabled && self.current_round < self.max_rounds
    }
}

/// Mutable per-side state: log, streaming progress, conversation identity,
/// and the in-flight cancellation handle.
#[derive(Debug, Clone)]
pub struct SideState {
    /// Side configuration.
    pub config: SideConfig,
    /// Message log, oldest first.
    pub messages: Vec<DebateMessage>,
    /// Whether a send is in flight; true iff `cancel` is set.
    pub streaming: bool,
    /// Accumulated partial reply while streaming; empty otherwise.
    pub streaming_content: String,
    /// Backend-assigned conversation identifier, set on the first
    /// successful send.
    pub conversation_id: Option<String>,
    /// Cancellation handle for the in-flight send; set iff `streaming`.
    pub(crate) cancel: Option<CancellationToken>,
}

impl SideState {
    /// Creates the empty state for a side.
    pub fn new(side: Side) -> Self {
        Self {
            config: SideConfig::new(side),
            messages: Vec::new(),
            streaming: false,
            streaming_content: String::new(),
            conversation_id: None,
            cancel: None,
        }
    }

    /// Marks a send in flight: flag and handle set together, partial
    /// buffer cleared. Replaces any prior handle.
    pub(crate) fn begin_streaming(&mut self, token: CancellationToken) {
        self.streaming = true;
        self.streaming_content.clear();
        self.cancel = Some(token);
    }

    /// Clears streaming flag, partial buffer, and handle together.
    pub(crate) fn settle(&mut self) {
        self.streaming = false;
        self.streaming_content.clear();
        self.cancel = None;
    }

    /// Cancels the in-flight send, if any, and clears streaming state.
    pub(crate) fn cancel_in_flight(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.settle();
    }

    /// Appends a message to this side's log.
    pub(crate) fn push_message(&mut self, role: MessageRole, content: impl Into<String>) {
        let side = self.config.side;
        self.messages.push(DebateMessage::new(side, role, content));
    }
}

/// The complete debate aggregate, owned by the coordinator.
#[derive(Debug, Clone)]
pub struct DebateState {
    /// Left side state.
    pub left: SideState,
    /// Right side state.
    pub right: SideState,
    /// Auto-continue configuration and round counter.
    pub auto_continue: AutoContinueConfig,
}

impl DebateState {
    /// Creates the initial empty state.
    pub fn new() -> Self {
        Self {
            left: SideState::new(Side::Left),
            right: SideState::new(Side::Right),
            auto_continue: AutoContinueConfig::default(),
        }
    }

    /// Borrows one side's state.
    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Mutably borrows one side's state.
    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Whether either side has a send in flight.
    pub fn is_any_streaming(&self) -> bool {
        self.left.streaming || self.right.streaming
    }
}

impl Default for DebateState {
    fn default() -> Self {
        Self::new()
    }
}
