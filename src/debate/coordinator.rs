//! Debate coordination: paired parallel sends and cross-feed continuation.
//!
//! The coordinator owns the shared [`DebateState`] and serializes every
//! mutation through its mutex. A debate send fans out to both sides in
//! parallel, appends each reply as it lands, and, when auto-continue is
//! enabled and budget remains, feeds each side's reply to the other as the
//! next round's input.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::chat::ChatBackend;
use crate::lenses::{InMemoryLensStore, LensCatalog};

use super::events::{DebateEvent, EventSink};
use super::session::SideSession;
use super::types::{
    DebateState, MessageRole, Side, SideConfig, SideConfigUpdate, MAX_AUTO_ROUNDS, MIN_AUTO_ROUNDS,
};

/// How far one `send_debate_message` call drives auto-continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationPolicy {
    /// Run at most one cross-fed round per call; the caller decides whether
    /// to keep going.
    #[default]
    SingleStep,
    /// Keep cross-feeding until the round budget is exhausted or a side
    /// fails.
    ToBudget,
}

/// Builder for [`DebateCoordinator`].
pub struct DebateCoordinatorBuilder {
    backend: Arc<dyn ChatBackend>,
    catalog: Option<Arc<dyn LensCatalog>>,
    events: EventSink,
    continuation: ContinuationPolicy,
}

impl DebateCoordinatorBuilder {
    /// Starts a builder with the chat backend both sides send through.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            catalog: None,
            events: EventSink::disabled(),
            continuation: ContinuationPolicy::default(),
        }
    }

    /// Uses the given lens catalog instead of the in-memory default.
    pub fn with_catalog(mut self, catalog: Arc<dyn LensCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Attaches an event sink for lifecycle and streaming notifications.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Sets the auto-continue driving policy.
    pub fn with_continuation(mut self, continuation: ContinuationPolicy) -> Self {
        self.continuation = continuation;
        self
    }

    /// Builds the coordinator with a fresh empty debate.
    pub fn build(self) -> DebateCoordinator {
        let state = Arc::new(Mutex::new(DebateState::new()));
        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(InMemoryLensStore::new()));
        let left = SideSession::new(
            Side::Left,
            Arc::clone(&state),
            Arc::clone(&self.backend),
            self.events.clone(),
        );
        let right = SideSession::new(
            Side::Right,
            Arc::clone(&state),
            Arc::clone(&self.backend),
            self.events.clone(),
        );
        DebateCoordinator {
            state,
            left,
            right,
            catalog,
            events: self.events,
            continuation: self.continuation,
        }
    }
}

/// Runs a two-sided debate over a shared chat backend.
pub struct DebateCoordinator {
    state: Arc<Mutex<DebateState>>,
    left: SideSession,
    right: SideSession,
    catalog: Arc<dyn LensCatalog>,
    events: EventSink,
    continuation: ContinuationPolicy,
}

impl DebateCoordinator {
    /// Starts building a coordinator over the given backend.
    pub fn builder(backend: Arc<dyn ChatBackend>) -> DebateCoordinatorBuilder {
        DebateCoordinatorBuilder::new(backend)
    }

    fn lock(&self) -> MutexGuard<'_, DebateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================
    // Sending
    // ============================================================

    /// Sends `content` to both sides in parallel, then runs cross-fed
    /// rounds per the auto-continue configuration and the continuation
    /// policy.
    ///
    /// Whitespace-only input is ignored, as is a call while either side is
    /// already streaming. Failures surface as events; a failed or
    /// cancelled side leaves the other side's completed reply in place.
    pub async fn send_debate_message(&self, content: &str) {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring empty debate message");
            return;
        }

        let round = {
            let mut state = self.lock();
            if state.is_any_streaming() {
                tracing::warn!("Debate send ignored: a reply is already streaming");
                return;
            }
            state.left.push_message(MessageRole::User, trimmed);
            state.right.push_message(MessageRole::User, trimmed);
            state.auto_continue.current_round += 1;
            state.auto_continue.current_round
        };

        self.events.emit(DebateEvent::exchange_started(round));
        let Some(mut replies) = self.run_exchange(round, trimmed, trimmed).await else {
            return;
        };

        loop {
            let round = {
                let mut state = self.lock();
                if !state.auto_continue.eligible() {
                    break;
                }
                // Cross-feed: each side reads the other's last reply.
                state
                    .left
                    .push_message(MessageRole::User, replies.right.clone());
                state
                    .right
                    .push_message(MessageRole::User, replies.left.clone());
                state.auto_continue.current_round += 1;
                state.auto_continue.current_round
            };

            self.events.emit(DebateEvent::exchange_started(round));
            match self.run_exchange(round, &replies.right, &replies.left).await {
                Some(next) => replies = next,
                None => break,
            }

            if self.continuation == ContinuationPolicy::SingleStep {
                break;
            }
        }
    }

    /// Runs one paired exchange. Returns both replies, or `None` if either
    /// side failed or was cancelled.
    async fn run_exchange(
        &self,
        round: u32,
        left_input: &str,
        right_input: &str,
    ) -> Option<ExchangeReplies> {
        let (left_ids, right_ids) = {
            let state = self.lock();
            (
                state.left.config.lens_ids.clone(),
                state.right.config.lens_ids.clone(),
            )
        };

        let mut lenses = Vec::with_capacity(2);
        for (side, ids) in [(Side::Left, &left_ids), (Side::Right, &right_ids)] {
            match self.catalog.resolve(ids).await {
                Ok(resolved) => lenses.push(resolved),
                Err(e) => {
                    tracing::warn!(side = %side, error = %e, "Lens resolution failed");
                    self.events.emit(DebateEvent::side_failed(side, e.to_string()));
                    return None;
                }
            }
        }
        let right_lenses = lenses.pop()?;
        let left_lenses = lenses.pop()?;

        // Both futures are constructed before either is polled, so the two
        // sides stream concurrently.
        let (left, right) = tokio::join!(
            self.left.send(left_input, &left_lenses),
            self.right.send(right_input, &right_lenses),
        );

        self.events.emit(DebateEvent::exchange_completed(round));

        match (left, right) {
            (Ok(l), Ok(r)) => Some(ExchangeReplies {
                left: l.content,
                right: r.content,
            }),
            _ => None,
        }
    }

    // ============================================================
    // Configuration
    // ============================================================

    /// Merges a partial configuration update into one side. Ignored while
    /// that side is streaming.
    pub fn update_side_config(&self, side: Side, update: SideConfigUpdate) {
        let mut state = self.lock();
        let side_state = state.side_mut(side);
        if side_state.streaming {
            tracing::warn!(side = %side, "Config update ignored while side is streaming");
            return;
        }
        side_state.config.apply(update);
    }

    /// Returns a snapshot of one side's configuration.
    pub fn side_config(&self, side: Side) -> SideConfig {
        self.lock().side(side).config.clone()
    }

    /// Flips cross-feed auto-continue and returns the new setting.
    pub fn toggle_auto_continue(&self) -> bool {
        let mut state = self.lock();
        state.auto_continue.enabled = !state.auto_continue.enabled;
        state.auto_continue.enabled
    }

    /// Sets the auto-continue round budget, clamped to the valid range.
    pub fn set_max_rounds(&self, rounds: u32) {
        self.lock().auto_continue.max_rounds = rounds.clamp(MIN_AUTO_ROUNDS, MAX_AUTO_ROUNDS);
    }

    // ============================================================
    // Control
    // ============================================================

    /// Stops auto-continue and cancels any in-flight sends. Returns
    /// immediately; cancelled sends settle without appending a reply.
    pub fn stop_auto_continue(&self) {
        let mut state = self.lock();
        state.left.cancel_in_flight();
        state.right.cancel_in_flight();
        state.auto_continue.enabled = false;
    }

    /// Cancels any in-flight sends and restores the initial empty state.
    pub fn reset_debate(&self) {
        {
            let mut state = self.lock();
            state.left.cancel_in_flight();
            state.right.cancel_in_flight();
            *state = DebateState::new();
        }
        self.events.emit(DebateEvent::debate_reset());
    }

    /// Cancels any in-flight sends without touching the logs. Called on
    /// shutdown.
    pub fn close(&self) {
        let mut state = self.lock();
        state.left.cancel_in_flight();
        state.right.cancel_in_flight();
    }

    // ============================================================
    // Inspection
    // ============================================================

    /// Returns a snapshot of the full debate state.
    pub fn state(&self) -> DebateState {
        self.lock().clone()
    }

    /// Whether either side has a send in flight.
    pub fn is_any_streaming(&self) -> bool {
        self.lock().is_any_streaming()
    }
}

struct ExchangeReplies {
    left: String,
    right: String,
}
