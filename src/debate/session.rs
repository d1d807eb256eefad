//! One side's streaming send pipeline.
//!
//! A [`SideSession`] owns no state of its own; it operates on the shared
//! [`DebateState`] under the coordinator's mutex, taking the lock only for
//! short synchronous touches and never across an await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::chat::{decode_stream, ChatBackend, ChatRequest};
use crate::error::ChatError;
use crate::lenses::{compose_lens_prompt, Lens};

use super::error::{SendError, SendResult};
use super::events::{DebateEvent, EventSink};
use super::types::{DebateState, MessageRole, Side};

/// A completed side reply.
pub(crate) struct SideReply {
    pub conversation_id: String,
    pub content: String,
}

/// Executes sends for one side against the shared debate state.
pub(crate) struct SideSession {
    side: Side,
    state: Arc<Mutex<DebateState>>,
    backend: Arc<dyn ChatBackend>,
    events: EventSink,
}

impl SideSession {
    pub(crate) fn new(
        side: Side,
        state: Arc<Mutex<DebateState>>,
        backend: Arc<dyn ChatBackend>,
        events: EventSink,
    ) -> Self {
        Self {
            side,
            state,
            backend,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DebateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `content` to this side and streams the reply into the shared
    /// state. Resolved lenses determine the system prompt and the lens ids
    /// on the wire. Cancellation settles the side quietly; any other
    /// failure is logged, emitted as [`DebateEvent::SideFailed`], and
    /// returned.
    pub(crate) async fn send(&self, content: &str, lenses: &[Lens]) -> SendResult<SideReply> {
        let token = CancellationToken::new();

        let conversation_id = {
            let mut state = self.lock();
            let side = state.side_mut(self.side);
            side.begin_streaming(token.clone());
            side.conversation_id.clone()
        };

        let result = tokio::select! {
            _ = token.cancelled() => Err(SendError::Cancelled(self.side)),
            result = self.exchange(content, conversation_id, lenses) => result,
        };

        {
            let mut state = self.lock();
            state.side_mut(self.side).settle();
        }

        match result {
            Ok(reply) => {
                {
                    let mut state = self.lock();
                    let side = state.side_mut(self.side);
                    side.conversation_id = Some(reply.conversation_id.clone());
                    side.push_message(MessageRole::Assistant, reply.content.clone());
                }
                self.events
                    .emit(DebateEvent::side_completed(self.side, reply.content.len()));
                Ok(reply)
            }
            Err(err) => {
                if !err.is_cancelled() {
                    tracing::warn!(side = %self.side, error = %err, "Side send failed");
                    self.events
                        .emit(DebateEvent::side_failed(self.side, err.to_string()));
                }
                Err(err)
            }
        }
    }

    async fn exchange(
        &self,
        content: &str,
        conversation_id: Option<String>,
        lenses: &[Lens],
    ) -> SendResult<SideReply> {
        let request = ChatRequest {
            content: content.to_string(),
            conversation_id,
            active_lens_ids: lenses.iter().map(|l| l.id().to_string()).collect(),
            system_prompt: compose_lens_prompt(lenses),
        };

        let response = self.backend.send(request).await.map_err(|e| match e {
            ChatError::Status { code } => SendError::HttpStatus {
                side: self.side,
                code,
            },
            other => SendError::RequestFailed {
                side: self.side,
                reason: other.to_string(),
            },
        })?;

        let conversation_id = response
            .conversation_id
            .ok_or(SendError::MissingConversationId(self.side))?;

        let side = self.side;
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let content = decode_stream(
            response.stream,
            |accumulated| {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                let side_state = state.side_mut(side);
                side_state.streaming_content.clear();
                side_state.streaming_content.push_str(accumulated);
                drop(state);
                events.emit(DebateEvent::stream_chunk(side, accumulated));
            },
            |message| {
                tracing::warn!(side = %side, message, "Chat stream reported an error frame");
                events.emit(DebateEvent::stream_notice(side, message));
            },
        )
        .await;

        Ok(SideReply {
            conversation_id,
            content,
        })
    }
}
