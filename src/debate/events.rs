//! Debate lifecycle events.
//!
//! The coordinator emits events over an unbounded channel so a frontend
//! (CLI renderer, UI bridge) can follow both streams without ever blocking
//! the decode loop. Delivery is lossy by design: if no receiver is
//! attached, or the receiver is gone, events are dropped silently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use super::types::Side;

/// Progress and lifecycle notifications emitted while a debate runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DebateEvent {
    /// An exchange (one paired send to both sides) has started.
    ExchangeStarted {
        round: u32,
        timestamp: DateTime<Utc>,
    },
    /// A side produced another chunk; carries the full accumulated text.
    StreamChunk {
        side: Side,
        accumulated: String,
        timestamp: DateTime<Utc>,
    },
    /// A side's stream reported a recoverable error frame.
    StreamNotice {
        side: Side,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// A side's send failed outright.
    SideFailed {
        side: Side,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// A side's reply completed.
    SideCompleted {
        side: Side,
        reply_len: usize,
        timestamp: DateTime<Utc>,
    },
    /// Both sides of an exchange have settled.
    ExchangeCompleted {
        round: u32,
        timestamp: DateTime<Utc>,
    },
    /// The debate was reset to its initial state.
    DebateReset { timestamp: DateTime<Utc> },
}

impl DebateEvent {
    pub fn exchange_started(round: u32) -> Self {
        Self::ExchangeStarted {
            round,
            timestamp: Utc::now(),
        }
    }

    pub fn stream_chunk(side: Side, accumulated: impl Into<String>) -> Self {
        Self::StreamChunk {
            side,
            accumulated: accumulated.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn stream_notice(side: Side, message: impl Into<String>) -> Self {
        Self::StreamNotice {
            side,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn side_failed(side: Side, message: impl Into<String>) -> Self {
        Self::SideFailed {
            side,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn side_completed(side: Side, reply_len: usize) -> Self {
        Self::SideCompleted {
            side,
            reply_len,
            timestamp: Utc::now(),
        }
    }

    pub fn exchange_completed(round: u32) -> Self {
        Self::ExchangeCompleted {
            round,
            timestamp: Utc::now(),
        }
    }

    pub fn debate_reset() -> Self {
        Self::DebateReset {
            timestamp: Utc::now(),
        }
    }
}

/// Fire-and-forget event emitter. Cloneable; the default sink discards
/// everything.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<DebateEvent>>,
}

impl EventSink {
    /// A sink that drops all events.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emits an event, ignoring a closed receiver.
    pub fn emit(&self, event: DebateEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Creates a connected sink/receiver pair.
pub fn event_channel() -> (EventSink, mpsc::UnboundedReceiver<DebateEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx: Some(tx) }, rx)
}
