//! End-to-end debate flow tests against a scripted chat backend.
//!
//! These exercise the public crate surface the way an embedding frontend
//! would: configure sides, run a debate, follow the event stream, and
//! reset. The final `#[ignore]`d test talks to a live backend; run with:
//! PRISM_API_BASE=http://localhost:3000 cargo test --test debate_flow -- --ignored

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use prism_chat::chat::{ByteStream, ChatBackend, ChatRequest, ChatResponse, HttpChatBackend};
use prism_chat::debate::{
    event_channel, ContinuationPolicy, DebateCoordinator, DebateEvent, MessageRole, Side,
    SideConfigUpdate,
};
use prism_chat::error::ChatError;
use prism_chat::lenses::{compose_lens_prompt, find_preset, BASELINE_SYSTEM_PROMPT};

/// Backend that answers each side with canned replies keyed by the
/// request's first active lens id, streaming each reply as word-sized SSE
/// frames.
struct ScriptedBackend {
    replies: Mutex<HashMap<String, Vec<String>>>,
    conversation_counter: AtomicUsize,
}

impl ScriptedBackend {
    fn new(replies: &[(&str, &[&str])]) -> Self {
        let map = replies
            .iter()
            .map(|(key, replies)| {
                (
                    key.to_string(),
                    replies.iter().rev().map(|r| r.to_string()).collect(),
                )
            })
            .collect();
        Self {
            replies: Mutex::new(map),
            conversation_counter: AtomicUsize::new(0),
        }
    }

    fn sse_body(content: &str) -> ByteStream {
        let mut frames: Vec<Result<Bytes, ChatError>> = content
            .split_inclusive(' ')
            .map(|word| {
                Ok(Bytes::from(format!(
                    "data: {}\n",
                    serde_json::json!({ "content": word })
                )))
            })
            .collect();
        frames.push(Ok(Bytes::from_static(b"data: [DONE]\n")));
        futures::stream::iter(frames).boxed()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let key = request
            .active_lens_ids
            .first()
            .cloned()
            .unwrap_or_default();
        let content = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|stack| stack.pop())
            .unwrap_or_else(|| format!("echo: {}", request.content));

        let conversation_id = request.conversation_id.unwrap_or_else(|| {
            let n = self.conversation_counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("conv-{}", n)
        });

        Ok(ChatResponse {
            conversation_id: Some(conversation_id),
            stream: Self::sse_body(&content),
        })
    }
}

#[tokio::test]
async fn test_full_debate_with_lenses_and_cross_feed() {
    let backend = ScriptedBackend::new(&[
        (
            "devils-advocate",
            &["Remote work erodes mentorship.", "Hybrid splits the difference."][..],
        ),
        (
            "valley-founder",
            &["Remote unlocks global talent.", "Async beats offices."][..],
        ),
    ]);
    let (events, mut rx) = event_channel();
    let coordinator = DebateCoordinator::builder(Arc::new(backend))
        .with_events(events)
        .with_continuation(ContinuationPolicy::ToBudget)
        .build();

    coordinator.update_side_config(
        Side::Left,
        SideConfigUpdate {
            label: Some("Skeptic".to_string()),
            lens_ids: Some(vec!["devils-advocate".to_string()]),
        },
    );
    coordinator.update_side_config(
        Side::Right,
        SideConfigUpdate {
            label: Some("Builder".to_string()),
            lens_ids: Some(vec!["valley-founder".to_string()]),
        },
    );
    assert!(coordinator.toggle_auto_continue());
    coordinator.set_max_rounds(2);

    coordinator.send_debate_message("Is remote work good?").await;

    let state = coordinator.state();
    assert_eq!(state.auto_continue.current_round, 2);

    // Each side: topic, own reply, the other's reply cross-fed, own reply.
    let left: Vec<&str> = state
        .left
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(
        left,
        vec![
            "Is remote work good?",
            "Remote work erodes mentorship.",
            "Remote unlocks global talent.",
            "Hybrid splits the difference.",
        ]
    );
    assert_eq!(state.left.messages[2].role, MessageRole::User);

    let right: Vec<&str> = state
        .right
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(
        right,
        vec![
            "Is remote work good?",
            "Remote unlocks global talent.",
            "Remote work erodes mentorship.",
            "Async beats offices.",
        ]
    );

    // Each side keeps one backend conversation across both rounds.
    assert!(state.left.conversation_id.is_some());
    assert_ne!(state.left.conversation_id, state.right.conversation_id);

    // The event stream brackets both rounds and carries growing chunks.
    let mut starts = Vec::new();
    let mut completions = Vec::new();
    let mut left_chunks: Vec<String> = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            DebateEvent::ExchangeStarted { round, .. } => starts.push(round),
            DebateEvent::ExchangeCompleted { round, .. } => completions.push(round),
            DebateEvent::StreamChunk {
                side: Side::Left,
                accumulated,
                ..
            } => left_chunks.push(accumulated),
            _ => {}
        }
    }
    assert_eq!(starts, vec![1, 2]);
    assert_eq!(completions, vec![1, 2]);
    // Each round's accumulation ends with that round's full reply.
    assert!(left_chunks.iter().any(|c| c == "Remote work erodes mentorship."));
    assert_eq!(
        left_chunks.last().map(String::as_str),
        Some("Hybrid splits the difference.")
    );
}

#[tokio::test]
async fn test_composed_prompts_reach_the_wire() {
    struct CapturingBackend {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for CapturingBackend {
        async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
            self.prompts.lock().unwrap().push(request.system_prompt);
            Ok(ChatResponse {
                conversation_id: Some("conv-1".to_string()),
                stream: ScriptedBackend::sse_body("ok"),
            })
        }
    }

    let backend = Arc::new(CapturingBackend {
        prompts: Mutex::new(Vec::new()),
    });
    let coordinator = DebateCoordinator::builder(Arc::clone(&backend) as Arc<dyn ChatBackend>)
        .build();
    coordinator.update_side_config(
        Side::Left,
        SideConfigUpdate {
            label: None,
            lens_ids: Some(vec!["first-principles".to_string()]),
        },
    );

    coordinator.send_debate_message("topic").await;

    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    // Every prompt starts from the shared baseline.
    assert!(prompts.iter().all(|p| p.starts_with(BASELINE_SYSTEM_PROMPT)));
    // The lensed side matches the composer's output exactly.
    let preset = find_preset("first-principles").expect("preset exists");
    let expected = compose_lens_prompt(&[preset.into()]);
    assert!(prompts.iter().any(|p| *p == expected));
    // The bare side sends the baseline alone.
    assert!(prompts.iter().any(|p| *p == BASELINE_SYSTEM_PROMPT));
}

#[tokio::test]
async fn test_reset_then_fresh_debate() {
    let backend = ScriptedBackend::new(&[]);
    let coordinator = DebateCoordinator::builder(Arc::new(backend)).build();

    coordinator.send_debate_message("first topic").await;
    let before = coordinator.state();
    assert_eq!(before.left.messages.len(), 2);
    let old_conversation = before.left.conversation_id.clone();

    coordinator.reset_debate();
    let cleared = coordinator.state();
    assert!(cleared.left.messages.is_empty());
    assert!(cleared.left.conversation_id.is_none());
    assert_eq!(cleared.auto_continue.current_round, 0);

    coordinator.send_debate_message("second topic").await;
    let after = coordinator.state();
    assert_eq!(after.left.messages.len(), 2);
    assert_eq!(after.left.messages[0].content, "second topic");
    // A fresh debate gets fresh conversation identities.
    assert_ne!(after.left.conversation_id, old_conversation);
    assert_eq!(after.auto_continue.current_round, 1);
}

#[tokio::test]
#[ignore] // Run with: PRISM_API_BASE=... cargo test --test debate_flow -- --ignored
async fn test_live_backend_single_exchange() {
    let api_base = std::env::var("PRISM_API_BASE")
        .expect("PRISM_API_BASE environment variable must be set for live tests");
    let backend = Arc::new(HttpChatBackend::new(api_base));
    let coordinator = DebateCoordinator::builder(backend).build();

    coordinator
        .send_debate_message("In one sentence: is remote work good?")
        .await;

    let state = coordinator.state();
    for side in [Side::Left, Side::Right] {
        let s = state.side(side);
        assert_eq!(s.messages.len(), 2, "side {} should have a reply", side);
        assert!(!s.messages[1].content.is_empty());
        assert!(s.conversation_id.is_some());
    }
}
