//! Chat backend wire contract and HTTP implementation.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;

use crate::error::ChatError;

/// Response header carrying the backend-assigned conversation identifier.
const CONVERSATION_ID_HEADER: &str = "X-Conversation-Id";

/// Timeout for establishing the connection and receiving response headers.
/// The body itself streams without a deadline; cancellation is the caller's
/// mechanism for abandoning a slow stream.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// A streamed response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// One chat send: the user text plus the side's conversation identity and
/// lens configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The raw input text.
    pub content: String,
    /// Existing conversation to append to; omitted on the first send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Ids of the side's active lenses.
    pub active_lens_ids: Vec<String>,
    /// System prompt composed from the active lenses.
    pub system_prompt: String,
}

/// A chat response: the conversation identifier from response metadata and
/// the SSE-framed body stream.
pub struct ChatResponse {
    /// Backend-assigned conversation identifier, if present. The Side
    /// Session treats absence as a protocol violation.
    pub conversation_id: Option<String>,
    /// The streamed response body.
    pub stream: ByteStream,
}

/// The streaming chat endpoint both debate sides send through.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issues one chat send and returns the response metadata plus body
    /// stream. A non-success HTTP status is an error; stream-level problems
    /// surface as items on the returned stream.
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// HTTP chat backend posting to `{base}/api/chat/send`.
pub struct HttpChatBackend {
    client: Client,
    api_base: String,
}

impl HttpChatBackend {
    /// Creates a backend for the given base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client - system TLS configuration error"),
            api_base: api_base.into(),
        }
    }

    /// Get the base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let url = format!("{}/api/chat/send", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                code: status.as_u16(),
            });
        }

        let conversation_id = response
            .headers()
            .get(CONVERSATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ChatError::StreamRead(e.to_string())))
            .boxed();

        Ok(ChatResponse {
            conversation_id,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_omits_null_conversation_id() {
        let request = ChatRequest {
            content: "hello".to_string(),
            conversation_id: None,
            active_lens_ids: vec!["devils-advocate".to_string()],
            system_prompt: "base".to_string(),
        };

        let json = serde_json::to_string(&request).expect("serialization should succeed");
        assert!(json.contains("\"content\":\"hello\""));
        assert!(json.contains("\"activeLensIds\":[\"devils-advocate\"]"));
        assert!(!json.contains("conversationId"));
    }

    #[test]
    fn test_request_serialization_includes_conversation_id() {
        let request = ChatRequest {
            content: "hello".to_string(),
            conversation_id: Some("conv-1".to_string()),
            active_lens_ids: vec![],
            system_prompt: "base".to_string(),
        };

        let json = serde_json::to_string(&request).expect("serialization should succeed");
        assert!(json.contains("\"conversationId\":\"conv-1\""));
    }

    #[tokio::test]
    async fn test_send_connection_error() {
        let backend = HttpChatBackend::new("http://localhost:65535");
        let result = backend
            .send(ChatRequest {
                content: "hello".to_string(),
                conversation_id: None,
                active_lens_ids: vec![],
                system_prompt: String::new(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::RequestFailed(_))));
    }
}
