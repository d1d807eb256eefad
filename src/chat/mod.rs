//! Chat backend transport and stream decoding.
//!
//! The chat backend is the streaming endpoint both debate sides talk to.
//! `backend` defines the wire contract and a reqwest implementation;
//! `sse` decodes the server-sent-event framed response body.

pub mod backend;
pub mod sse;

pub use backend::{ByteStream, ChatBackend, ChatRequest, ChatResponse, HttpChatBackend};
pub use sse::decode_stream;
