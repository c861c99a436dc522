//! Data models for the two API shapes.
//!
//! - `convert`: target/mode enumerations and the plain `POST /` response body.
//! - `chat`: the subset of the OpenAI Chat Completions response models emitted by
//!   `/v1/chat/completions`, streaming chunks included.
//!
//! Inbound bodies are validated field by field from `serde_json::Value` in
//! `crate::server`, so only the outbound side is modeled here in full.

pub mod chat;
pub mod convert;

pub use chat::{
    ChatCompletionChunk, ChatCompletionResponse, ChatDelta, ChatMessage, ChatStreamChoice,
    ChatUsage,
};
pub use convert::{ConvertResponse, Mode, Target};
