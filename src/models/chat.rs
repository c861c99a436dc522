use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Minimal Chat message model: only string content is accepted on the inbound side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Chat Completions Response Models
// ============================================================================

/// Choice in a Chat Completions response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: Option<String>, // "stop"
}

/// Usage block.
///
/// Counts are characters of the prompt and of the converted text, not model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ChatUsage {
    pub fn from_texts(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = prompt.chars().count() as u64;
        let completion_tokens = completion.chars().count() as u64;
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Complete Chat Completions API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String, // "chat.completion"
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: ChatUsage,
}

// ============================================================================
// Chat Completions Streaming Response Models
// ============================================================================

/// Delta in a streaming chunk; the terminal chunk carries an empty delta `{}`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Choice in a streaming chunk. `finish_reason` is serialized as `null` until the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChoice {
    pub delta: ChatDelta,
    pub index: u32,
    pub finish_reason: Option<String>,
}

/// Streaming chunk response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String, // "chat.completion.chunk"
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatStreamChoice>,
}

/// Prefix shared by completion and chunk identifiers.
pub const COMPLETION_ID_PREFIX: &str = "chatcmpl-";

pub fn completion_id() -> String {
    format!("{COMPLETION_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

impl ChatCompletionResponse {
    pub fn new(model: String, prompt: &str, converted: String, created: u64) -> Self {
        let usage = ChatUsage::from_texts(prompt, &converted);
        Self {
            id: completion_id(),
            object: "chat.completion".to_string(),
            created,
            model,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(converted),
                finish_reason: Some("stop".to_string()),
            }],
            usage,
        }
    }
}

impl ChatCompletionChunk {
    /// Chunk carrying a single piece of content.
    pub fn content(model: &str, piece: String, created: u64) -> Self {
        Self::with_choice(
            model,
            created,
            ChatStreamChoice {
                delta: ChatDelta {
                    content: Some(piece),
                },
                index: 0,
                finish_reason: None,
            },
        )
    }

    /// Terminal chunk: empty delta, `finish_reason: "stop"`.
    pub fn stop(model: &str, created: u64) -> Self {
        Self::with_choice(
            model,
            created,
            ChatStreamChoice {
                delta: ChatDelta::default(),
                index: 0,
                finish_reason: Some("stop".to_string()),
            },
        )
    }

    fn with_choice(model: &str, created: u64, choice: ChatStreamChoice) -> Self {
        Self {
            id: completion_id(),
            object: "chat.completion.chunk".to_string(),
            created,
            model: model.to_string(),
            choices: vec![choice],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usage_counts_characters_not_bytes() {
        let usage = ChatUsage::from_texts("こんにちは", "konnichiha");
        assert_eq!(usage.prompt_tokens, 5);
        assert_eq!(usage.completion_tokens, 10);
        assert_eq!(usage.total_tokens, 15);
    }

    #[test]
    fn content_chunk_keeps_null_finish_reason() {
        let chunk = ChatCompletionChunk::content("hiragana", "あ".into(), 1);
        let v = serde_json::to_value(&chunk).unwrap();
        assert_eq!(v["object"], "chat.completion.chunk");
        assert!(v["id"].as_str().unwrap().starts_with(COMPLETION_ID_PREFIX));
        assert_eq!(
            v["choices"][0],
            json!({"delta": {"content": "あ"}, "index": 0, "finish_reason": null})
        );
    }

    #[test]
    fn stop_chunk_has_empty_delta() {
        let v = serde_json::to_value(ChatCompletionChunk::stop("romaji", 1)).unwrap();
        assert_eq!(v["choices"][0]["delta"], json!({}));
        assert_eq!(v["choices"][0]["finish_reason"], "stop");
    }

    #[test]
    fn completion_shape() {
        let resp = ChatCompletionResponse::new("katakana".into(), "あい", "アイ".into(), 42);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["object"], "chat.completion");
        assert_eq!(v["created"], 42);
        assert_eq!(v["model"], "katakana");
        assert_eq!(
            v["choices"][0]["message"],
            json!({"role": "assistant", "content": "アイ"})
        );
        assert_eq!(v["choices"][0]["finish_reason"], "stop");
        assert_eq!(v["usage"]["total_tokens"], 4);
    }
}
