#![forbid(unsafe_code)]
#![doc = r#"
Kana2Chat

Japanese kana/romaji transliteration served over HTTP, in two API shapes.

Crate highlights
- `POST /`: plain JSON `{text, to?, mode?}` -> `{converted}`.
- `POST /v1/chat/completions`: OpenAI-compatible Chat Completions, JSON or SSE streaming.
  The target script and rendering mode travel in the `model` field (`"romaji-spaced"`)
  or in `model` + `mode`.
- `GET /`: returns a fresh UUID.

Modules
- `models`: Target/mode enumerations and Chat Completions response models.
- `model_string`: Decoding of the `model`/`mode` fields into a (target, mode) pair.
- `engine`: Transliterator traits, the memoized engine handle, and the dictionary-backed engine.
- `cors`: Single-origin CORS policy and response envelope middleware.
- `server`: Axum router/handlers (the binary uses this).
- `error`: HTTP error taxonomy.
- `util`: Shared helpers (tracing, env configuration, app state).
"#]

pub mod cors;
pub mod engine;
pub mod error;
pub mod model_string;
pub mod models;
pub mod server;
pub mod util;

pub use crate::error::ApiError;
pub use crate::server::build_router;
pub use crate::util::{AppState, ServiceConfig};

// Re-export model namespaces for convenience (downstream users can do `use kana2chat::chat`).
pub use crate::models::{chat, convert};
