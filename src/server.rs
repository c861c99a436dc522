use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::cors::envelope;
use crate::engine::ConvertOptions;
use crate::error::ApiError;
use crate::model_string;
use crate::models::{ChatCompletionChunk, ChatCompletionResponse, ConvertResponse, Mode, Target};
use crate::util::{current_timestamp, AppState};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Build the Axum router: `GET /`, `POST /`, `POST /v1/chat/completions`, and a JSON 404.
///
/// Every response passes through the CORS envelope; `OPTIONS` never reaches a handler.
/// `HEAD /` is routed to the 404 explicitly, since `get` would otherwise answer it.
pub fn build_router(state: AppState) -> Router {
    let cors = state.cors.clone();
    let state = Arc::new(state);

    Router::new()
        .route(
            "/",
            get(issue_uuid)
                .post(convert)
                .head(not_found)
                .fallback(not_found),
        )
        .route(
            CHAT_COMPLETIONS_PATH,
            post(chat_completions).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors, envelope))
        .layer(TraceLayer::new_for_http())
}

/// Liveness-style endpoint returning a fresh random UUID.
async fn issue_uuid() -> impl IntoResponse {
    Json(serde_json::json!({ "uuid": uuid::Uuid::new_v4() }))
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)
}

fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

/// `POST /` with `{text, to?, mode?}`.
///
/// `to` and `mode` are handed to the engine as given; unknown values surface as a
/// conversion failure rather than a validation error.
async fn convert(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ConvertResponse>, ApiError> {
    let payload = parse_body(&body)?;
    let text = str_field(&payload, "text").ok_or(ApiError::TextNotString)?;
    let to = str_field(&payload, "to").unwrap_or(Target::default().as_str());
    let mode = str_field(&payload, "mode").unwrap_or(Mode::default().as_str());
    tracing::debug!(to, mode, chars = text.chars().count(), "convert request");

    let engine = state
        .engine
        .ensure_ready()
        .await
        .map_err(ApiError::Initialization)?;
    let options = ConvertOptions::parse(to, mode).map_err(ApiError::Conversion)?;
    let converted = engine
        .convert(text, &options)
        .await
        .map_err(ApiError::Conversion)?;

    Ok(Json(ConvertResponse { converted }))
}

/// Content of the final message, which must come from the user.
/// Earlier messages are accepted and ignored.
fn last_user_content(messages: &[Value]) -> Result<&str, ApiError> {
    let last = messages.last().ok_or(ApiError::InvalidFormat)?;
    if str_field(last, "role") != Some("user") {
        return Err(ApiError::InvalidMessage(
            "The last message must have role \"user\"",
        ));
    }
    str_field(last, "content").ok_or(ApiError::InvalidMessage(
        "The last message content must be a string",
    ))
}

/// OpenAI-compatible `POST /v1/chat/completions`.
/// - Non-streaming: a single `chat.completion` object
/// - Streaming (`"stream": true`): one SSE chunk per converted character, then a stop chunk
async fn chat_completions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = parse_body(&body)?;
    let messages = payload
        .get("messages")
        .and_then(Value::as_array)
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::InvalidFormat)?;
    let prompt = last_user_content(messages)?;

    let raw_model = str_field(&payload, "model");
    let (to, mode) = model_string::parse(raw_model, str_field(&payload, "mode"));
    let stream = matches!(payload.get("stream"), Some(Value::Bool(true)));
    tracing::debug!(%to, %mode, stream, messages = messages.len(), "chat completion request");

    let engine = state
        .engine
        .ensure_ready()
        .await
        .map_err(ApiError::Initialization)?;
    let converted = engine
        .convert(prompt, &ConvertOptions::new(to, mode))
        .await
        .map_err(ApiError::Conversion)?;

    let model = raw_model.unwrap_or(to.as_str()).to_string();
    if stream {
        return Ok(sse_response(completion_stream(
            model,
            converted,
            state.stream_delay,
        )));
    }
    let completion = ChatCompletionResponse::new(model, prompt, converted, current_timestamp());
    Ok(Json(completion).into_response())
}

/// Frame one chunk as a server-sent event: `data: <json>\n\n`.
fn sse_frame<T: Serialize>(chunk: &T) -> Bytes {
    let json = serde_json::to_string(chunk).unwrap_or_default();
    Bytes::from(format!("data: {json}\n\n"))
}

/// Replay an already converted string as chat-completion chunks, one character per
/// event with `delay` between characters, followed by the terminal stop chunk.
pub fn completion_stream(
    model: String,
    converted: String,
    delay: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let model: Arc<str> = model.into();
    let stop_model = Arc::clone(&model);
    let chars: Vec<char> = converted.chars().collect();

    let content = stream::iter(chars.into_iter().enumerate()).then(move |(i, c)| {
        let model = Arc::clone(&model);
        async move {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let chunk = ChatCompletionChunk::content(&model, c.to_string(), current_timestamp());
            Ok::<_, Infallible>(sse_frame(&chunk))
        }
    });
    let stop = stream::once(async move {
        let chunk = ChatCompletionChunk::stop(&stop_model, current_timestamp());
        Ok::<_, Infallible>(sse_frame(&chunk))
    });

    content.chain(stop)
}

fn sse_response<S>(stream: S) -> Response
where
    S: Stream<Item = Result<Bytes, Infallible>> + Send + 'static,
{
    let mut resp = Response::new(Body::from_stream(stream));
    *resp.status_mut() = StatusCode::OK;
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    resp
}
