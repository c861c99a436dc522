#![allow(dead_code)]

//! Engine stubs and request helpers shared by the HTTP tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no socket is bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use kana2chat::cors::CorsPolicy;
use kana2chat::engine::{
    ConvertOptions, DictionaryEngine, EngineError, EngineLoader, ReadingDictionary, Transliterator,
};
use kana2chat::{build_router, AppState};
use tower::ServiceExt;

pub const ORIGIN: &str = "https://kana2chat.pages.dev";

pub fn sample_dictionary() -> ReadingDictionary {
    ReadingDictionary::parse("日本語\tにほんご\n東京\tトウキョウ\n勉強\tべんきょう\n")
}

/// Loads a small in-memory dictionary engine, counting loads.
#[derive(Default)]
pub struct InMemoryLoader {
    pub loads: AtomicUsize,
}

#[async_trait]
impl EngineLoader for InMemoryLoader {
    async fn load(&self) -> Result<Arc<dyn Transliterator>, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(DictionaryEngine::new(sample_dictionary())))
    }
}

/// Fails the first `failures` loads, then behaves like [`InMemoryLoader`].
pub struct FlakyLoader {
    pub failures: usize,
    pub loads: AtomicUsize,
}

impl FlakyLoader {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EngineLoader for FlakyLoader {
    async fn load(&self) -> Result<Arc<dyn Transliterator>, EngineError> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(EngineError::Fetch("dictionary offline".into()));
        }
        Ok(Arc::new(DictionaryEngine::new(sample_dictionary())))
    }
}

struct BrokenEngine;

#[async_trait]
impl Transliterator for BrokenEngine {
    async fn convert(&self, _: &str, _: &ConvertOptions) -> Result<String, EngineError> {
        Err(EngineError::Conversion("analyzer crashed".into()))
    }
}

/// Loads fine, but every conversion fails.
pub struct BrokenLoader;

#[async_trait]
impl EngineLoader for BrokenLoader {
    async fn load(&self) -> Result<Arc<dyn Transliterator>, EngineError> {
        Ok(Arc::new(BrokenEngine))
    }
}

pub fn app_with(loader: Arc<dyn EngineLoader>) -> Router {
    let state = AppState::with_loader(loader, CorsPolicy::new(ORIGIN).expect("valid origin"))
        .with_stream_delay(Duration::ZERO);
    build_router(state)
}

pub fn app() -> Router {
    app_with(Arc::new(InMemoryLoader::default()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn send(app: Router, req: Request<Body>) -> TestResponse {
    let resp = app.oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("readable body");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: &str, uri: &str, origin: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(o) = origin {
        builder = builder.header(header::ORIGIN, o);
    }
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .expect("valid request")
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    request("POST", uri, Some(ORIGIN), Some(body.to_string()))
}
