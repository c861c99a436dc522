// Router, CORS envelope, and plain `POST /` conversion, driven in-process.

#[path = "common/stub_engine.rs"]
mod stub_engine;

use axum::http::{header, StatusCode};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stub_engine::{app, app_with, post_json, request, send, BrokenLoader, FlakyLoader, ORIGIN};

#[tokio::test]
async fn get_root_returns_fresh_uuids() {
    let first = send(app(), request("GET", "/", None, None)).await;
    let second = send(app(), request("GET", "/", None, None)).await;
    assert_eq!(first.status, StatusCode::OK);

    let a = first.json()["uuid"].as_str().unwrap().to_string();
    let b = second.json()["uuid"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&a).is_ok());
    assert!(uuid::Uuid::parse_str(&b).is_ok());
    assert_ne!(a, b);
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers_on_every_branch() {
    for (method, uri) in [("GET", "/"), ("GET", "/nope"), ("GET", "/v1/chat/completions")] {
        let resp = send(app(), request(method, uri, Some(ORIGIN), None)).await;
        assert_eq!(resp.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN, "{uri}");
        assert_eq!(resp.headers[header::VARY], "Origin");
    }
}

#[tokio::test]
async fn other_origins_are_answered_without_cors_headers() {
    let resp = send(app(), request("GET", "/", Some("https://evil.example"), None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn preflight_from_allowed_origin() {
    let resp = send(app(), request("OPTIONS", "/v1/chat/completions", Some(ORIGIN), None)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.body.is_empty());
    assert_eq!(
        resp.headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, OPTIONS"
    );
    assert_eq!(resp.headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
}

#[tokio::test]
async fn preflight_from_other_origin_is_forbidden() {
    for uri in ["/", "/anything/else"] {
        let resp = send(app(), request("OPTIONS", uri, Some("https://evil.example"), None)).await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert!(resp.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(resp.headers.get(header::VARY).is_none());
    }
    let resp = send(app(), request("OPTIONS", "/", None, None)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn chat_endpoint_rejects_other_methods() {
    for method in ["GET", "PUT", "DELETE"] {
        let resp = send(app(), request(method, "/v1/chat/completions", Some(ORIGIN), None)).await;
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(resp.json()["error"], "Method Not Allowed");
    }
}

#[tokio::test]
async fn unknown_routes_list_supported_ones() {
    let resp = send(app(), request("GET", "/nope", None, None)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    let body = resp.json();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(
        body["routes"],
        json!(["GET /", "POST /", "POST /v1/chat/completions"])
    );

    // only GET and POST are routed on "/"
    for method in ["DELETE", "HEAD", "PUT"] {
        let resp = send(app(), request(method, "/", None, None)).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{method} /");
    }
}

#[tokio::test]
async fn plain_convert_defaults_to_hiragana_normal() {
    let resp = send(app(), post_json("/", &json!({"text": "日本語をベンキョウ"}))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json(), json!({"converted": "にほんごをべんきょう"}));
}

#[tokio::test]
async fn plain_convert_honors_target_and_mode() {
    let body = json!({"text": "東京で日本語", "to": "romaji", "mode": "spaced"});
    let resp = send(app(), post_json("/", &body)).await;
    assert_eq!(resp.json()["converted"], "toukyou de nihongo");

    let body = json!({"text": "東京で", "to": "hiragana", "mode": "furigana"});
    let resp = send(app(), post_json("/", &body)).await;
    assert_eq!(
        resp.json()["converted"],
        "<ruby>東京<rp>(</rp><rt>とうきょう</rt><rp>)</rp></ruby>で"
    );
}

#[tokio::test]
async fn plain_convert_validation_order() {
    let resp = send(app(), request("POST", "/", Some(ORIGIN), Some("{not json".into()))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({"error": "Invalid JSON body"}));

    let resp = send(app(), post_json("/", &json!({"text": 42}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), json!({"error": "`text` must be a string"}));

    // the engine, not the handler, rejects unknown options
    let resp = send(app(), post_json("/", &json!({"text": "かな", "to": "cyrillic"}))).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.json();
    assert_eq!(body["error"], "Conversion failed");
    assert!(body["detail"].as_str().unwrap().contains("cyrillic"));
}

#[tokio::test]
async fn initialization_failure_is_retried_on_next_request() {
    let loader = Arc::new(FlakyLoader::new(1));
    let router = app_with(loader.clone());

    let resp = send(router.clone(), post_json("/", &json!({"text": "かな"}))).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.json(),
        json!({"error": "Initialization failed", "detail": "dictionary fetch failed: dictionary offline"})
    );
    // error responses keep the CORS envelope
    assert_eq!(resp.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);

    let resp = send(router.clone(), post_json("/", &json!({"text": "かな", "to": "katakana"}))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["converted"], "カナ");

    send(router, post_json("/", &json!({"text": "かな"}))).await;
    assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn conversion_failure_reports_detail() {
    let resp = send(
        app_with(Arc::new(BrokenLoader)),
        post_json("/", &json!({"text": "かな"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.json(),
        json!({"error": "Conversion failed", "detail": "conversion failed: analyzer crashed"})
    );
}
