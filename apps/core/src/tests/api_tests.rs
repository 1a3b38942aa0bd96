//! HTTP API Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use crate::api::{self, AppState};
use crate::brain::dispatcher::{DEFAULT_REPLY, DEFAULT_TRIGGERS};
use crate::brain::{ResponseDispatcher, SentimentAnalyzer};
use crate::database::RecordStore;
use crate::error::{AppError, GENERIC_ERROR_MESSAGE};
use crate::models::{Label, TextSample};
use async_trait::async_trait;
use crate::tests::database_tests::create_test_store;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

struct TestApp {
    router: Router,
    store: Arc<dyn RecordStore>,
    _dir: TempDir,
}

async fn test_app_with(analyzer: SentimentAnalyzer) -> TestApp {
    let (store, dir) = create_test_store(5).await;
    let store: Arc<dyn RecordStore> = Arc::new(store);
    let state = AppState::new(analyzer, ResponseDispatcher::default(), store.clone());
    TestApp {
        router: api::router(state),
        store,
        _dir: dir,
    }
}

async fn test_app() -> TestApp {
    test_app_with(SentimentAnalyzer::default()).await
}

/// Store whose appends panic, standing in for an unexpected bug under a handler.
struct PanickingStore;

#[async_trait]
impl RecordStore for PanickingStore {
    async fn append(&self, _text: &str, _label: Label, _score: f64) -> Result<TextSample, AppError> {
        panic!("record store exploded");
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(0)
    }
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn reply_for(trigger: &str) -> &'static str {
    DEFAULT_TRIGGERS
        .iter()
        .find(|(t, _)| *t == trigger)
        .map(|(_, r)| *r)
        .unwrap()
}

// ============================================================================
// /health
// ============================================================================

#[cfg(test)]
mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_ok() {
        let app = test_app().await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(&app.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}

// ============================================================================
// /analyze
// ============================================================================

#[cfg(test)]
mod analyze_tests {
    use super::*;
    use crate::brain::UnavailableClassifier;

    #[tokio::test]
    async fn test_negative_text_is_classified_and_stored() {
        let app = test_app().await;
        let before = app.store.count().await.unwrap();

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/analyze", json!({ "text": "мне плохо и грустно" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "NEGATIVE");
        let score = body["score"].as_f64().unwrap();
        assert!((0.5..1.0).contains(&score), "score {}", score);
        assert_eq!(app.store.count().await.unwrap(), before + 1);
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_write() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/analyze", json!({ "text": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("text"));
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_or_missing_text_rejected() {
        let app = test_app().await;

        for payload in [json!({ "text": "   " }), json!({}), json!({ "text": null })] {
            let (status, _) =
                send(&app.router, json_request(Method::POST, "/analyze", payload.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        }
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_body_rejected() {
        let app = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/analyze")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app.router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let app = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"text\": "))
            .unwrap();

        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_neutral_text_stored() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/analyze", json!({ "text": "обычный день" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "NEUTRAL");
        let score = body["score"].as_f64().unwrap();
        assert!((0.3..0.7).contains(&score), "score {}", score);
        assert_eq!(app.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_classifier_degrades_to_neutral() {
        let app = test_app_with(SentimentAnalyzer::new(UnavailableClassifier::new("down"))).await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/analyze", json!({ "text": "мне плохо и грустно" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "label": "NEUTRAL", "score": 0.5 }));
        assert_eq!(app.store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let app = test_app().await;
        app.store.close().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/analyze", json!({ "text": "всё хорошо" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }));
    }

    #[tokio::test]
    async fn test_handler_panic_is_generic_500() {
        let state = AppState::new(
            SentimentAnalyzer::default(),
            ResponseDispatcher::default(),
            Arc::new(PanickingStore),
        );
        let router = api::router(state);

        let (status, body) = send(
            &router,
            json_request(Method::POST, "/analyze", json!({ "text": "hello" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }));

        // The router keeps serving after a panic.
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}

// ============================================================================
// /chat
// ============================================================================

#[cfg(test)]
mod chat_tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reply() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/chat", json!({ "message": "мне очень грустно сегодня" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": reply_for("грустно") }));
    }

    #[tokio::test]
    async fn test_default_reply_and_no_storage() {
        let app = test_app().await;

        for _ in 0..2 {
            let (status, body) = send(
                &app.router,
                json_request(Method::POST, "/chat", json!({ "message": "привет" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["response"], DEFAULT_REPLY);
        }
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_message_gets_default_reply() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/chat", json!({ "message": "" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_missing_message_rejected() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            json_request(Method::POST, "/chat", json!({ "text": "грустно" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("message"));
    }

    #[tokio::test]
    async fn test_missing_body_rejected() {
        let app = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
