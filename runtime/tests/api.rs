//! End-to-end tests for the REST API.
//!
//! The inference API is a wiremock server and the browser is a stub, so
//! these run without network access or Chromium.

use anyhow::{bail, Result};
use assert_json_diff::assert_json_eq;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use slant_runtime::analyze::Analyzer;
use slant_runtime::config::Config;
use slant_runtime::renderer::{RenderContext, Renderer};
use slant_runtime::rest::{router, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─────────────────────── helpers ───────────────────────

const LABELS: [&str; 2] = ["Factual and Objective", "Opinion and Bias"];

/// Stub browser: serves fixed text, or fails at navigation.
struct StubRenderer {
    page_text: Option<&'static str>,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

struct StubContext {
    page_text: Option<&'static str>,
    closed: Arc<AtomicUsize>,
}

impl StubRenderer {
    fn serving(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            page_text: Some(text),
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            page_text: None,
            opened: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for StubRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubContext {
            page_text: self.page_text,
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[async_trait]
impl RenderContext for StubContext {
    async fn navigate(&mut self, _url: &str, timeout: Duration) -> Result<()> {
        if self.page_text.is_none() {
            bail!("navigation timed out after {}ms", timeout.as_millis());
        }
        Ok(())
    }

    async fn wait_visible(&self, _selector: &str, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn inner_text(&self, _selector: &str) -> Result<String> {
        Ok(self.page_text.unwrap_or_default().to_string())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn test_config(server: &MockServer) -> Config {
    Config {
        api_token: "test-token".into(),
        inference_url: format!("{}/models/bart", server.uri()),
        ..Config::default()
    }
}

fn app(config: &Config, renderer: Arc<dyn Renderer>) -> Router {
    router(AppState::new(Analyzer::new(config, renderer)))
}

/// Inference mock expecting `inputs` and answering with `response`.
fn inference_mock(inputs: &str, response: Value) -> Mock {
    Mock::given(method("POST"))
        .and(path("/models/bart"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "inputs": inputs,
            "parameters": { "candidate_labels": LABELS }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
}

fn flat_response() -> Value {
    json!([
        { "label": "Factual and Objective", "score": 0.83 },
        { "label": "Opinion and Bias", "score": 0.17 }
    ])
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// ─────────────────────── direct text ───────────────────────

#[tokio::test]
async fn test_short_text_is_classified() {
    let server = MockServer::start().await;
    inference_mock("short sample", flat_response())
        .expect(1)
        .mount(&server)
        .await;

    let renderer = StubRenderer::serving("unused");
    let app = app(&test_config(&server), renderer.clone());
    let (status, body) = post(app, "/analyze", r#"{"text":"short sample"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_json_eq!(
        result,
        json!({
            "sequence": "short sample",
            "labels": ["Factual and Objective", "Opinion and Bias"],
            "scores": [0.83, 0.17]
        })
    );
    let labels = result["labels"].as_array().unwrap();
    let scores = result["scores"].as_array().unwrap();
    assert!(!labels.is_empty());
    assert_eq!(labels.len(), scores.len());

    assert_eq!(renderer.opened(), 0, "text input must never scrape");
}

#[tokio::test]
async fn test_text_takes_precedence_over_url() {
    let server = MockServer::start().await;
    inference_mock("inline", flat_response())
        .expect(1)
        .mount(&server)
        .await;

    let renderer = StubRenderer::serving("scraped");
    let app = app(&test_config(&server), renderer.clone());
    let (status, _) = post(
        app,
        "/analyze",
        r#"{"url":"http://example.com","text":"inline"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(renderer.opened(), 0);
}

#[tokio::test]
async fn test_long_text_truncated_to_2000() {
    let text: String = "The council voted. ".repeat(200).chars().take(2500).collect();
    assert_eq!(text.len(), 2500);

    let server = MockServer::start().await;
    inference_mock(&text[..2000], flat_response())
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let body = json!({ "text": text }).to_string();
    let (status, body) = post(app, "/analyze", &body).await;

    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["sequence"].as_str().unwrap(), &text[..2000]);
}

// ─────────────────────── scraping ───────────────────────

#[tokio::test]
async fn test_url_is_scraped_then_classified() {
    let server = MockServer::start().await;
    inference_mock("Scraped article body.", flat_response())
        .expect(1)
        .mount(&server)
        .await;

    let renderer = StubRenderer::serving("Scraped article body.");
    let app = app(&test_config(&server), renderer.clone());
    let (status, body) = post(app, "/scrape", r#"{"url":"http://example.com/story"}"#).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(renderer.opened(), 1);
    assert_eq!(renderer.closed(), 1);
}

#[tokio::test]
async fn test_scrape_timeout_is_500_without_classifying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(flat_response()))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = StubRenderer::timing_out();
    let app = app(&test_config(&server), renderer.clone());
    let (status, body) = post(app, "/analyze", r#"{"url":"http://example.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to scrape the page");
    assert_eq!(renderer.closed(), 1, "session must be released on failure");
}

// ─────────────────────── input errors ───────────────────────

#[tokio::test]
async fn test_empty_object_is_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = StubRenderer::serving("unused");
    let (status, body) = post(app(&test_config(&server), renderer.clone()), "/analyze", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Please provide either a URL or Text");

    let (status, _) = post(
        app(&test_config(&server), renderer.clone()),
        "/analyze",
        r#"{"url":"","text":""}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(renderer.opened(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let server = MockServer::start().await;
    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let (status, body) = post(app, "/analyze", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid request body");
}

#[tokio::test]
async fn test_body_accepted_without_json_content_type() {
    let server = MockServer::start().await;
    inference_mock("plain", flat_response())
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"text":"plain"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ─────────────────────── upstream errors ───────────────────────

#[tokio::test]
async fn test_upstream_error_envelope_is_500() {
    let server = MockServer::start().await;
    inference_mock("short sample", json!({ "error": "rate limited" }))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let (status, body) = post(app, "/analyze", r#"{"text":"short sample"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to analyze the text");
    assert!(!body.contains("labels"));
}

#[tokio::test]
async fn test_unparseable_upstream_body_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/bart"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let (status, _) = post(app, "/analyze", r#"{"text":"x"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_direct_object_response_passes_through() {
    let server = MockServer::start().await;
    let direct = json!({
        "sequence": "echoed by api",
        "labels": ["Opinion and Bias", "Factual and Objective"],
        "scores": [0.6, 0.4]
    });
    inference_mock("x", direct.clone())
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let (status, body) = post(app, "/analyze", r#"{"text":"x"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(serde_json::from_str::<Value>(&body).unwrap(), direct);
}

#[tokio::test]
async fn test_unreachable_inference_api_is_500() {
    let config = Config {
        inference_url: "http://127.0.0.1:1/models/bart".into(),
        ..Config::default()
    };
    let app = app(&config, StubRenderer::serving("unused"));
    let (status, body) = post(app, "/analyze", r#"{"text":"x"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to analyze the text");
}

// ─────────────────────── surface ───────────────────────

#[tokio::test]
async fn test_cors_preflight_allows_post_from_any_origin() {
    let server = MockServer::start().await;
    let app = app(&test_config(&server), StubRenderer::serving("unused"));
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/analyze")
        .header("origin", "https://reader.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(!methods.contains("GET"));
}

#[tokio::test]
async fn test_health_reports_browser_availability() {
    let server = MockServer::start().await;
    let app = app(
        &test_config(&server),
        Arc::new(slant_runtime::renderer::NoopRenderer),
    );
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["chromium_available"], false);
}
