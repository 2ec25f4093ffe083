// REST API Tests
//
// Serves the router on an ephemeral port with scripted providers and checks
// response shapes, status mapping, rate limiting and the discovery endpoints.

#[path = "../support/mod.rs"]
mod support;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use studio_core::config::{RateLimitSettings, RoutingConfig, ServerSettings};
use studio_core::server::{self, TaskResponse};
use studio_core::{ProviderRouter, TaskKind};
use support::{Calls, Script, called, profile, router_with, text_caps};
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    http: Client,
}

impl TestServer {
    async fn start(router: ProviderRouter, rate_limit: RateLimitSettings) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        let settings = ServerSettings {
            bind: addr,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            rate_limit,
        };
        tokio::spawn(async move {
            let _ = server::serve_with_shutdown(
                Arc::new(router),
                &settings,
                listener,
                std::future::pending(),
            )
            .await;
        });
        Self {
            base: format!("http://{addr}"),
            http: Client::new(),
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.http
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .expect("request")
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.http
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .expect("request")
    }
}

fn generous() -> RateLimitSettings {
    RateLimitSettings {
        requests: 1_000,
        window: Duration::from_secs(60),
    }
}

async fn text_server(script: Script) -> (TestServer, Calls) {
    let (router, calls) = router_with(
        vec![(profile("gemini", &text_caps(), 10), Some(script))],
        RoutingConfig::default(),
    );
    (TestServer::start(router, generous()).await, calls)
}

#[tokio::test]
async fn health_endpoints_report_service() {
    let (server, _calls) = text_server(Script::Reply("unused")).await;
    for path in ["/", "/health"] {
        let response = server.get(path).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("json");
        assert_eq!(body["status"], "healthy");
        assert!(body["service"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn successful_task_returns_normalized_shape() {
    let (server, calls) = text_server(Script::Reply("Five ideas")).await;

    let response = server
        .post("/api/generate-ideas", json!({ "topic": "cozy farming games" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-ratelimit-limit"));
    assert!(response.headers().contains_key("x-ratelimit-remaining"));

    let body: TaskResponse = response.json().await.expect("json");
    assert_eq!(body.output, "Five ideas");
    assert_eq!(body.provider, "gemini");
    assert_eq!(body.model_used, "gemini-model");
    assert_eq!(body.attempts, 1);
    assert_eq!(called(&calls), vec!["gemini"]);
}

#[tokio::test]
async fn validation_failure_is_400_without_upstream_call() {
    let (server, calls) = text_server(Script::Reply("unused")).await;

    let response = server.post("/api/chat", json!({ "message": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("message")));
    assert!(called(&calls).is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (server, calls) = text_server(Script::Reply("unused")).await;

    let response = server
        .http
        .post(format!("{}/api/summarize", server.base))
        .header("content-type", "application/json")
        .body("{\"text\": ")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["error"], "Invalid request data.");
    assert!(called(&calls).is_empty());
}

#[tokio::test]
async fn missing_image_provider_is_503() {
    let (server, _calls) = text_server(Script::Reply("unused")).await;

    let response = server
        .post("/api/generate-image", json!({ "prompt": "a castle" }))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn exhausted_upstreams_are_500_without_leaking_details() {
    let (server, _calls) = text_server(Script::Status(502)).await;

    let response = server.post("/api/summarize", json!({ "text": "article" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json");
    let message = body["error"].as_str().expect("error message");
    assert!(!message.contains("scripted failure"));
    assert!(!message.contains("gemini"));
}

#[tokio::test]
async fn upstream_rejection_is_400() {
    let (server, _calls) = text_server(Script::Status(422)).await;

    let response = server.post("/api/chat", json!({ "message": "hello" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_timeout_is_504() {
    let mut slow = profile("gemini", &text_caps(), 10);
    slow.timeout = Some(Duration::from_millis(200));
    let (router, _calls) = router_with(
        vec![(slow, Some(Script::Hang(Duration::from_secs(5))))],
        RoutingConfig::default(),
    );
    let server = TestServer::start(router, generous()).await;

    let response = server.post("/api/chat", json!({ "message": "hello" })).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn gamedev_routes_resolve_by_kind() {
    let (server, calls) = text_server(Script::Reply("Once upon a quest")).await;

    let response = server
        .post("/api/gamedev/story", json!({ "prompt": "a sunken city" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: TaskResponse = response.json().await.expect("json");
    assert_eq!(body.output, "Once upon a quest");

    let response = server
        .post("/api/gamedev/soundtrack", json!({ "prompt": "a sunken city" }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(called(&calls).len(), 1);
}

#[tokio::test]
async fn chat_stream_sends_chunks_then_done() {
    let (server, calls) = text_server(Script::Reply("Hello there")).await;

    let response = server
        .post("/api/chat/stream", json!({ "message": "hello" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().expect("header");
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(response.headers()["x-accel-buffering"], "no");

    let body = response.text().await.expect("body");
    let frames: Vec<Value> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).expect("frame"))
        .collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["chunk"], "Hello there");
    assert_eq!(frames[1]["done"], true);
    assert_eq!(frames[1]["provider"], "gemini");
    assert_eq!(frames[1]["model_used"], "gemini-model");
    assert_eq!(frames[1]["attempts"], 1);
    assert_eq!(called(&calls), vec!["gemini"]);
}

#[tokio::test]
async fn stream_validation_failure_is_plain_json_400() {
    let (server, calls) = text_server(Script::Reply("unused")).await;

    let response = server
        .post("/api/gamedev/code/stream", json!({ "prompt": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].is_string());
    assert!(called(&calls).is_empty());
}

#[tokio::test]
async fn stream_with_exhausted_upstreams_is_500() {
    let (server, _calls) = text_server(Script::Status(503)).await;

    let response = server
        .post("/api/summarize/stream", json!({ "text": "article" }))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn rate_limit_rejects_with_headers() {
    let (router, calls) = router_with(
        vec![(profile("gemini", &text_caps(), 10), Some(Script::Reply("ok")))],
        RoutingConfig::default(),
    );
    let limits = RateLimitSettings {
        requests: 2,
        window: Duration::from_secs(60),
    };
    let server = TestServer::start(router, limits).await;

    for remaining in ["1", "0"] {
        let response = server.post("/api/chat", json!({ "message": "hi" })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let response = server.post("/api/chat", json!({ "message": "hi" })).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    assert!(response.headers().contains_key("x-ratelimit-reset"));
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].is_string());
    assert_eq!(called(&calls).len(), 2);

    let health = server.get("/health").await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn provider_catalog_lists_availability() {
    let (router, _calls) = router_with(
        vec![
            (profile("gemini", &text_caps(), 10), Some(Script::Reply("ok"))),
            (profile("grok", &text_caps(), 20), None),
            (profile("art", &[TaskKind::GenerateImage], 5), Some(Script::Reply("url"))),
        ],
        RoutingConfig::default(),
    );
    let server = TestServer::start(router, generous()).await;

    let response = server.get("/api/providers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("json");
    let providers = body["providers"].as_array().expect("providers array");
    assert_eq!(providers.len(), 3);

    let grok = providers
        .iter()
        .find(|p| p["id"] == "grok")
        .expect("grok listed");
    assert_eq!(grok["available"], false);
    assert_eq!(grok["type"], "openai");

    let art = providers.iter().find(|p| p["id"] == "art").expect("art listed");
    assert_eq!(art["available"], true);
    assert_eq!(art["capabilities"], json!(["generate-image"]));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (server, _calls) = text_server(Script::Reply("unused")).await;

    let response = server.get("/api-doc/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc: Value = response.json().await.expect("json");
    assert!(doc["paths"]["/api/chat"].is_object());
    assert!(doc["paths"]["/api/gamedev/{kind}"].is_object());
    assert!(doc["paths"]["/api/chat/stream"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let (server, _calls) = text_server(Script::Reply("unused")).await;

    let response = server
        .http
        .request(reqwest::Method::OPTIONS, format!("{}/api/chat", server.base))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .expect("request");
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
