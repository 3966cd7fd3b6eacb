//! Integration tests for the advisor HTTP surface

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use advisor_agent::AdvisorContext;
use advisor_config::{AdvisorSettings, DialogueSettings};
use advisor_core::{ChatRequest, LanguageModel, LlmError};
use advisor_server::{router, AppState};

struct Unreachable;

#[async_trait]
impl LanguageModel for Unreachable {
    fn model_name(&self) -> &str {
        "unreachable"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<String, LlmError> {
        Err(LlmError::Network("connection refused".to_string()))
    }
}

fn app_state() -> AppState {
    let settings = AdvisorSettings {
        dialogue: DialogueSettings::default().without_delays(),
        ..AdvisorSettings::default()
    };
    AppState::new(
        Arc::new(AdvisorContext::from_settings(&settings)),
        Arc::new(Unreachable),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn new_session(app: &Router, mode: &str) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", Some(json!({ "mode": mode }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = router(app_state());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_session_returns_greeting() {
    let app = router(app_state());
    let (status, body) = send(&app, "POST", "/api/sessions", Some(json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mode"], "rule_based");
    assert_eq!(body["stage"], "initial");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "assistant");
}

#[tokio::test]
async fn test_message_flow() {
    let app = router(app_state());
    let id = new_session(&app, "rule_based").await;
    let uri = format!("/api/sessions/{}/messages", id);

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "content": "I want wireless headphones" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["category"], "headphones");
    assert_eq!(body["state"]["stage"], "budget");
    assert_eq!(body["source"]["kind"], "template");

    send(&app, "POST", &uri, Some(json!({ "content": "Under $200 please" }))).await;
    let (_, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "content": "Noise cancellation would be nice for my commute" })),
    )
    .await;

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["content"], "");
    assert_eq!(messages[2]["recommendations"][0]["name"], "BassBoost 700");
    assert!(messages[2]["recommendations"][0]["idealFor"].is_array());
    assert_eq!(body["state"]["stage"], "feedback");

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1 + 3 * 2 + 1);
}

#[tokio::test]
async fn test_blank_message_rejected() {
    let app = router(app_state());
    let id = new_session(&app, "rule_based").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_MESSAGE");
}

#[tokio::test]
async fn test_unknown_session() {
    let app = router(app_state());
    let (status, body) = send(&app, "GET", "/api/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_llm_session_falls_back() {
    let app = router(app_state());
    let id = new_session(&app, "llm").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "content": "I need a laptop" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"]["kind"], "fallback");
    assert_eq!(body["state"]["stage"], "budget");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .starts_with("I'm sorry, I'm having trouble connecting"));
}

#[tokio::test]
async fn test_demo_trigger() {
    let app = router(app_state());
    let id = new_session(&app, "rule_based").await;

    let (status, _) = send(&app, "POST", &format!("/api/sessions/{}/demo/tablet", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/demo/phone", id), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["flow"], "phone");

    let mut stage = Value::Null;
    for _ in 0..100 {
        let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        stage = body["stage"].clone();
        if stage == "feedback" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(stage, "feedback");
}

#[tokio::test]
async fn test_reset_session() {
    let app = router(app_state());
    let id = new_session(&app, "rule_based").await;
    send(
        &app,
        "POST",
        &format!("/api/sessions/{}/messages", id),
        Some(json!({ "content": "a smartphone" })),
    )
    .await;

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "initial");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_session_frees_registry() {
    let state = app_state();
    let app = router(state.clone());

    let ids = [
        new_session(&app, "rule_based").await,
        new_session(&app, "rule_based").await,
        new_session(&app, "llm").await,
    ];
    assert_eq!(state.sessions.len(), 3);

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(state.sessions.len(), 2);

    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &format!("/api/sessions/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");

    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", ids[1]), None).await;
    assert_eq!(status, StatusCode::OK);
}
