//! HTTP handlers
//!
//! GET  /health                         - liveness probe
//! GET  /metrics                        - Prometheus text
//! POST /api/sessions                   - start a conversation
//! GET  /api/sessions/:id               - transcript and state
//! DELETE /api/sessions/:id             - end a conversation
//! POST /api/sessions/:id/messages      - process one user message
//! POST /api/sessions/:id/reset         - start over in the same session
//! POST /api/sessions/:id/demo/:flow    - replay a demo script in the background

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use advisor_agent::{run_demo, DemoFlow, ProductAdvisor, TurnOutcome};
use advisor_core::{ConversationState, Message, Stage};

use crate::error::{ServerError, ServerResult};
use crate::state::{AppState, SessionMode};

/// Body of POST /api/sessions
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub mode: SessionMode,
}

/// Body of POST /api/sessions/:id/messages
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

/// Session snapshot
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub mode: &'static str,
    pub stage: Stage,
    pub state: ConversationState,
    pub messages: Vec<Message>,
}

impl SessionView {
    fn of(advisor: &ProductAdvisor) -> Self {
        Self {
            session_id: advisor.session_id().to_string(),
            mode: advisor.mode().label(),
            stage: advisor.stage(),
            state: advisor.state().clone(),
            messages: advisor.transcript().messages().to_vec(),
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed".to_string()),
    }
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let (_, handle) = state.create_session(request.mode);
    let view = SessionView::of(&*handle.lock().await);
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<SessionView>> {
    let handle = state.session(&id)?;
    let advisor = handle.lock().await;
    Ok(Json(SessionView::of(&advisor)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.remove_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> ServerResult<Json<TurnOutcome>> {
    let handle = state.session(&id)?;
    let mut advisor = handle.lock().await;
    let turn = advisor.process(&request.content).await?;
    Ok(Json(turn))
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<SessionView>> {
    let handle = state.session(&id)?;
    let mut advisor = handle.lock().await;
    advisor.restart();
    Ok(Json(SessionView::of(&advisor)))
}

pub async fn start_demo(
    State(state): State<AppState>,
    Path((id, flow)): Path<(String, String)>,
) -> ServerResult<impl IntoResponse> {
    let demo = DemoFlow::parse(&flow)
        .ok_or_else(|| ServerError::InvalidRequest(format!("unknown demo flow '{}'", flow)))?;
    let handle = state.session(&id)?;
    let gap = state.demo_turn_gap();

    tokio::spawn(async move {
        if let Err(e) = run_demo(handle, demo, gap).await {
            tracing::warn!(flow = %demo, error = %e, "Demo run failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "session_id": id,
            "flow": demo,
            "status": "started",
        })),
    ))
}
