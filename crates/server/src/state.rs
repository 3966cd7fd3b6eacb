//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use advisor_agent::{AdvisorContext, ProductAdvisor, ResponseMode};
use advisor_core::LanguageModel;

use crate::error::{ServerError, ServerResult};

/// A session behind its turn lock
pub type SessionHandle = Arc<Mutex<ProductAdvisor>>;

/// Reply variant requested for a new session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    RuleBased,
    Llm,
}

/// State injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AdvisorContext>,
    pub model: Arc<dyn LanguageModel>,
    pub sessions: Arc<DashMap<String, SessionHandle>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(context: Arc<AdvisorContext>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            context,
            model,
            sessions: Arc::new(DashMap::new()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn demo_turn_gap(&self) -> Duration {
        self.context.dialogue.demo_turn_gap()
    }

    /// Register a new session and return its id
    pub fn create_session(&self, mode: SessionMode) -> (String, SessionHandle) {
        let id = Uuid::new_v4().to_string();
        let mode = match mode {
            SessionMode::RuleBased => ResponseMode::RuleBased,
            SessionMode::Llm => ResponseMode::Llm(Arc::clone(&self.model)),
        };

        let handle = Arc::new(Mutex::new(ProductAdvisor::new(
            id.clone(),
            Arc::clone(&self.context),
            mode,
        )));
        self.sessions.insert(id.clone(), Arc::clone(&handle));
        metrics::gauge!("advisor_active_sessions").set(self.sessions.len() as f64);

        (id, handle)
    }

    /// Drop a session from the registry
    ///
    /// A demo still running on it finishes against its own handle.
    pub fn remove_session(&self, id: &str) -> ServerResult<()> {
        self.sessions
            .remove(id)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;
        metrics::gauge!("advisor_active_sessions").set(self.sessions.len() as f64);
        tracing::info!(session_id = %id, "Advisor session removed");
        Ok(())
    }

    pub fn session(&self, id: &str) -> ServerResult<SessionHandle> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }
}
