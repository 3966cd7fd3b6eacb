//! Product advisor HTTP server
//!
//! Usage: `product-advisor [CONFIG_FILE]`
//!
//! Settings come from built-in defaults, then `config/advisor.{toml,yaml}` (or
//! the file given on the command line), then `ADVISOR__*` environment
//! variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use advisor_agent::AdvisorContext;
use advisor_config::load_settings;
use advisor_core::LanguageModel;
use advisor_llm::OpenAiBackend;
use advisor_server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = load_settings(config_path.as_deref()).context("failed to load settings")?;

    init_tracing(settings.server.json_logs);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    if settings.llm.resolve_api_key().is_none() {
        tracing::warn!("No LLM API key configured; llm sessions will use the fallback reply");
    }
    let model: Arc<dyn LanguageModel> =
        Arc::new(OpenAiBackend::from_settings(&settings.llm).context("failed to build LLM client")?);

    let context = Arc::new(AdvisorContext::from_settings(&settings));
    tracing::info!(
        products = context.catalog.len(),
        model = model.model_name(),
        "Advisor context ready"
    );

    let state = AppState::new(context, model).with_metrics(metrics);
    let app = router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "Product advisor listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
