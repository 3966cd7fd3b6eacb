//! Layered advisor settings
//!
//! Built-in defaults, then an optional settings file, then `ADVISOR__*`
//! environment variables (e.g. `ADVISOR__LLM__MODEL=gpt-4o`).

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::constants;
use crate::keywords::KeywordTables;
use crate::prompts::{ResponseTemplates, SystemPrompt};
use crate::scoring::ScoringWeights;

/// Settings errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(String),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

impl From<ConfigError> for advisor_core::AdvisorError {
    fn from(err: ConfigError) -> Self {
        advisor_core::AdvisorError::Config(err.to_string())
    }
}

/// HTTP host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: constants::endpoints::SERVER_HOST.to_string(),
            port: constants::endpoints::SERVER_PORT,
            json_logs: false,
        }
    }
}

/// Dialogue timing and ranking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// Pause before a local reply
    pub thinking_delay_ms: u64,
    /// Gap between scripted demo turns
    pub demo_turn_gap_ms: u64,
    /// Maximum product cards per recommendation
    pub max_recommendations: usize,
    pub rule_based_weights: ScoringWeights,
    pub llm_fallback_weights: ScoringWeights,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            thinking_delay_ms: constants::dialogue::THINKING_DELAY_MS,
            demo_turn_gap_ms: constants::dialogue::DEMO_TURN_GAP_MS,
            max_recommendations: constants::dialogue::MAX_RECOMMENDATIONS,
            rule_based_weights: ScoringWeights::RULE_BASED,
            llm_fallback_weights: ScoringWeights::LLM_FALLBACK,
        }
    }
}

impl DialogueSettings {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    pub fn demo_turn_gap(&self) -> Duration {
        Duration::from_millis(self.demo_turn_gap_ms)
    }

    /// Same settings with every delay set to zero
    pub fn without_delays(mut self) -> Self {
        self.thinking_delay_ms = 0;
        self.demo_turn_gap_ms = 0;
        self
    }
}

/// External language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout; unset waits for the API indefinitely
    pub timeout_secs: Option<u64>,
    /// Falls back to `OPENAI_API_KEY` when unset
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub system_prompt: SystemPrompt,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: constants::endpoints::OPENAI_DEFAULT.to_string(),
            model: constants::llm::DEFAULT_MODEL.to_string(),
            temperature: constants::llm::DEFAULT_TEMPERATURE,
            max_tokens: constants::llm::DEFAULT_MAX_TOKENS,
            timeout_secs: None,
            api_key: None,
            system_prompt: SystemPrompt::default(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Configured key, or the `OPENAI_API_KEY` environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(constants::llm::API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// All advisor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSettings {
    pub server: ServerSettings,
    pub dialogue: DialogueSettings,
    pub llm: LlmSettings,
    pub keywords: KeywordTables,
    pub templates: ResponseTemplates,
    /// YAML or TOML file replacing the built-in catalog
    pub catalog_file: Option<String>,
    pub catalog: Catalog,
}

impl AdvisorSettings {
    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keywords.validate().map_err(ConfigError::Invalid)?;
        Catalog::new(self.catalog.products().to_vec()).map_err(ConfigError::Invalid)?;

        if self.dialogue.max_recommendations == 0 {
            return Err(ConfigError::Invalid(
                "dialogue.max_recommendations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature {} outside [0, 2]",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

/// Load settings
///
/// With `path` set, that file must exist. Without it, `config/advisor.*` is
/// read when present. Environment variables override either.
pub fn load_settings(path: Option<&Path>) -> Result<AdvisorSettings, ConfigError> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(constants::files::DEFAULT_SETTINGS).required(false),
    };

    let mut settings: AdvisorSettings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(constants::files::ENV_PREFIX)
                .prefix_separator(constants::files::ENV_SEPARATOR)
                .separator(constants::files::ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    if let Some(catalog_file) = settings.catalog_file.as_deref() {
        settings.catalog = Catalog::from_file(catalog_file).map_err(ConfigError::Invalid)?;
    }

    settings.validate()?;

    tracing::debug!(
        model = %settings.llm.model,
        products = settings.catalog.len(),
        thinking_delay_ms = settings.dialogue.thinking_delay_ms,
        "Settings loaded"
    );

    Ok(settings)
}
