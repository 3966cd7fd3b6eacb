//! Configuration management for the product advisor
//!
//! Settings are layered:
//! 1. Built-in defaults (every section has a `Default`)
//! 2. Optional settings file (`config/advisor.toml` or `.yaml`)
//! 3. `ADVISOR__*` environment variables
//!
//! The keyword tables, reply templates and catalog are plain data here so the
//! agent crate stays free of literals.

pub mod catalog;
pub mod constants;
pub mod keywords;
pub mod prompts;
pub mod scoring;
pub mod settings;

pub use catalog::Catalog;
pub use keywords::{CategoryKeywords, FeedbackKeywords, KeywordTables, PreferenceKeywords, PreferenceTable};
pub use prompts::{render, ResponseTemplates, SystemPrompt};
pub use scoring::ScoringWeights;
pub use settings::{
    load_settings, AdvisorSettings, ConfigError, DialogueSettings, LlmSettings, ServerSettings,
};
