//! LLM integration for generated advisor replies
//!
//! Provides an OpenAI-compatible chat-completions backend behind the
//! [`LanguageModel`] trait from the core crate.

pub mod backend;

pub use advisor_core::{ChatMessage, ChatRequest, LanguageModel, LlmError};
pub use backend::{OpenAiBackend, OpenAiConfig};
