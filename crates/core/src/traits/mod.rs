//! Core traits
//!
//! The advisor talks to external text generation only through these seams.

mod llm;

pub use llm::{ChatMessage, ChatRequest, LanguageModel, LlmError};
