//! Error types shared across the advisor crates

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Advisor errors
///
/// Unparseable slot input is never an error; the dialogue re-prompts instead.
/// These variants cover the few conditions a caller has to deal with.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Utterance is empty")]
    EmptyUtterance,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<crate::traits::LlmError> for AdvisorError {
    fn from(err: crate::traits::LlmError) -> Self {
        AdvisorError::Llm(err.to_string())
    }
}
