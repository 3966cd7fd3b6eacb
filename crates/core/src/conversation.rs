//! Conversation state and transcript types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::product::{Budget, Category, Product};

/// Dialogue stage
///
/// Exactly one stage is active per session. The happy path runs
/// `Initial → Budget → Preferences → Recommendation → Feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Initial,
    Budget,
    Preferences,
    Recommendation,
    Feedback,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Initial => "initial",
            Stage::Budget => "budget",
            Stage::Preferences => "preferences",
            Stage::Recommendation => "recommendation",
            Stage::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated slots plus the active stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub category: Option<Category>,
    pub budget: Option<Budget>,
    /// Detection order; duplicates across turns are kept
    pub preferences: Vec<String>,
    pub stage: Stage,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every slot and move to `stage`
    pub fn cleared(stage: Stage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    /// Inline JSON used in the LLM system message
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Product cards; at most three
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Product>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            recommendations: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            recommendations: None,
            timestamp: Utc::now(),
        }
    }

    /// Empty-content assistant message carrying product cards
    pub fn recommendations(products: Vec<Product>) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            recommendations: Some(products),
            timestamp: Utc::now(),
        }
    }

    pub fn is_recommendation(&self) -> bool {
        self.recommendations.is_some()
    }
}

/// Append-only chat log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with an assistant greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended at or after `index`
    pub fn since(&self, index: usize) -> &[Message] {
        &self.messages[index.min(self.messages.len())..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
