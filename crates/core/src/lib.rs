//! Core types and traits for the product advisor
//!
//! This crate provides the foundational types shared by all other crates:
//! - Catalog records (`Product`, `Category`, `Budget`)
//! - Conversation state (`Stage`, `ConversationState`, `Message`)
//! - The language model seam (`LanguageModel`, `ChatRequest`)
//! - Common error types

pub mod conversation;
pub mod error;
pub mod product;
pub mod traits;

pub use conversation::{ConversationState, Message, Role, Stage, Transcript};
pub use error::{AdvisorError, Result};
pub use product::{Budget, Category, Product};
pub use traits::{ChatMessage, ChatRequest, LanguageModel, LlmError};
