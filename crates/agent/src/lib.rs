//! Product recommendation dialogue
//!
//! Slot extraction, stage tracking, catalog ranking and reply composition
//! for the product advisor, plus the scripted demo flows.

pub mod advisor;
pub mod composer;
pub mod demo;
pub mod dst;
pub mod recommend;

pub use advisor::{AdvisorContext, ProductAdvisor, ResponseMode, TurnOutcome};
pub use composer::{LlmComposer, Reply, ReplySource, ResponseComposer, TurnEvent};
pub use demo::{run_demo, DemoFlow};
pub use dst::{ChangeReason, DialogueStateTracker, SlotExtractor, SlotOutcome, StageChange};
pub use recommend::{recommend, Criteria};
