//! Dialogue State Tracking for product conversations
//!
//! The tracker owns the single mutable [`ConversationState`] of a session.
//! Extraction and ranking only ever see it by shared reference; every stage
//! or slot change is committed here and recorded in the change history.
//!
//! # Example
//!
//! ```ignore
//! use advisor_agent::dst::{DialogueStateTracker, SlotExtractor};
//!
//! let extractor = SlotExtractor::default();
//! let mut tracker = DialogueStateTracker::new();
//!
//! let outcome = extractor.extract(tracker.stage(), None, "I need a laptop", &catalog);
//! tracker.apply(&outcome);
//! assert_eq!(tracker.stage(), Stage::Budget);
//! ```

pub mod extractor;

pub use extractor::{extract_budget, FeedbackKind, SlotExtractor, SlotOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use advisor_core::{ConversationState, Stage};

/// Why a stage change happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    CategoryDetected,
    BudgetParsed,
    PreferencesCollected,
    RecommendationsShown,
    NoProductsFound,
    NegativeFeedback,
    Reset,
}

/// Record of a committed stage transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageChange {
    pub timestamp: DateTime<Utc>,
    pub from: Stage,
    pub to: Stage,
    pub reason: ChangeReason,
}

/// Dialogue state tracker
#[derive(Debug, Default)]
pub struct DialogueStateTracker {
    state: ConversationState,
    history: Vec<StageChange>,
}

impl DialogueStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn history(&self) -> &[StageChange] {
        &self.history
    }

    /// Merge an extraction outcome and advance the stage
    ///
    /// Failed extractions leave the state untouched so the user can be
    /// re-prompted. Returns the stage after the update.
    pub fn apply(&mut self, outcome: &SlotOutcome) -> Stage {
        match outcome {
            SlotOutcome::CategoryFound(category) => {
                self.state.category = Some(*category);
                self.transition(Stage::Budget, ChangeReason::CategoryDetected);
            }
            SlotOutcome::BudgetFound(budget) => {
                self.state.budget = Some(*budget);
                self.transition(Stage::Preferences, ChangeReason::BudgetParsed);
            }
            SlotOutcome::PreferencesFound(tags) => {
                self.state.preferences.extend(tags.iter().cloned());
                self.transition(Stage::Recommendation, ChangeReason::PreferencesCollected);
            }
            SlotOutcome::PreferencesGeneral => {
                self.state.preferences.push(extractor::general_preference());
                self.transition(Stage::Recommendation, ChangeReason::PreferencesCollected);
            }
            SlotOutcome::FeedbackNegative => {
                self.clear_into(Stage::Initial, ChangeReason::NegativeFeedback);
            }
            SlotOutcome::CategoryMissing
            | SlotOutcome::BudgetMissing
            | SlotOutcome::PreferencesMissing
            | SlotOutcome::FeedbackPositive
            | SlotOutcome::ProductMentioned(_)
            | SlotOutcome::FeedbackOther
            | SlotOutcome::AwaitingRecommendation => {
                tracing::trace!(outcome = outcome.label(), stage = %self.state.stage, "Stage unchanged");
            }
        }
        self.state.stage
    }

    /// Close the recommendation stage
    ///
    /// Slots are cleared either way: the next search starts from scratch.
    /// With products shown the dialogue waits for feedback, otherwise it
    /// goes back to asking for a category.
    pub fn complete_recommendation(&mut self, found: bool) -> Stage {
        if self.state.stage != Stage::Recommendation {
            tracing::warn!(stage = %self.state.stage, "Recommendation completed outside recommendation stage");
        }

        if found {
            self.clear_into(Stage::Feedback, ChangeReason::RecommendationsShown);
        } else {
            self.clear_into(Stage::Initial, ChangeReason::NoProductsFound);
        }
        self.state.stage
    }

    /// Reset to a fresh state, keeping the change history
    pub fn reset(&mut self) {
        self.clear_into(Stage::Initial, ChangeReason::Reset);
    }

    fn clear_into(&mut self, stage: Stage, reason: ChangeReason) {
        let from = self.state.stage;
        self.state = ConversationState::cleared(from);
        self.transition(stage, reason);
    }

    fn transition(&mut self, to: Stage, reason: ChangeReason) {
        let from = self.state.stage;
        self.state.stage = to;
        self.history.push(StageChange {
            timestamp: Utc::now(),
            from,
            to,
            reason,
        });

        tracing::debug!(from = %from, to = %to, reason = ?reason, "Stage transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Budget, Category};

    fn at_preferences() -> DialogueStateTracker {
        let mut tracker = DialogueStateTracker::new();
        tracker.apply(&SlotOutcome::CategoryFound(Category::Laptop));
        tracker.apply(&SlotOutcome::BudgetFound(Budget::range(1000, 1500)));
        tracker
    }

    #[test]
    fn test_tracker_creation() {
        let tracker = DialogueStateTracker::new();
        assert_eq!(tracker.stage(), Stage::Initial);
        assert!(tracker.state().category.is_none());
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut tracker = at_preferences();
        assert_eq!(tracker.stage(), Stage::Preferences);
        assert_eq!(tracker.state().category, Some(Category::Laptop));
        assert_eq!(tracker.state().budget, Some(Budget::range(1000, 1500)));

        let stage = tracker.apply(&SlotOutcome::PreferencesFound(vec![
            "performance".to_string(),
            "battery".to_string(),
        ]));
        assert_eq!(stage, Stage::Recommendation);
        assert_eq!(tracker.state().preferences, vec!["performance", "battery"]);

        assert_eq!(tracker.complete_recommendation(true), Stage::Feedback);
        assert_eq!(*tracker.state(), ConversationState::cleared(Stage::Feedback));
        assert_eq!(tracker.history().len(), 4);
    }

    #[test]
    fn test_failed_extraction_keeps_stage() {
        let mut tracker = DialogueStateTracker::new();
        assert_eq!(tracker.apply(&SlotOutcome::CategoryMissing), Stage::Initial);

        tracker.apply(&SlotOutcome::CategoryFound(Category::Headphones));
        assert_eq!(tracker.apply(&SlotOutcome::BudgetMissing), Stage::Budget);
        assert_eq!(tracker.state().category, Some(Category::Headphones));
        assert_eq!(tracker.history().len(), 1);
    }

    #[test]
    fn test_general_preference_fallback() {
        let mut tracker = at_preferences();
        tracker.apply(&SlotOutcome::PreferencesGeneral);
        assert_eq!(tracker.stage(), Stage::Recommendation);
        assert_eq!(tracker.state().preferences, vec!["general"]);
    }

    #[test]
    fn test_no_products_resets_to_initial() {
        let mut tracker = at_preferences();
        tracker.apply(&SlotOutcome::PreferencesGeneral);
        assert_eq!(tracker.complete_recommendation(false), Stage::Initial);
        assert!(tracker.state().category.is_none());
        assert!(tracker.state().budget.is_none());
        assert!(tracker.state().preferences.is_empty());
        assert_eq!(tracker.history().last().map(|c| c.reason), Some(ChangeReason::NoProductsFound));
    }

    #[test]
    fn test_feedback_transitions() {
        let mut tracker = at_preferences();
        tracker.apply(&SlotOutcome::PreferencesGeneral);
        tracker.complete_recommendation(true);

        assert_eq!(tracker.apply(&SlotOutcome::FeedbackPositive), Stage::Feedback);
        assert_eq!(tracker.apply(&SlotOutcome::FeedbackOther), Stage::Feedback);
        assert_eq!(tracker.apply(&SlotOutcome::FeedbackNegative), Stage::Initial);
        assert_eq!(*tracker.state(), ConversationState::new());
    }

    #[test]
    fn test_reset() {
        let mut tracker = at_preferences();
        tracker.reset();
        assert_eq!(*tracker.state(), ConversationState::new());
        assert_eq!(tracker.history().last().map(|c| c.from), Some(Stage::Preferences));
    }
}
