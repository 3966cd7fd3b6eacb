//! Product advisor session
//!
//! One [`ProductAdvisor`] owns a session's transcript and dialogue state and
//! processes one utterance at a time. Shared, read-only resources live in
//! [`AdvisorContext`] so sessions stay cheap to create.

use std::sync::Arc;

use serde::Serialize;

use advisor_config::{AdvisorSettings, Catalog, DialogueSettings, LlmSettings, ScoringWeights};
use advisor_core::{
    AdvisorError, ConversationState, LanguageModel, Message, Product, Result, Stage, Transcript,
};

use crate::composer::{LlmComposer, Reply, ReplySource, ResponseComposer, TurnEvent};
use crate::dst::{DialogueStateTracker, SlotExtractor, SlotOutcome};
use crate::recommend::{recommend, Criteria};

/// Read-only resources shared by every session
pub struct AdvisorContext {
    pub catalog: Catalog,
    pub extractor: SlotExtractor,
    pub composer: ResponseComposer,
    pub dialogue: DialogueSettings,
    pub llm: LlmSettings,
}

impl AdvisorContext {
    pub fn from_settings(settings: &AdvisorSettings) -> Self {
        Self {
            catalog: settings.catalog.clone(),
            extractor: SlotExtractor::new(settings.keywords.clone()),
            composer: ResponseComposer::new(settings.templates.clone()),
            dialogue: settings.dialogue.clone(),
            llm: settings.llm.clone(),
        }
    }
}

impl Default for AdvisorContext {
    fn default() -> Self {
        Self::from_settings(&AdvisorSettings::default())
    }
}

/// How reply text is produced
#[derive(Clone)]
pub enum ResponseMode {
    RuleBased,
    Llm(Arc<dyn LanguageModel>),
}

impl ResponseMode {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseMode::RuleBased => "rule_based",
            ResponseMode::Llm(_) => "llm",
        }
    }
}

/// Result of one processed utterance
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Messages appended by this turn, user message first
    pub messages: Vec<Message>,
    /// State after the turn
    pub state: ConversationState,
    pub source: ReplySource,
    /// Extraction outcome label
    pub outcome: &'static str,
}

impl TurnOutcome {
    /// Assistant reply text of this turn
    pub fn reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .skip(1)
            .find(|m| !m.is_recommendation())
            .map(|m| m.content.as_str())
    }

    /// Products shown by this turn, if any
    pub fn recommendations(&self) -> &[Product] {
        self.messages
            .iter()
            .find_map(|m| m.recommendations.as_deref())
            .unwrap_or(&[])
    }
}

/// A single advisor conversation
pub struct ProductAdvisor {
    session_id: String,
    context: Arc<AdvisorContext>,
    mode: ResponseMode,
    llm: Option<LlmComposer>,
    tracker: DialogueStateTracker,
    transcript: Transcript,
}

impl ProductAdvisor {
    /// Create a session, greeting the user
    pub fn new(session_id: impl Into<String>, context: Arc<AdvisorContext>, mode: ResponseMode) -> Self {
        let session_id = session_id.into();
        let llm = match &mode {
            ResponseMode::RuleBased => None,
            ResponseMode::Llm(model) => Some(LlmComposer::new(
                model.clone(),
                context.llm.clone(),
                context.catalog.summary(),
            )),
        };
        let transcript = Transcript::with_greeting(context.composer.greeting());

        tracing::info!(session_id = %session_id, mode = mode.label(), "Advisor session created");

        Self {
            session_id,
            context,
            mode,
            llm,
            tracker: DialogueStateTracker::new(),
            transcript,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> &ResponseMode {
        &self.mode
    }

    pub fn state(&self) -> &ConversationState {
        self.tracker.state()
    }

    pub fn stage(&self) -> Stage {
        self.tracker.stage()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Start over with a fresh transcript and cleared slots
    pub fn restart(&mut self) {
        self.tracker.reset();
        self.transcript = Transcript::with_greeting(self.context.composer.greeting());
        tracing::info!(session_id = %self.session_id, "Advisor session restarted");
    }

    /// Process one user utterance
    ///
    /// Blank input is rejected before anything is recorded. Every other
    /// input appends the user message and at least one assistant message.
    pub async fn process(&mut self, utterance: &str) -> Result<TurnOutcome> {
        if utterance.trim().is_empty() {
            return Err(AdvisorError::EmptyUtterance);
        }

        let mark = self.transcript.len();
        self.transcript.push(Message::user(utterance));
        metrics::counter!("advisor_turns_total", "mode" => self.mode.label()).increment(1);

        if self.llm.is_none() {
            let delay = self.context.dialogue.thinking_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let context = Arc::clone(&self.context);
        let from = self.tracker.stage();
        let outcome = context.extractor.extract(
            from,
            self.tracker.state().category,
            utterance,
            &context.catalog,
        );
        let stage = self.tracker.apply(&outcome);

        // State as seen by the composer, before a ranking step clears it
        let snapshot = self.tracker.state().clone();

        let ranked = if stage == Stage::Recommendation {
            let products = self.rank(&snapshot);
            self.tracker.complete_recommendation(!products.is_empty());
            if !products.is_empty() {
                metrics::counter!("advisor_recommendations_total", "category" => snapshot.category.map(|c| c.as_str()).unwrap_or("unknown")).increment(1);
            }
            Some(products)
        } else {
            None
        };

        let reply = self.reply(&outcome, &snapshot, ranked.as_deref()).await;
        if reply.is_fallback() {
            metrics::counter!("advisor_llm_fallbacks_total").increment(1);
        }

        self.transcript.push(Message::assistant(reply.text));
        if let Some(products) = ranked.filter(|p| !p.is_empty()) {
            self.transcript.push(Message::recommendations(products));
        }

        tracing::debug!(
            session_id = %self.session_id,
            outcome = outcome.label(),
            from = %from,
            to = %self.tracker.stage(),
            "Turn processed"
        );

        Ok(TurnOutcome {
            messages: self.transcript.since(mark).to_vec(),
            state: self.tracker.state().clone(),
            source: reply.source,
            outcome: outcome.label(),
        })
    }

    fn weights(&self) -> ScoringWeights {
        match self.mode {
            ResponseMode::RuleBased => self.context.dialogue.rule_based_weights,
            ResponseMode::Llm(_) => self.context.dialogue.llm_fallback_weights,
        }
    }

    fn rank(&self, state: &ConversationState) -> Vec<Product> {
        let Some(category) = state.category else {
            tracing::warn!(session_id = %self.session_id, "Ranking requested without a category");
            return Vec::new();
        };

        recommend(
            &self.context.catalog,
            Criteria {
                category,
                budget: state.budget,
                preferences: &state.preferences,
            },
            self.weights(),
            self.context.dialogue.max_recommendations,
        )
    }

    async fn reply(
        &self,
        outcome: &SlotOutcome,
        snapshot: &ConversationState,
        ranked: Option<&[Product]>,
    ) -> Reply {
        if let Some(llm) = &self.llm {
            let shown = ranked.unwrap_or(&[]);
            return llm
                .compose(snapshot, &self.transcript, shown, self.context.composer.fallback())
                .await;
        }

        let event = match ranked {
            Some(products) => TurnEvent::Ranked {
                category: snapshot.category,
                products,
            },
            None => TurnEvent::Slot(outcome),
        };
        Reply::template(self.context.composer.compose(event, snapshot.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Category, Role};

    fn advisor() -> ProductAdvisor {
        let settings = AdvisorSettings {
            dialogue: DialogueSettings::default().without_delays(),
            ..AdvisorSettings::default()
        };
        ProductAdvisor::new(
            "test-session",
            Arc::new(AdvisorContext::from_settings(&settings)),
            ResponseMode::RuleBased,
        )
    }

    #[tokio::test]
    async fn test_session_starts_with_greeting() {
        let advisor = advisor();
        assert_eq!(advisor.transcript().len(), 1);
        assert_eq!(advisor.transcript().messages()[0].role, Role::Assistant);
        assert_eq!(advisor.stage(), Stage::Initial);
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let mut advisor = advisor();
        let err = advisor.process("   ").await.unwrap_err();
        assert!(matches!(err, AdvisorError::EmptyUtterance));
        assert_eq!(advisor.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_category_turn() {
        let mut advisor = advisor();
        let turn = advisor.process("I need a laptop").await.unwrap();

        assert_eq!(turn.messages.len(), 2);
        assert_eq!(turn.messages[0].role, Role::User);
        assert_eq!(
            turn.reply(),
            Some("Great! I'll help you find the perfect laptop. What's your budget range?")
        );
        assert_eq!(turn.state.category, Some(Category::Laptop));
        assert_eq!(turn.state.stage, Stage::Budget);
        assert_eq!(turn.source, ReplySource::Template);
    }

    #[tokio::test]
    async fn test_unrecognized_budget_reprompts() {
        let mut advisor = advisor();
        advisor.process("headphones please").await.unwrap();
        let turn = advisor.process("no numbers here").await.unwrap();

        assert_eq!(turn.outcome, "budget_missing");
        assert_eq!(advisor.stage(), Stage::Budget);
        assert!(turn.reply().unwrap().contains("for the headphones you're looking for?"));
    }

    #[tokio::test]
    async fn test_empty_result_returns_to_initial() {
        let mut advisor = advisor();
        advisor.process("laptop").await.unwrap();
        advisor.process("$100").await.unwrap();
        let turn = advisor.process("up to you really, I trust you").await.unwrap();

        assert!(turn.recommendations().is_empty());
        assert_eq!(turn.messages.len(), 2);
        assert!(turn.reply().unwrap().starts_with("I couldn't find any laptop"));
        assert_eq!(turn.state, ConversationState::new());
    }

    #[tokio::test]
    async fn test_restart() {
        let mut advisor = advisor();
        advisor.process("a smartphone").await.unwrap();
        advisor.restart();

        assert_eq!(advisor.transcript().len(), 1);
        assert_eq!(*advisor.state(), ConversationState::new());
    }
}
