//! Assistant reply composition
//!
//! [`ResponseComposer`] fills the configured templates. [`LlmComposer`]
//! forwards the transcript and the tracked state to a language model; its
//! failures are reported as [`ReplySource::Fallback`], never as errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use advisor_config::{render, LlmSettings, ResponseTemplates};
use advisor_core::{
    Category, ChatMessage, ChatRequest, ConversationState, LanguageModel, Product, Transcript,
};

use crate::dst::SlotOutcome;

/// Where a reply's text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    Template,
    Generated,
    Fallback { reason: String },
}

/// Composed assistant text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn template(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Template,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ReplySource::Fallback { .. })
    }
}

/// What happened during a turn
#[derive(Debug, Clone, Copy)]
pub enum TurnEvent<'a> {
    /// Slot extraction result, no ranking ran
    Slot(&'a SlotOutcome),
    /// Ranking ran for `category`
    Ranked {
        category: Option<Category>,
        products: &'a [Product],
    },
}

/// Template-based composer
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    templates: ResponseTemplates,
}

impl ResponseComposer {
    pub fn new(templates: ResponseTemplates) -> Self {
        Self { templates }
    }

    pub fn greeting(&self) -> &str {
        &self.templates.greeting
    }

    pub fn fallback(&self) -> &str {
        &self.templates.llm_fallback
    }

    /// Reply text for a turn
    ///
    /// `category` is the category collected so far.
    pub fn compose(&self, event: TurnEvent<'_>, category: Option<Category>) -> String {
        let t = &self.templates;
        let category = category.map(|c| c.to_string()).unwrap_or_default();

        match event {
            TurnEvent::Ranked { products, .. } if !products.is_empty() => {
                t.recommendations_intro.clone()
            }
            TurnEvent::Ranked { category: ranked, .. } => {
                let ranked = ranked.map(|c| c.to_string()).unwrap_or(category);
                render(&t.no_recommendations, &[("category", ranked.as_str())])
            }
            TurnEvent::Slot(outcome) => match outcome {
                SlotOutcome::CategoryFound(found) => {
                    render(&t.category_found, &[("category", found.as_str())])
                }
                SlotOutcome::CategoryMissing => t.category_missing.clone(),
                SlotOutcome::BudgetFound(budget) => render(
                    &t.budget_found,
                    &[("budget", budget.to_string().as_str()), ("category", category.as_str())],
                ),
                SlotOutcome::BudgetMissing => {
                    render(&t.budget_missing, &[("category", category.as_str())])
                }
                SlotOutcome::PreferencesMissing => {
                    render(&t.preferences_missing, &[("category", category.as_str())])
                }
                SlotOutcome::FeedbackPositive => t.feedback_positive.clone(),
                SlotOutcome::FeedbackNegative => t.feedback_negative.clone(),
                SlotOutcome::ProductMentioned(product) => render(
                    &t.product_detail,
                    &[
                        ("name", product.name.as_str()),
                        ("features", product.features.join(", ").as_str()),
                        ("ideal_for", product.ideal_for.join(", ").as_str()),
                    ],
                ),
                // Collected preferences are answered by the ranking step
                SlotOutcome::PreferencesFound(_)
                | SlotOutcome::PreferencesGeneral
                | SlotOutcome::AwaitingRecommendation
                | SlotOutcome::FeedbackOther => t.feedback_other.clone(),
            },
        }
    }
}

/// Language-model composer
pub struct LlmComposer {
    model: Arc<dyn LanguageModel>,
    settings: LlmSettings,
    catalog_summary: String,
}

impl LlmComposer {
    pub fn new(model: Arc<dyn LanguageModel>, settings: LlmSettings, catalog_summary: String) -> Self {
        Self {
            model,
            settings,
            catalog_summary,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Build the chat request for the current turn
    ///
    /// The system message carries the prompt, the catalog and `state` as
    /// inline JSON; the whole transcript follows. Products being shown this
    /// turn are listed so the reply can introduce them.
    pub fn build_request(
        &self,
        state: &ConversationState,
        transcript: &Transcript,
        shown: &[Product],
    ) -> ChatRequest {
        let mut system = self
            .settings
            .system_prompt
            .build(&state.to_json(), &self.catalog_summary);

        if !shown.is_empty() {
            system.push_str("\n## Products shown to the customer this turn\n");
            for product in shown {
                system.push_str(&format!("- {} (${})\n", product.name, product.price));
            }
        }

        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(
            transcript
                .messages()
                .iter()
                .filter(|m| !m.is_recommendation())
                .map(ChatMessage::from),
        );

        ChatRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Generate reply text, substituting `fallback` on failure
    pub async fn compose(
        &self,
        state: &ConversationState,
        transcript: &Transcript,
        shown: &[Product],
        fallback: &str,
    ) -> Reply {
        let request = self.build_request(state, transcript, shown);

        match self.model.complete(request).await {
            Ok(text) => Reply {
                text,
                source: ReplySource::Generated,
            },
            Err(e) => {
                tracing::warn!(model = self.model.model_name(), error = %e, "LLM reply failed, using fallback");
                Reply {
                    text: fallback.to_string(),
                    source: ReplySource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}
