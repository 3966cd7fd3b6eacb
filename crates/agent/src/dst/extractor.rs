//! Slot value extractor for product conversations
//!
//! Rule-based extraction from user utterances. The active stage decides
//! which slot is parsed; every other slot is ignored for that turn.

use once_cell::sync::Lazy;
use regex::Regex;

use advisor_config::constants::dialogue::{GENERAL_PREFERENCE, GENERAL_PREFERENCE_MIN_CHARS};
use advisor_config::{Catalog, KeywordTables};
use advisor_core::{Budget, Category, Product, Stage};

/// Optional `$`, digits, optionally `-` and a second `$digits` group
static BUDGET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?(\d+)(?:\s*-\s*\$?(\d+))?").unwrap());

/// Result of scanning one utterance in one stage
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    CategoryFound(Category),
    CategoryMissing,
    BudgetFound(Budget),
    BudgetMissing,
    /// Tags in table order
    PreferencesFound(Vec<String>),
    /// Nothing matched but the utterance was long enough to move on
    PreferencesGeneral,
    PreferencesMissing,
    FeedbackPositive,
    FeedbackNegative,
    ProductMentioned(Product),
    FeedbackOther,
    /// Stage already at `recommendation`; nothing to extract
    AwaitingRecommendation,
}

impl SlotOutcome {
    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            SlotOutcome::CategoryFound(_) => "category_found",
            SlotOutcome::CategoryMissing => "category_missing",
            SlotOutcome::BudgetFound(_) => "budget_found",
            SlotOutcome::BudgetMissing => "budget_missing",
            SlotOutcome::PreferencesFound(_) => "preferences_found",
            SlotOutcome::PreferencesGeneral => "preferences_general",
            SlotOutcome::PreferencesMissing => "preferences_missing",
            SlotOutcome::FeedbackPositive => "feedback_positive",
            SlotOutcome::FeedbackNegative => "feedback_negative",
            SlotOutcome::ProductMentioned(_) => "product_mentioned",
            SlotOutcome::FeedbackOther => "feedback_other",
            SlotOutcome::AwaitingRecommendation => "awaiting_recommendation",
        }
    }
}

/// Feedback classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Positive,
    Negative,
    Neutral,
}

/// Slot extractor driven by configurable keyword tables
pub struct SlotExtractor {
    keywords: KeywordTables,
}

impl SlotExtractor {
    pub fn new(keywords: KeywordTables) -> Self {
        Self { keywords }
    }

    /// Extract whichever slot `stage` asks for
    ///
    /// `category` is the category collected so far; it selects the
    /// preference table.
    pub fn extract(
        &self,
        stage: Stage,
        category: Option<Category>,
        utterance: &str,
        catalog: &Catalog,
    ) -> SlotOutcome {
        let lower = utterance.to_lowercase();

        match stage {
            Stage::Initial => match self.detect_category(&lower) {
                Some(category) => SlotOutcome::CategoryFound(category),
                None => SlotOutcome::CategoryMissing,
            },
            Stage::Budget => match extract_budget(&lower) {
                Some(budget) => SlotOutcome::BudgetFound(budget),
                None => SlotOutcome::BudgetMissing,
            },
            Stage::Preferences => {
                let found = category
                    .map(|c| self.extract_preferences(c, &lower))
                    .unwrap_or_default();

                if !found.is_empty() {
                    SlotOutcome::PreferencesFound(found)
                } else if lower.chars().count() > GENERAL_PREFERENCE_MIN_CHARS {
                    SlotOutcome::PreferencesGeneral
                } else {
                    SlotOutcome::PreferencesMissing
                }
            }
            Stage::Recommendation => SlotOutcome::AwaitingRecommendation,
            Stage::Feedback => match self.classify_feedback(&lower) {
                FeedbackKind::Positive => SlotOutcome::FeedbackPositive,
                FeedbackKind::Negative => SlotOutcome::FeedbackNegative,
                FeedbackKind::Neutral => match catalog.mentioned_in(&lower) {
                    Some(product) => SlotOutcome::ProductMentioned(product.clone()),
                    None => SlotOutcome::FeedbackOther,
                },
            },
        }
    }

    /// Detect the product category in lower-cased text
    ///
    /// Every table entry is checked; when several categories match, the one
    /// listed last wins.
    pub fn detect_category(&self, lower: &str) -> Option<Category> {
        let mut detected = None;
        for entry in &self.keywords.categories {
            if entry.triggers.iter().any(|k| lower.contains(k.as_str())) {
                detected = Some(entry.category);
            }
        }
        detected
    }

    /// All preference tags for `category` found in lower-cased text, in
    /// table order
    pub fn extract_preferences(&self, category: Category, lower: &str) -> Vec<String> {
        self.keywords
            .preferences_for(category)
            .iter()
            .filter(|p| p.triggers.iter().any(|k| lower.contains(k.as_str())))
            .map(|p| p.tag.clone())
            .collect()
    }

    /// Classify feedback; positive phrases are checked first
    pub fn classify_feedback(&self, lower: &str) -> FeedbackKind {
        let feedback = &self.keywords.feedback;
        if feedback.positive.iter().any(|k| lower.contains(k.as_str())) {
            FeedbackKind::Positive
        } else if feedback.negative.iter().any(|k| lower.contains(k.as_str())) {
            FeedbackKind::Negative
        } else {
            FeedbackKind::Neutral
        }
    }
}

impl Default for SlotExtractor {
    fn default() -> Self {
        Self::new(KeywordTables::default())
    }
}

/// Parse a budget from lower-cased text
///
/// Uses the first match only. Two numbers give a range, one gives an upper
/// bound. Values beyond `u32::MAX` saturate.
pub fn extract_budget(lower: &str) -> Option<Budget> {
    let caps = BUDGET_PATTERN.captures(lower)?;
    let first = parse_amount(caps.get(1)?.as_str());

    Some(match caps.get(2) {
        Some(second) => Budget::range(first, parse_amount(second.as_str())),
        None => Budget::up_to(first),
    })
}

fn parse_amount(digits: &str) -> u32 {
    digits
        .parse::<u64>()
        .map(|v| v.min(u64::from(u32::MAX)) as u32)
        .unwrap_or(u32::MAX)
}

/// Fallback tag recorded when no preference keyword matched
pub fn general_preference() -> String {
    GENERAL_PREFERENCE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SlotExtractor {
        SlotExtractor::default()
    }

    #[test]
    fn test_single_category_keyword() {
        let ex = extractor();
        assert_eq!(ex.detect_category("i need a new laptop for work"), Some(Category::Laptop));
        assert_eq!(ex.detect_category("looking for an android"), Some(Category::Smartphone));
        assert_eq!(ex.detect_category("new earbuds please"), Some(Category::Headphones));
        assert_eq!(ex.detect_category("a new macbook"), Some(Category::Laptop));
        assert_eq!(ex.detect_category("something nice"), None);
    }

    #[test]
    fn test_last_listed_category_wins() {
        let ex = extractor();
        // "phone" (smartphone) and "laptop" both present
        assert_eq!(
            ex.detect_category("a laptop or maybe a phone"),
            Some(Category::Smartphone)
        );
        // order in the sentence does not matter, table order does
        assert_eq!(
            ex.detect_category("a phone or maybe a laptop"),
            Some(Category::Smartphone)
        );
        // "headphones" contains "phone"; headphones is listed last
        assert_eq!(ex.detect_category("i want wireless headphones"), Some(Category::Headphones));
    }

    #[test]
    fn test_budget_range() {
        assert_eq!(
            extract_budget("my budget is around $1000-1500"),
            Some(Budget::range(1000, 1500))
        );
        assert_eq!(extract_budget("$1000 - $1500"), Some(Budget::range(1000, 1500)));
    }

    #[test]
    fn test_budget_max_only() {
        assert_eq!(extract_budget("up to 800"), Some(Budget::up_to(800)));
        assert_eq!(extract_budget("under $200 please"), Some(Budget::up_to(200)));
    }

    #[test]
    fn test_budget_missing() {
        assert_eq!(extract_budget("no numbers here"), None);
    }

    #[test]
    fn test_budget_range_not_validated() {
        assert_eq!(extract_budget("1500-1000"), Some(Budget::range(1500, 1000)));
    }

    #[test]
    fn test_budget_first_match_only() {
        // "to" is not a range separator
        assert_eq!(extract_budget("between 500 and 900"), Some(Budget::up_to(500)));
    }

    #[test]
    fn test_budget_saturates() {
        assert_eq!(
            extract_budget("99999999999999999999999"),
            Some(Budget::up_to(u32::MAX))
        );
    }

    #[test]
    fn test_all_matching_preferences_in_table_order() {
        let ex = extractor();
        let tags = ex.extract_preferences(
            Category::Laptop,
            "i need something with good battery life and powerful enough for video editing",
        );
        // "something" contains "thin"
        assert_eq!(tags, vec!["performance", "portability", "battery"]);

        let tags = ex.extract_preferences(Category::Smartphone, "a great screen and camera");
        assert_eq!(tags, vec!["camera", "display"]);
    }

    #[test]
    fn test_preferences_are_category_specific() {
        let ex = extractor();
        assert!(ex.extract_preferences(Category::Headphones, "gaming gpu").is_empty());
        assert_eq!(ex.extract_preferences(Category::Laptop, "gaming gpu"), vec!["gaming"]);
    }

    #[test]
    fn test_preference_fallback_threshold() {
        let ex = extractor();
        let catalog = Catalog::default();

        // exactly 10 characters
        let outcome = ex.extract(Stage::Preferences, Some(Category::Laptop), "hmm, maybe", &catalog);
        assert_eq!(outcome, SlotOutcome::PreferencesMissing);

        // 11 characters
        let outcome = ex.extract(Stage::Preferences, Some(Category::Laptop), "hmm, maybe.", &catalog);
        assert_eq!(outcome, SlotOutcome::PreferencesGeneral);
    }

    #[test]
    fn test_feedback_positive_checked_first() {
        let ex = extractor();
        assert_eq!(ex.classify_feedback("these look great"), FeedbackKind::Positive);
        assert_eq!(ex.classify_feedback("no, too expensive"), FeedbackKind::Negative);
        // "not good" contains "good"
        assert_eq!(ex.classify_feedback("not good"), FeedbackKind::Positive);
        assert_eq!(ex.classify_feedback("hmm"), FeedbackKind::Neutral);
    }

    #[test]
    fn test_feedback_product_mention() {
        let ex = extractor();
        let catalog = Catalog::default();
        let outcome = ex.extract(Stage::Feedback, None, "Tell me about the ProBook X5", &catalog);
        match outcome {
            SlotOutcome::ProductMentioned(p) => assert_eq!(p.name, "ProBook X5"),
            other => panic!("unexpected outcome {:?}", other),
        }

        let outcome = ex.extract(Stage::Feedback, None, "hmm", &catalog);
        assert_eq!(outcome, SlotOutcome::FeedbackOther);
    }

    #[test]
    fn test_stage_selects_slot() {
        let ex = extractor();
        let catalog = Catalog::default();
        // A category keyword in the budget stage is ignored
        let outcome = ex.extract(Stage::Budget, Some(Category::Laptop), "a laptop", &catalog);
        assert_eq!(outcome, SlotOutcome::BudgetMissing);
        // A number in the initial stage is ignored
        let outcome = ex.extract(Stage::Initial, None, "$500", &catalog);
        assert_eq!(outcome, SlotOutcome::CategoryMissing);
    }
}
