//! Keyword tables for slot extraction and feedback classification
//!
//! Every table is an ordered list. Category detection lets the last matching
//! entry win and feedback checks the positive list first, so entry order is
//! part of the behaviour and must survive (de)serialization.

use advisor_core::Category;
use serde::{Deserialize, Serialize};

/// Trigger substrings for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub triggers: Vec<String>,
}

/// Trigger substrings for one preference tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceKeywords {
    pub tag: String,
    pub triggers: Vec<String>,
}

/// Preference tags available for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceTable {
    pub category: Category,
    pub preferences: Vec<PreferenceKeywords>,
}

/// Positive and negative feedback phrases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackKeywords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for FeedbackKeywords {
    fn default() -> Self {
        Self {
            positive: strings(&[
                "like", "good", "great", "excellent", "perfect", "love", "nice", "yes", "thanks",
            ]),
            negative: strings(&[
                "don't like",
                "not good",
                "too expensive",
                "dislike",
                "no",
                "not what",
                "different",
            ]),
        }
    }
}

/// All keyword tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub categories: Vec<CategoryKeywords>,
    pub preferences: Vec<PreferenceTable>,
    pub feedback: FeedbackKeywords,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            categories: vec![
                category(
                    Category::Laptop,
                    &["laptop", "notebook", "computer", "pc", "macbook"],
                ),
                category(
                    Category::Smartphone,
                    &["phone", "smartphone", "mobile", "iphone", "android", "cell phone"],
                ),
                category(
                    Category::Headphones,
                    &["headphones", "earbuds", "headset", "earphones", "airpods"],
                ),
            ],
            preferences: vec![
                PreferenceTable {
                    category: Category::Laptop,
                    preferences: vec![
                        preference("performance", &["performance", "fast", "powerful", "speed", "processing"]),
                        preference("portability", &["portable", "light", "lightweight", "thin", "travel"]),
                        preference("battery", &["battery", "long-lasting", "all day"]),
                        preference("display", &["screen", "display", "retina", "4k", "resolution"]),
                        preference("storage", &["storage", "ssd", "hard drive", "space"]),
                        preference("gaming", &["gaming", "game", "fps", "graphics card", "gpu"]),
                    ],
                },
                PreferenceTable {
                    category: Category::Smartphone,
                    preferences: vec![
                        preference("camera", &["camera", "photo", "photography", "pictures", "selfie"]),
                        preference("battery", &["battery", "long-lasting", "all day"]),
                        preference("display", &["screen", "display", "amoled", "lcd", "oled"]),
                        preference("storage", &["storage", "memory", "space"]),
                        preference("performance", &["performance", "fast", "speed", "powerful"]),
                    ],
                },
                PreferenceTable {
                    category: Category::Headphones,
                    preferences: vec![
                        preference("sound", &["sound", "audio", "quality", "bass"]),
                        preference("noise", &["noise cancellation", "anc", "quiet", "silence"]),
                        preference("battery", &["battery", "long-lasting"]),
                        preference("comfort", &["comfort", "comfortable", "fit"]),
                        preference("wireless", &["wireless", "bluetooth", "cordless"]),
                    ],
                },
            ],
            feedback: FeedbackKeywords::default(),
        }
    }
}

impl KeywordTables {
    /// Preference tags for a category, in table order
    ///
    /// Returns an empty slice for a category with no table.
    pub fn preferences_for(&self, category: Category) -> &[PreferenceKeywords] {
        self.preferences
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.preferences.as_slice())
            .unwrap_or(&[])
    }

    /// Check that every trigger is lower-case and non-empty
    ///
    /// Matching runs against the lower-cased utterance, so an upper-case
    /// trigger could never fire.
    pub fn validate(&self) -> Result<(), String> {
        let category_triggers = self.categories.iter().flat_map(|c| c.triggers.iter());
        let preference_triggers = self
            .preferences
            .iter()
            .flat_map(|t| t.preferences.iter())
            .flat_map(|p| p.triggers.iter());
        let feedback = self.feedback.positive.iter().chain(self.feedback.negative.iter());

        for trigger in category_triggers.chain(preference_triggers).chain(feedback) {
            if trigger.is_empty() {
                return Err("empty keyword trigger".to_string());
            }
            if trigger.to_lowercase() != *trigger {
                return Err(format!("keyword trigger '{}' must be lower-case", trigger));
            }
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn category(category: Category, triggers: &[&str]) -> CategoryKeywords {
    CategoryKeywords {
        category,
        triggers: strings(triggers),
    }
}

fn preference(tag: &str, triggers: &[&str]) -> PreferenceKeywords {
    PreferenceKeywords {
        tag: tag.to_string(),
        triggers: strings(triggers),
    }
}
