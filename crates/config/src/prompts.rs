//! Prompt and reply templates
//!
//! Templates use `{placeholder}` markers filled by [`render`].

use serde::{Deserialize, Serialize};

/// Fill `{key}` markers in `template`
///
/// Unknown markers are left untouched. Substituted values are never
/// scanned again, so a value may itself contain `{...}`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Assistant reply templates for the rule-based dialogue
///
/// Collected preferences get no acknowledgement of their own: the
/// recommendation reply of the same turn takes its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplates {
    /// Opening assistant message of every session
    pub greeting: String,
    /// `{category}`
    pub category_found: String,
    pub category_missing: String,
    /// `{budget}`, `{category}`
    pub budget_found: String,
    /// `{category}`
    pub budget_missing: String,
    /// `{category}`
    pub preferences_missing: String,
    pub recommendations_intro: String,
    /// `{category}`
    pub no_recommendations: String,
    pub feedback_positive: String,
    pub feedback_negative: String,
    /// `{name}`, `{features}`, `{ideal_for}`
    pub product_detail: String,
    pub feedback_other: String,
    /// Used when the language model cannot be reached
    pub llm_fallback: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            greeting: "Hi there! I can help you find the perfect tech product based on your needs. What are you looking for today? (For example: laptop, smartphone, headphones, etc.)".to_string(),
            category_found: "Great! I'll help you find the perfect {category}. What's your budget range?".to_string(),
            category_missing: "I'm not sure what product you're looking for. Could you specify if you're interested in a laptop, smartphone, headphones, or something else?".to_string(),
            budget_found: "Got it, your budget is around {budget}. What features or qualities are important to you for this {category}? (For example: battery life, performance, portability, etc.)".to_string(),
            budget_missing: "I didn't catch your budget. Could you provide a price range for the {category} you're looking for?".to_string(),
            preferences_missing: "Could you tell me more about what features are important to you in a {category}?".to_string(),
            recommendations_intro: "Based on your preferences, here are my top recommendations:".to_string(),
            no_recommendations: "I couldn't find any {category} that match your criteria. Would you like to try with a different budget or category?".to_string(),
            feedback_positive: "I'm glad you like the recommendations! Is there anything specific you'd like to know about any of these products?".to_string(),
            feedback_negative: "I'm sorry these weren't quite right. Could you tell me what you're looking for differently, and I'll find better options?".to_string(),
            product_detail: "The {name} is a great choice! It features {features}. It's particularly good for {ideal_for}. Is there anything specific you'd like to know about it?".to_string(),
            feedback_other: "Would you like to see more recommendations, or shall we refine your search criteria?".to_string(),
            llm_fallback: "I'm sorry, I'm having trouble connecting right now. Let me try to help based on what I know.".to_string(),
        }
    }
}

/// System prompt for LLM-generated replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPrompt {
    /// Agent role description
    pub role: String,
    /// Core instructions
    pub instructions: Vec<String>,
    /// Things to avoid
    pub avoid: Vec<String>,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self {
            role: "You are a friendly product advisor helping a customer choose a laptop, smartphone, or headphones.".to_string(),
            instructions: vec![
                "Ask for the product category first, then the budget, then the features that matter".to_string(),
                "Keep replies short and conversational".to_string(),
                "Only recommend products from the catalog provided".to_string(),
                "Use the conversation state to avoid asking for information already given".to_string(),
            ],
            avoid: vec![
                "Inventing prices or product names".to_string(),
                "Asking for information already provided".to_string(),
            ],
        }
    }
}

impl SystemPrompt {
    /// Build the system message, embedding the state JSON and catalog summary
    pub fn build(&self, state_json: &str, catalog_summary: &str) -> String {
        let mut prompt = format!("{}\n\n", self.role);

        prompt.push_str("## Instructions\n");
        for instruction in &self.instructions {
            prompt.push_str(&format!("- {}\n", instruction));
        }

        prompt.push_str("\n## Avoid\n");
        for avoid in &self.avoid {
            prompt.push_str(&format!("- {}\n", avoid));
        }

        if !catalog_summary.is_empty() {
            prompt.push_str("\n## Catalog\n");
            prompt.push_str(catalog_summary);
            if !catalog_summary.ends_with('\n') {
                prompt.push('\n');
            }
        }

        prompt.push_str("\n## Current conversation state\n");
        prompt.push_str(state_json);
        prompt.push('\n');

        prompt
    }
}
