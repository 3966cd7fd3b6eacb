//! Preference scoring weights
//!
//! Two policies exist and are kept apart: the rule-based dialogue counts
//! feature matches only, while the LLM variant's local fallback also credits
//! ideal-for matches and weighs features double.

use serde::{Deserialize, Serialize};

/// Points awarded per matching preference tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Awarded when any feature contains the tag
    pub feature: u32,
    /// Awarded when any ideal-for entry contains the tag
    pub ideal_for: u32,
}

impl ScoringWeights {
    /// Rule-based dialogue: feature matches at weight 1
    pub const RULE_BASED: ScoringWeights = ScoringWeights {
        feature: 1,
        ideal_for: 0,
    };

    /// LLM variant fallback: features at 2, ideal-for at 1
    pub const LLM_FALLBACK: ScoringWeights = ScoringWeights {
        feature: 2,
        ideal_for: 1,
    };
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::RULE_BASED
    }
}
