//! Centralized constants for the product advisor
//!
//! Single source of truth for default values used across crates.

/// Service endpoints
pub mod endpoints {
    /// OpenAI-compatible API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    /// Default bind host
    pub const SERVER_HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const SERVER_PORT: u16 = 8080;
}

/// Language model defaults
pub mod llm {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    pub const DEFAULT_MAX_TOKENS: u32 = 500;

    /// Environment variable consulted when no key is configured
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
}

/// Dialogue timing and limits
pub mod dialogue {
    /// Artificial "thinking" pause before a local reply
    pub const THINKING_DELAY_MS: u64 = 1000;

    /// Gap between scripted demo turns
    pub const DEMO_TURN_GAP_MS: u64 = 3000;

    /// Maximum product cards per recommendation
    pub const MAX_RECOMMENDATIONS: usize = 3;

    /// Utterances longer than this advance the preferences stage even
    /// when no preference keyword matched
    pub const GENERAL_PREFERENCE_MIN_CHARS: usize = 10;

    /// Tag recorded when the preference fallback fires
    pub const GENERAL_PREFERENCE: &str = "general";
}

/// Settings file locations
pub mod files {
    /// Default settings file stem, resolved with any supported extension
    pub const DEFAULT_SETTINGS: &str = "config/advisor";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "ADVISOR";

    /// Nested key separator for environment variables
    pub const ENV_SEPARATOR: &str = "__";
}
