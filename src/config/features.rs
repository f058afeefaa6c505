//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Ask the AI provider to analyze input; off means keyword heuristics only
    #[serde(default = "default_enable_ai_analysis")]
    pub enable_ai_analysis: bool,

    /// Wrap the primary provider with the configured fallback
    #[serde(default)]
    pub enable_ai_fallback: bool,

    /// Log raw provider replies at debug level (rejected in production)
    #[serde(default)]
    pub log_ai_replies: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_ai_analysis: default_enable_ai_analysis(),
            enable_ai_fallback: false,
            log_ai_replies: false,
        }
    }
}

fn default_enable_ai_analysis() -> bool {
    true
}
