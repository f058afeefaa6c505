//! Named scoring and decision thresholds.

use serde::{Deserialize, Serialize};

/// Answers required before personalization.
pub const MIN_QUESTIONS: u8 = 3;
/// Hard cap including the optional follow-up question.
pub const MAX_QUESTIONS: u8 = 4;
/// COMPLETE without explicit user confirmation needs at least this much.
pub const AUTO_COMPLETE_THRESHOLD: f64 = 0.95;
/// First-turn analysis confidence that skips straight to personalization.
pub const FAST_PATH_THRESHOLD: f64 = 0.85;
/// Ceiling for any confidence produced without the AI provider.
pub const FALLBACK_CONFIDENCE_CAP: f64 = 0.65;
/// A dependency must score above this in the same pass.
pub const DEPENDENCY_GATE_THRESHOLD: f64 = 0.2;
pub const PRIORITY_ESSENTIAL_CUTOFF: f64 = 0.8;
pub const PRIORITY_IMPORTANT_CUTOFF: f64 = 0.5;
/// Detected features at or below this score are discarded.
pub const MIN_FEATURE_SCORE: f64 = 0.1;
/// Best behavior bundle below this score means no bundle.
pub const MIN_BEHAVIOR_SCORE: f64 = 0.3;
/// A slot at or above this confidence is treated as known.
pub const SLOT_KNOWN_THRESHOLD: f64 = 0.7;
/// Confidence of features appended by the always-include pass.
pub const ALWAYS_INCLUDE_CONFIDENCE: f64 = 0.6;

/// All thresholds as one value, so configuration can override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub min_questions: u8,
    pub max_questions: u8,
    pub auto_complete: f64,
    pub fast_path: f64,
    pub fallback_cap: f64,
    pub dependency_gate: f64,
    pub priority_essential_cutoff: f64,
    pub priority_important_cutoff: f64,
    pub min_feature_score: f64,
    pub min_behavior_score: f64,
    pub slot_known: f64,
    pub always_include_confidence: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            min_questions: MIN_QUESTIONS,
            max_questions: MAX_QUESTIONS,
            auto_complete: AUTO_COMPLETE_THRESHOLD,
            fast_path: FAST_PATH_THRESHOLD,
            fallback_cap: FALLBACK_CONFIDENCE_CAP,
            dependency_gate: DEPENDENCY_GATE_THRESHOLD,
            priority_essential_cutoff: PRIORITY_ESSENTIAL_CUTOFF,
            priority_important_cutoff: PRIORITY_IMPORTANT_CUTOFF,
            min_feature_score: MIN_FEATURE_SCORE,
            min_behavior_score: MIN_BEHAVIOR_SCORE,
            slot_known: SLOT_KNOWN_THRESHOLD,
            always_include_confidence: ALWAYS_INCLUDE_CONFIDENCE,
        }
    }
}
