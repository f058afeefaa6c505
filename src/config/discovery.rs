//! Discovery engine configuration: scoring thresholds and catalog source

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::discovery::{
    ScoringThresholds, ALWAYS_INCLUDE_CONFIDENCE, AUTO_COMPLETE_THRESHOLD,
    DEPENDENCY_GATE_THRESHOLD, FALLBACK_CONFIDENCE_CAP, FAST_PATH_THRESHOLD, MAX_QUESTIONS,
    MIN_BEHAVIOR_SCORE, MIN_FEATURE_SCORE, MIN_QUESTIONS, PRIORITY_ESSENTIAL_CUTOFF,
    PRIORITY_IMPORTANT_CUTOFF, SLOT_KNOWN_THRESHOLD,
};

/// Lowest auto-complete threshold configuration may set.
pub const MIN_AUTO_COMPLETE: f64 = AUTO_COMPLETE_THRESHOLD;

/// Discovery configuration
///
/// Every threshold defaults to the engine's named constant.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// YAML catalog to load instead of the built-in one
    pub catalog_path: Option<PathBuf>,

    #[serde(default = "default_min_questions")]
    pub min_questions: u8,

    #[serde(default = "default_max_questions")]
    pub max_questions: u8,

    /// Overall confidence at which the engine may finish without a "yes"
    #[serde(default = "default_auto_complete")]
    pub auto_complete_threshold: f64,

    /// Opening confidence that skips the required questions
    #[serde(default = "default_fast_path")]
    pub fast_path_threshold: f64,

    /// Ceiling for keyword-only industry confidence
    #[serde(default = "default_fallback_cap")]
    pub fallback_confidence_cap: f64,

    #[serde(default = "default_dependency_gate")]
    pub dependency_gate_threshold: f64,

    #[serde(default = "default_essential_cutoff")]
    pub priority_essential_cutoff: f64,

    #[serde(default = "default_important_cutoff")]
    pub priority_important_cutoff: f64,

    #[serde(default = "default_min_feature_score")]
    pub min_feature_score: f64,

    #[serde(default = "default_min_behavior_score")]
    pub min_behavior_score: f64,

    /// Slot confidence at which its question is credited without asking
    #[serde(default = "default_slot_known")]
    pub slot_known_threshold: f64,
}

impl DiscoveryConfig {
    /// Thresholds handed to the engine.
    pub fn thresholds(&self) -> ScoringThresholds {
        ScoringThresholds {
            min_questions: self.min_questions,
            max_questions: self.max_questions,
            auto_complete: self.auto_complete_threshold,
            fast_path: self.fast_path_threshold,
            fallback_cap: self.fallback_confidence_cap,
            dependency_gate: self.dependency_gate_threshold,
            priority_essential_cutoff: self.priority_essential_cutoff,
            priority_important_cutoff: self.priority_important_cutoff,
            min_feature_score: self.min_feature_score,
            min_behavior_score: self.min_behavior_score,
            slot_known: self.slot_known_threshold,
            always_include_confidence: ALWAYS_INCLUDE_CONFIDENCE,
        }
    }

    /// Validate discovery configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let unit = [
            ("auto_complete_threshold", self.auto_complete_threshold),
            ("fast_path_threshold", self.fast_path_threshold),
            ("fallback_confidence_cap", self.fallback_confidence_cap),
            ("dependency_gate_threshold", self.dependency_gate_threshold),
            ("priority_essential_cutoff", self.priority_essential_cutoff),
            ("priority_important_cutoff", self.priority_important_cutoff),
            ("min_feature_score", self.min_feature_score),
            ("min_behavior_score", self.min_behavior_score),
            ("slot_known_threshold", self.slot_known_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::ThresholdOutOfRange(name));
            }
        }

        if self.auto_complete_threshold < MIN_AUTO_COMPLETE {
            return Err(ValidationError::AutoCompleteTooLow);
        }
        if self.fallback_confidence_cap >= self.auto_complete_threshold {
            return Err(ValidationError::FallbackCapTooHigh);
        }
        if self.min_questions > self.max_questions {
            return Err(ValidationError::InvalidQuestionBounds);
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            min_questions: default_min_questions(),
            max_questions: default_max_questions(),
            auto_complete_threshold: default_auto_complete(),
            fast_path_threshold: default_fast_path(),
            fallback_confidence_cap: default_fallback_cap(),
            dependency_gate_threshold: default_dependency_gate(),
            priority_essential_cutoff: default_essential_cutoff(),
            priority_important_cutoff: default_important_cutoff(),
            min_feature_score: default_min_feature_score(),
            min_behavior_score: default_min_behavior_score(),
            slot_known_threshold: default_slot_known(),
        }
    }
}

fn default_min_questions() -> u8 {
    MIN_QUESTIONS
}

fn default_max_questions() -> u8 {
    MAX_QUESTIONS
}

fn default_auto_complete() -> f64 {
    AUTO_COMPLETE_THRESHOLD
}

fn default_fast_path() -> f64 {
    FAST_PATH_THRESHOLD
}

fn default_fallback_cap() -> f64 {
    FALLBACK_CONFIDENCE_CAP
}

fn default_dependency_gate() -> f64 {
    DEPENDENCY_GATE_THRESHOLD
}

fn default_essential_cutoff() -> f64 {
    PRIORITY_ESSENTIAL_CUTOFF
}

fn default_important_cutoff() -> f64 {
    PRIORITY_IMPORTANT_CUTOFF
}

fn default_min_feature_score() -> f64 {
    MIN_FEATURE_SCORE
}

fn default_min_behavior_score() -> f64 {
    MIN_BEHAVIOR_SCORE
}

fn default_slot_known() -> f64 {
    SLOT_KNOWN_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_thresholds() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.thresholds(), ScoringThresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_looser_completion_gate() {
        let config = DiscoveryConfig {
            auto_complete_threshold: 0.85,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::AutoCompleteTooLow));
    }

    #[test]
    fn test_allows_stricter_completion_gate() {
        let config = DiscoveryConfig {
            auto_complete_threshold: 0.99,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds().auto_complete, 0.99);
    }

    #[test]
    fn test_rejects_fallback_cap_at_gate() {
        let config = DiscoveryConfig {
            fallback_confidence_cap: 0.95,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::FallbackCapTooHigh));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let config = DiscoveryConfig {
            dependency_gate_threshold: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::ThresholdOutOfRange("dependency_gate_threshold"))
        );
    }

    #[test]
    fn test_rejects_inverted_question_bounds() {
        let config = DiscoveryConfig {
            min_questions: 5,
            max_questions: 4,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQuestionBounds));
    }
}
