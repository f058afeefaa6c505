//! Conversation state, re-supplied by the caller on every turn.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::behavior_matcher::MatchedBehavior;
use super::feature_detector::DetectedFeature;
use super::heuristics::GENERAL_INDUSTRY;
use super::ledger::CertaintyLedger;
use super::step::DiscoveryStep;
use crate::domain::foundation::{Confidence, DiscoveryId, Timestamp};

/// Everything the engine needs to continue a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub id: DiscoveryId,
    pub step: DiscoveryStep,
    /// Industry whose kit drives the questions.
    pub industry: String,
    /// The first message, kept for re-scoring after an industry switch.
    #[serde(default)]
    pub description: String,
    pub collected_info: CertaintyLedger,
    /// Questions actually put to the user, in order.
    pub questions_asked: Vec<String>,
    pub question_count: u8,
    pub confidence: Confidence,
    pub enabled_features: Vec<String>,
    #[serde(default)]
    pub detected_features: Vec<DetectedFeature>,
    pub answers: BTreeMap<String, String>,
    /// Question id awaiting an answer.
    #[serde(default)]
    pub pending_question: Option<String>,
    pub pending_confirmation: bool,
    pub user_confirmed: bool,
    #[serde(default)]
    pub sub_vertical_candidates: Vec<String>,
    #[serde(default)]
    pub matched_behavior: Option<MatchedBehavior>,
    #[serde(default)]
    pub theme_preset: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    pub analysis_confidence: Confidence,
    pub turn: u32,
    pub seed: u64,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationState {
    pub fn new(id: DiscoveryId, seed: u64) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            step: DiscoveryStep::Init,
            industry: GENERAL_INDUSTRY.to_string(),
            description: String::new(),
            collected_info: CertaintyLedger::new(),
            questions_asked: Vec::new(),
            question_count: 0,
            confidence: Confidence::ZERO,
            enabled_features: Vec::new(),
            detected_features: Vec::new(),
            answers: BTreeMap::new(),
            pending_question: None,
            pending_confirmation: false,
            user_confirmed: false,
            sub_vertical_candidates: Vec::new(),
            matched_behavior: None,
            theme_preset: None,
            business_name: None,
            analysis_confidence: Confidence::ZERO,
            turn: 0,
            seed,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.step == DiscoveryStep::Complete
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Enables a feature once, keeping first-enabled order.
    pub fn enable_feature(&mut self, feature: &str) -> bool {
        if self.enabled_features.iter().any(|f| f == feature) {
            return false;
        }
        self.enabled_features.push(feature.to_string());
        true
    }

    pub fn enable_features<'a>(&mut self, features: impl IntoIterator<Item = &'a String>) {
        for feature in features {
            self.enable_feature(feature);
        }
    }

    /// Keeps the highest-confidence detection per feature.
    pub fn record_detection(&mut self, feature: DetectedFeature) {
        match self.detected_features.iter_mut().find(|d| d.id == feature.id) {
            Some(existing) if feature.confidence > existing.confidence => *existing = feature,
            Some(_) => {}
            None => self.detected_features.push(feature),
        }
    }

    /// Replaces the matched behavior only with a stronger match.
    pub fn record_behavior(&mut self, matched: Option<MatchedBehavior>) {
        if let Some(candidate) = matched {
            let stronger = self
                .matched_behavior
                .as_ref()
                .map_or(true, |current| candidate.confidence > current.confidence);
            if stronger {
                self.matched_behavior = Some(candidate);
            }
        }
    }

    /// Drops enabled features, detections and the matched behavior so they can
    /// be re-scored for a different industry.
    pub fn reset_scoring(&mut self) {
        self.enabled_features.clear();
        self.detected_features.clear();
        self.matched_behavior = None;
    }

    /// Answers to questions the user was actually asked.
    pub fn asked_answers(&self) -> impl Iterator<Item = &str> {
        self.questions_asked
            .iter()
            .filter_map(|id| self.answers.get(id).map(String::as_str))
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::FeaturePriority;

    fn detection(id: &str, confidence: f64) -> DetectedFeature {
        DetectedFeature {
            id: id.to_string(),
            confidence: Confidence::new(confidence),
            priority: FeaturePriority::Important,
            reasoning: String::new(),
            dependencies: vec![],
        }
    }

    #[test]
    fn new_state_starts_at_init() {
        let state = ConversationState::new(DiscoveryId::new(), 7);
        assert_eq!(state.step, DiscoveryStep::Init);
        assert_eq!(state.industry, GENERAL_INDUSTRY);
        assert_eq!(state.question_count, 0);
    }

    #[test]
    fn features_are_enabled_once() {
        let mut state = ConversationState::new(DiscoveryId::new(), 7);
        assert!(state.enable_feature("scheduling"));
        assert!(!state.enable_feature("scheduling"));
        assert_eq!(state.enabled_features, vec!["scheduling"]);
    }

    #[test]
    fn detection_keeps_strongest() {
        let mut state = ConversationState::new(DiscoveryId::new(), 7);
        state.record_detection(detection("invoicing", 0.4));
        state.record_detection(detection("invoicing", 0.9));
        state.record_detection(detection("invoicing", 0.2));
        assert_eq!(state.detected_features.len(), 1);
        assert_eq!(state.detected_features[0].confidence, Confidence::new(0.9));
    }

    #[test]
    fn reset_scoring_keeps_answers_and_ledger() {
        let mut state = ConversationState::new(DiscoveryId::new(), 7);
        state.enable_feature("property_listings");
        state.record_detection(detection("lead_tracking", 0.7));
        state.answers.insert("sub_vertical".into(), "property management".into());

        state.reset_scoring();

        assert!(state.enabled_features.is_empty());
        assert!(state.detected_features.is_empty());
        assert!(state.matched_behavior.is_none());
        assert_eq!(state.answers.len(), 1);
    }

    #[test]
    fn asked_answers_skip_credited_ones() {
        let mut state = ConversationState::new(DiscoveryId::new(), 7);
        state.answers.insert("team_size".into(), "solo".into());
        state.answers.insert("booking".into(), "yes".into());
        state.questions_asked.push("booking".into());
        assert_eq!(state.asked_answers().collect::<Vec<_>>(), vec!["yes"]);
    }

    #[test]
    fn round_trips_through_json_in_camel_case() {
        let state = ConversationState::new(DiscoveryId::new(), 7);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"questionCount\":0"));
        assert!(json.contains("\"collectedInfo\""));
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
