//! Behavior matching: pick the vertical template that best fits the input.

use serde::{Deserialize, Serialize};

use super::feature_detector::DetectedFeature;
use super::parsed_input::ParsedInput;
use crate::domain::catalog::BehaviorBundle;
use crate::domain::foundation::Confidence;

const KEYWORD_FACTOR: f64 = 0.15;
const INDUSTRY_BONUS: f64 = 0.2;
const IDENTITY_BONUS: f64 = 0.4;
const FEATURE_OVERLAP_FACTOR: f64 = 0.3;
const NOUN_BONUS: f64 = 0.1;
const NEUTRAL_WEIGHT: f64 = 5.0;
const WEIGHT_STEP: f64 = 0.05;

/// The winning behavior bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedBehavior {
    pub id: String,
    pub confidence: Confidence,
    pub features: Vec<String>,
    pub entities: Vec<String>,
    pub workflows: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone)]
pub struct BehaviorMatcher {
    min_score: f64,
}

impl Default for BehaviorMatcher {
    fn default() -> Self {
        Self::new(super::thresholds::MIN_BEHAVIOR_SCORE)
    }
}

impl BehaviorMatcher {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }

    /// Returns the highest scoring bundle, or `None` when nothing reaches the
    /// minimum score. The first-listed bundle wins a tie.
    pub fn find_match(
        &self,
        input: &ParsedInput,
        industry: &str,
        detected: &[DetectedFeature],
        bundles: &[BehaviorBundle],
    ) -> Option<MatchedBehavior> {
        let mut best: Option<(f64, &BehaviorBundle, Vec<String>)> = None;
        for bundle in bundles {
            let (score, reasons) = score_bundle(bundle, input, industry, detected);
            if best.as_ref().map_or(true, |(top, _, _)| score > *top) {
                best = Some((score, bundle, reasons));
            }
        }

        let (score, bundle, reasons) = best?;
        if score < self.min_score {
            tracing::debug!(best = %bundle.id, score, "No behavior bundle above minimum");
            return None;
        }

        tracing::debug!(bundle = %bundle.id, score, "Behavior bundle matched");
        Some(MatchedBehavior {
            id: bundle.id.clone(),
            confidence: Confidence::new(score),
            features: bundle.features.clone(),
            entities: bundle.entities.clone(),
            workflows: bundle.workflows.clone(),
            reasoning: reasons.join("; "),
        })
    }
}

fn score_bundle(
    bundle: &BehaviorBundle,
    input: &ParsedInput,
    industry: &str,
    detected: &[DetectedFeature],
) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();
    let weight = f64::from(bundle.weight);

    let hits = bundle
        .keywords
        .iter()
        .filter(|k| input.normalized.contains(k.to_lowercase().as_str()))
        .count();
    if hits > 0 {
        score += hits as f64 * (weight / 10.0) * KEYWORD_FACTOR;
        reasons.push(format!("{} keyword match(es)", hits));
    }

    if bundle.industries.iter().any(|i| i == industry) {
        score += INDUSTRY_BONUS;
        reasons.push(format!("built for {}", industry));
    }

    if let Some(identity) = &input.identity {
        if identity_matches(identity, bundle) {
            score += IDENTITY_BONUS;
            reasons.push(format!("you described yourself as a {}", identity));
        }
    }

    if !bundle.features.is_empty() {
        let overlap = bundle
            .features
            .iter()
            .filter(|f| detected.iter().any(|d| &d.id == *f))
            .count();
        if overlap > 0 {
            score += overlap as f64 / bundle.features.len() as f64 * FEATURE_OVERLAP_FACTOR;
            reasons.push(format!("{} of {} features detected", overlap, bundle.features.len()));
        }
    }

    if input.nouns.iter().any(|noun| {
        bundle
            .keywords
            .iter()
            .any(|k| k.contains(noun.as_str()) || noun.contains(k.as_str()))
    }) {
        score += NOUN_BONUS;
    }

    score *= 1.0 + (weight - NEUTRAL_WEIGHT) * WEIGHT_STEP;
    (score.clamp(0.0, 1.0), reasons)
}

/// The self-named profession equals the bundle id or a keyword, or any of its
/// words does.
fn identity_matches(identity: &str, bundle: &BehaviorBundle) -> bool {
    let matches = |candidate: &str| {
        candidate == bundle.id.replace('_', " ")
            || candidate == bundle.id
            || bundle.keywords.iter().any(|k| k.eq_ignore_ascii_case(candidate))
    };
    matches(identity) || identity.split_whitespace().any(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::FeaturePriority;

    fn bundles() -> Vec<BehaviorBundle> {
        vec![
            BehaviorBundle::new("home_services", &["repair", "service call", "job"], 4)
                .with_industries(&["plumber", "electrician", "hvac"])
                .with_features(&["scheduling", "invoicing", "dispatch"]),
            BehaviorBundle::new("plumber", &["plumber", "plumbing", "drain", "leak"], 8)
                .with_industries(&["plumber"])
                .with_features(&["scheduling", "invoicing", "job_tracking"])
                .with_entities(&["job", "customer"])
                .with_workflows(&["emergency_dispatch"]),
            BehaviorBundle::new("salon", &["salon", "stylist", "haircut"], 8)
                .with_industries(&["salon"])
                .with_features(&["scheduling", "online_booking"]),
        ]
    }

    fn feature(id: &str) -> DetectedFeature {
        DetectedFeature {
            id: id.to_string(),
            confidence: Confidence::new(0.7),
            priority: FeaturePriority::Important,
            reasoning: String::new(),
            dependencies: vec![],
        }
    }

    #[test]
    fn self_identified_plumber_matches_plumber_bundle() {
        let matcher = BehaviorMatcher::default();
        let input = ParsedInput::parse("I'm a plumber fixing leaks");
        let matched = matcher
            .find_match(&input, "plumber", &[feature("scheduling")], &bundles())
            .unwrap();
        assert_eq!(matched.id, "plumber");
        assert_eq!(matched.workflows, vec!["emergency_dispatch"]);
        assert!(matched.reasoning.contains("described yourself"));
    }

    #[test]
    fn returns_none_below_minimum() {
        let matcher = BehaviorMatcher::default();
        let input = ParsedInput::parse("something entirely different");
        assert!(matcher.find_match(&input, "general", &[], &bundles()).is_none());
    }

    #[test]
    fn matched_score_is_at_least_minimum() {
        let matcher = BehaviorMatcher::default();
        let input = ParsedInput::parse("my salon needs a stylist calendar");
        let matched = matcher.find_match(&input, "salon", &[], &bundles()).unwrap();
        assert!(matched.confidence.meets(0.3));
    }

    #[test]
    fn first_listed_wins_a_tie() {
        let twins = vec![
            BehaviorBundle::new("first", &["bakery"], 5),
            BehaviorBundle::new("second", &["bakery"], 5),
        ];
        let matcher = BehaviorMatcher::new(0.0);
        let input = ParsedInput::parse("bakery");
        let matched = matcher.find_match(&input, "general", &[], &twins).unwrap();
        assert_eq!(matched.id, "first");
    }

    #[test]
    fn weight_scales_score() {
        let light = vec![BehaviorBundle::new("light", &["bakery"], 1)];
        let heavy = vec![BehaviorBundle::new("heavy", &["bakery"], 9)];
        let matcher = BehaviorMatcher::new(0.0);
        let input = ParsedInput::parse("a bakery");
        let light = matcher.find_match(&input, "general", &[], &light).unwrap();
        let heavy = matcher.find_match(&input, "general", &[], &heavy).unwrap();
        assert!(heavy.confidence > light.confidence);
    }
}
