//! Feature detection: additive keyword and signal scoring against the catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::parsed_input::ParsedInput;
use super::thresholds::ScoringThresholds;
use crate::domain::catalog::{FeatureDefinition, FeaturePriority, KitKnowledge};
use crate::domain::foundation::Confidence;

const KEYWORD_WEIGHT: f64 = 0.25;
const INTENT_WEIGHT: f64 = 0.2;
const INDUSTRY_WEIGHT: f64 = 0.15;
const NOUN_WEIGHT: f64 = 0.15;
const ACTION_WEIGHT: f64 = 0.1;
const PHRASE_WEIGHT: f64 = 0.15;

/// A feature the detector decided to switch on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFeature {
    pub id: String,
    pub confidence: Confidence,
    pub priority: FeaturePriority,
    pub reasoning: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Raw score for one feature before gating.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoredFeature {
    pub id: String,
    pub score: f64,
    pub signals: Vec<String>,
    pub dependencies: Vec<String>,
    pub conflicts: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureDetector {
    thresholds: ScoringThresholds,
}

impl FeatureDetector {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    /// Scores every catalog feature against the input.
    ///
    /// Returns features above the minimum score in descending order (catalog
    /// order on ties), after the dependency gate and conflict resolution, with
    /// the kit's core features appended if they were not detected.
    pub fn detect(
        &self,
        input: &ParsedInput,
        industry: &str,
        catalog: &[FeatureDefinition],
        kit: &KitKnowledge,
    ) -> Vec<DetectedFeature> {
        let mut scored: Vec<ScoredFeature> = catalog
            .iter()
            .map(|def| score_feature(def, input, industry))
            .filter(|s| s.score > self.thresholds.min_feature_score)
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let surviving = resolve(scored, self.thresholds.dependency_gate);

        let mut detected: Vec<DetectedFeature> = surviving
            .into_iter()
            .map(|s| DetectedFeature {
                priority: FeaturePriority::from_score(s.score, &self.thresholds),
                confidence: Confidence::new(s.score),
                reasoning: s.signals.iter().take(2).cloned().collect::<Vec<_>>().join("; "),
                dependencies: s.dependencies,
                id: s.id,
            })
            .collect();

        for core in &kit.core_features {
            if detected.iter().any(|d| &d.id == core) {
                continue;
            }
            let dependencies = catalog
                .iter()
                .find(|def| &def.id == core)
                .map(|def| def.dependencies.clone())
                .unwrap_or_default();
            detected.push(DetectedFeature {
                id: core.clone(),
                confidence: Confidence::new(self.thresholds.always_include_confidence),
                priority: FeaturePriority::Essential,
                reasoning: format!("standard feature for {}", industry),
                dependencies,
            });
        }

        tracing::debug!(
            industry,
            detected = detected.len(),
            top = detected.first().map(|d| d.id.as_str()).unwrap_or("none"),
            "Feature detection complete"
        );
        detected
    }
}

fn score_feature(def: &FeatureDefinition, input: &ParsedInput, industry: &str) -> ScoredFeature {
    let mut score = 0.0;
    let mut signals = Vec::new();
    let keywords = def.distinct_keywords();

    for keyword in &keywords {
        if input.normalized.contains(keyword.as_str()) {
            score += KEYWORD_WEIGHT;
            signals.push(format!("mentions \"{}\"", keyword));
        }
    }

    for intent in &def.intents {
        if input.has_intent(intent) {
            score += INTENT_WEIGHT;
            signals.push(format!("{} intent", intent));
        }
    }

    if def.industries.iter().any(|i| i == industry) {
        score += INDUSTRY_WEIGHT;
        signals.push(format!("common for {}", industry));
    }

    if let Some(noun) = input
        .nouns
        .iter()
        .find(|noun| keywords.iter().any(|k| overlaps(noun, k)))
    {
        score += NOUN_WEIGHT;
        signals.push(format!("talks about {}", noun));
    }

    if let Some(action) = input
        .actions
        .iter()
        .find(|action| keywords.iter().any(|k| overlaps(action, k)))
    {
        score += ACTION_WEIGHT;
        signals.push(format!("wants to {}", action));
    }

    if let Some(phrase) = input.phrases.iter().find(|phrase| {
        phrase
            .split_whitespace()
            .any(|token| keywords.iter().any(|k| k.split_whitespace().any(|kt| kt == token)))
    }) {
        score += PHRASE_WEIGHT;
        signals.push(format!("phrase \"{}\"", phrase));
    }

    ScoredFeature {
        id: def.id.clone(),
        score,
        signals,
        dependencies: def.dependencies.clone(),
        conflicts: def.conflicts.clone(),
    }
}

/// Prefix or substring overlap in either direction.
fn overlaps(word: &str, keyword: &str) -> bool {
    word.starts_with(keyword) || keyword.starts_with(word) || keyword.contains(word) || word.contains(keyword)
}

/// Dependency gate and conflict resolution, repeated until nothing changes.
///
/// A dependency satisfies its dependent only if it scored above `gate` and is
/// itself still standing. Of two conflicting features the lower scorer goes;
/// the input is sorted so the earlier entry wins ties.
pub(crate) fn resolve(mut scored: Vec<ScoredFeature>, gate: f64) -> Vec<ScoredFeature> {
    loop {
        let before = scored.len();

        let standing: HashSet<String> = scored
            .iter()
            .filter(|s| s.score > gate)
            .map(|s| s.id.clone())
            .collect();
        scored.retain(|s| {
            let keep = s.dependencies.iter().all(|dep| standing.contains(dep));
            if !keep {
                tracing::debug!(feature = %s.id, "Dropped by dependency gate");
            }
            keep
        });

        let mut kept: Vec<ScoredFeature> = Vec::with_capacity(scored.len());
        for candidate in scored {
            let clashes = kept.iter().any(|k| {
                k.conflicts.contains(&candidate.id) || candidate.conflicts.contains(&k.id)
            });
            if clashes {
                tracing::debug!(feature = %candidate.id, "Dropped by conflict");
            } else {
                kept.push(candidate);
            }
        }
        scored = kept;

        if scored.len() == before {
            return scored;
        }
    }
}
