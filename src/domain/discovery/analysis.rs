//! Input analysis results, from the AI provider or the keyword fallback.

use serde::{Deserialize, Serialize};

use super::extractor::AiExtraction;
use super::heuristics::{ambiguity_candidates, extract_slots, guess_industry, IndustryGuess};
use super::parsed_input::ParsedInput;
use super::slot::{SlotPatch, SlotSource, SlotUpdate};
use super::thresholds::ScoringThresholds;
use crate::domain::foundation::Confidence;

/// Ceiling for every slot value the keyword heuristics produce.
pub const DETERMINISTIC_SLOT_CAP: f64 = 0.9;

/// Intent reported when nothing more specific is found.
pub const DEFAULT_INTENT: &str = "build_app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Ai,
    Fallback,
}

/// What one message told us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAnalysis {
    pub industry: String,
    /// Confidence in `industry`.
    pub confidence: Confidence,
    pub intent: String,
    /// Sibling industries the message could not choose between.
    pub sub_vertical_candidates: Vec<String>,
    /// Slot deltas, the industry included.
    pub slots: Vec<SlotUpdate>,
    pub source: AnalysisSource,
    pub parsed: ParsedInput,
}

impl InputAnalysis {
    /// Keyword-only analysis. Industry confidence never exceeds the fallback cap.
    pub fn fallback(text: &str, thresholds: &ScoringThresholds) -> Self {
        let parsed = ParsedInput::parse(text);
        let guess = guess_industry(&parsed);
        Self::from_guess(parsed, guess, thresholds)
    }

    fn from_guess(parsed: ParsedInput, guess: IndustryGuess, thresholds: &ScoringThresholds) -> Self {
        let confidence = Confidence::new(guess.confidence.value().min(thresholds.fallback_cap));
        let source = if guess.self_identified {
            SlotSource::Explicit
        } else {
            SlotSource::Inferred
        };

        let mut slots = vec![SlotUpdate {
            patch: SlotPatch::Industry(guess.industry.clone()),
            confidence,
            source,
        }];
        slots.extend(deterministic_slots(&parsed));

        Self {
            intent: primary_intent(&parsed),
            industry: guess.industry,
            confidence,
            sub_vertical_candidates: guess.candidates,
            slots,
            source: AnalysisSource::Fallback,
            parsed,
        }
    }

    /// Analysis from a parsed AI reply.
    ///
    /// An industry the catalog does not know is replaced by the keyword
    /// guess (at fallback confidence). Keyword slot extraction always runs and
    /// is merged alongside the AI's slots.
    pub fn from_ai(
        text: &str,
        extraction: AiExtraction,
        is_known_industry: impl Fn(&str) -> bool,
        thresholds: &ScoringThresholds,
    ) -> Self {
        let parsed = ParsedInput::parse(text);

        let chosen = extraction
            .sub_vertical
            .as_deref()
            .filter(|s| is_known_industry(s))
            .or_else(|| Some(extraction.industry.as_str()).filter(|i| is_known_industry(i)))
            .map(str::to_string);

        let Some(industry) = chosen else {
            tracing::debug!(
                reported = %extraction.industry,
                "AI industry unknown to catalog, using keyword guess"
            );
            let guess = guess_industry(&parsed);
            let mut analysis = Self::from_guess(parsed, guess, thresholds);
            analysis.slots.extend(extraction.slot_updates());
            if let Some(intent) = extraction.intent {
                analysis.intent = intent;
            }
            return analysis;
        };

        let confidence = extraction.confidence;
        let mut slots = vec![SlotUpdate::inferred(
            SlotPatch::Industry(industry.clone()),
            confidence.value(),
        )];
        if let Some(sub) = extraction.sub_vertical.as_deref().filter(|s| *s == industry) {
            slots.push(SlotUpdate::inferred(SlotPatch::SubVertical(sub.to_string()), confidence.value()));
        }
        slots.extend(extraction.slot_updates());
        slots.extend(deterministic_slots(&parsed));

        let sub_vertical_candidates = if extraction.sub_vertical.is_some() {
            Vec::new()
        } else {
            ambiguity_candidates(&parsed, &industry)
        };

        Self {
            intent: extraction.intent.unwrap_or_else(|| primary_intent(&parsed)),
            industry,
            confidence,
            sub_vertical_candidates,
            slots,
            source: AnalysisSource::Ai,
            parsed,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.sub_vertical_candidates.len() > 1
    }
}

fn deterministic_slots(parsed: &ParsedInput) -> Vec<SlotUpdate> {
    extract_slots(parsed)
        .into_iter()
        .map(|u| u.capped(DETERMINISTIC_SLOT_CAP))
        .collect()
}

fn primary_intent(parsed: &ParsedInput) -> String {
    parsed
        .intents
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_INTENT.to_string())
}
