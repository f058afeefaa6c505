//! Certainty ledger: every slot known about one conversation.

use serde::{Deserialize, Serialize};

use super::slot::{Complexity, Slot, SlotName, SlotPatch, SlotSource, SlotUpdate, TeamSize};
use crate::domain::foundation::Confidence;

/// Share of the inferred complexity confidence relative to its team-size source.
const COMPLEXITY_INFERENCE_FACTOR: f64 = 0.8;

/// Slots that feed the overall confidence, with their weights.
const CONFIDENCE_WEIGHTS: [(SlotName, f64); 4] = [
    (SlotName::Industry, 0.4),
    (SlotName::TeamSize, 0.2),
    (SlotName::Complexity, 0.2),
    (SlotName::CustomerFacing, 0.2),
];

/// Slots worth asking about when unknown.
const GAP_CANDIDATES: [SlotName; 5] = [
    SlotName::Industry,
    SlotName::TeamSize,
    SlotName::Complexity,
    SlotName::CustomerFacing,
    SlotName::PrimaryEntities,
];

/// Fixed set of slots plus derived gaps and suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertaintyLedger {
    pub industry: Slot<String>,
    pub sub_vertical: Slot<String>,
    pub team_size: Slot<TeamSize>,
    pub complexity: Slot<Complexity>,
    pub customer_facing: Slot<bool>,
    pub primary_entities: Slot<Vec<String>>,
    pub integrations: Slot<Vec<String>>,
    #[serde(default)]
    pub gaps: Vec<SlotName>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl CertaintyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one slot delta. Returns true if the ledger changed.
    pub fn apply(&mut self, update: &SlotUpdate) -> bool {
        let confidence = update.confidence;
        let source = update.source;
        let changed = match &update.patch {
            SlotPatch::Industry(v) => self.industry.merge(v.clone(), confidence, source),
            SlotPatch::SubVertical(v) => self.sub_vertical.merge(v.clone(), confidence, source),
            SlotPatch::TeamSize(v) => self.team_size.merge(*v, confidence, source),
            SlotPatch::Complexity(v) => self.complexity.merge(*v, confidence, source),
            SlotPatch::CustomerFacing(v) => self.customer_facing.merge(*v, confidence, source),
            SlotPatch::PrimaryEntities(v) => self.primary_entities.merge_list(v, confidence, source),
            SlotPatch::Integrations(v) => self.integrations.merge_list(v, confidence, source),
        };
        if changed && update.slot() == SlotName::TeamSize {
            self.infer_complexity();
        }
        changed
    }

    /// Applies every delta in order. Returns the number that changed something.
    pub fn apply_all<'a>(&mut self, updates: impl IntoIterator<Item = &'a SlotUpdate>) -> usize {
        updates.into_iter().filter(|u| self.apply(u)).count()
    }

    /// Replaces a slot outright, whatever it held before. Reserved for direct
    /// user choices, which outrank anything inferred.
    pub fn overwrite(&mut self, update: &SlotUpdate) {
        match update.slot() {
            SlotName::Industry => self.industry = Slot::default(),
            SlotName::SubVertical => self.sub_vertical = Slot::default(),
            SlotName::TeamSize => self.team_size = Slot::default(),
            SlotName::Complexity => self.complexity = Slot::default(),
            SlotName::CustomerFacing => self.customer_facing = Slot::default(),
            SlotName::PrimaryEntities => self.primary_entities = Slot::default(),
            SlotName::Integrations => self.integrations = Slot::default(),
        }
        self.apply(update);
    }

    fn infer_complexity(&mut self) {
        if self.complexity.source == SlotSource::Explicit {
            return;
        }
        if let Some(size) = self.team_size.value {
            let confidence =
                Confidence::new(self.team_size.confidence.value() * COMPLEXITY_INFERENCE_FACTOR);
            self.complexity
                .merge(Complexity::for_team_size(size), confidence, SlotSource::Inferred);
        }
    }

    pub fn confidence_of(&self, slot: SlotName) -> Confidence {
        match slot {
            SlotName::Industry => self.industry.confidence,
            SlotName::SubVertical => self.sub_vertical.confidence,
            SlotName::TeamSize => self.team_size.confidence,
            SlotName::Complexity => self.complexity.confidence,
            SlotName::CustomerFacing => self.customer_facing.confidence,
            SlotName::PrimaryEntities => self.primary_entities.confidence,
            SlotName::Integrations => self.integrations.confidence,
        }
    }

    pub fn is_known(&self, slot: SlotName, threshold: f64) -> bool {
        match slot {
            SlotName::Industry => self.industry.is_known(threshold),
            SlotName::SubVertical => self.sub_vertical.is_known(threshold),
            SlotName::TeamSize => self.team_size.is_known(threshold),
            SlotName::Complexity => self.complexity.is_known(threshold),
            SlotName::CustomerFacing => self.customer_facing.is_known(threshold),
            SlotName::PrimaryEntities => self.primary_entities.is_known(threshold),
            SlotName::Integrations => self.integrations.is_known(threshold),
        }
    }

    /// Human-readable value of a slot, if set.
    pub fn describe(&self, slot: SlotName) -> Option<String> {
        match slot {
            SlotName::Industry => self.industry.value.clone(),
            SlotName::SubVertical => self.sub_vertical.value.clone(),
            SlotName::TeamSize => self.team_size.value.map(|v| v.label().to_string()),
            SlotName::Complexity => self.complexity.value.map(|v| v.label().to_string()),
            SlotName::CustomerFacing => self.customer_facing.value.map(|v| {
                if v { "customer-facing" } else { "internal only" }.to_string()
            }),
            SlotName::PrimaryEntities => self.primary_entities.value.as_ref().map(|v| v.join(", ")),
            SlotName::Integrations => self.integrations.value.as_ref().map(|v| v.join(", ")),
        }
    }

    /// Weighted mean of the core slot confidences.
    pub fn overall_confidence(&self) -> Confidence {
        let total: f64 = CONFIDENCE_WEIGHTS
            .iter()
            .map(|(slot, weight)| self.confidence_of(*slot).value() * weight)
            .sum();
        Confidence::new(total)
    }

    /// Recomputes `gaps` from the current slot state.
    pub fn refresh_gaps(&mut self, threshold: f64) {
        self.gaps = GAP_CANDIDATES
            .iter()
            .copied()
            .filter(|slot| !self.is_known(*slot, threshold))
            .collect();
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    /// Compact one-line-per-slot view, used as context for the AI provider.
    pub fn context_summary(&self) -> String {
        [
            SlotName::Industry,
            SlotName::SubVertical,
            SlotName::TeamSize,
            SlotName::Complexity,
            SlotName::CustomerFacing,
            SlotName::PrimaryEntities,
            SlotName::Integrations,
        ]
        .iter()
        .map(|slot| match self.describe(*slot) {
            Some(value) => format!("{}: {} ({})", slot, value, self.confidence_of(*slot)),
            None => format!("{}: unknown", slot),
        })
        .collect::<Vec<_>>()
        .join("\n")
    }
}
