//! Slots: single named facts with confidence and provenance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Confidence;

/// Where a slot value came from. Ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    #[default]
    Default,
    Inferred,
    Explicit,
}

/// The closed set of slots the ledger tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    Industry,
    SubVertical,
    TeamSize,
    Complexity,
    CustomerFacing,
    PrimaryEntities,
    Integrations,
}

impl SlotName {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::SubVertical => "sub_vertical",
            Self::TeamSize => "team_size",
            Self::Complexity => "complexity",
            Self::CustomerFacing => "customer_facing",
            Self::PrimaryEntities => "primary_entities",
            Self::Integrations => "integrations",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Team size buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSize {
    Solo,
    /// 2-10 people.
    #[default]
    Small,
    /// 11-50 people.
    Medium,
    /// 51 and up.
    Large,
}

impl TeamSize {
    pub fn from_headcount(count: u32) -> Self {
        match count {
            0 | 1 => Self::Solo,
            2..=10 => Self::Small,
            11..=50 => Self::Medium,
            _ => Self::Large,
        }
    }

    /// Lenient parse of labels such as "solo", "2-10", "medium".
    pub fn parse_label(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        if let Ok(count) = lower.parse::<u32>() {
            return Some(Self::from_headcount(count));
        }
        match lower.as_str() {
            "solo" | "just me" | "one" | "1" | "individual" => Some(Self::Solo),
            "small" | "2-10" | "few" => Some(Self::Small),
            "medium" | "mid" | "11-50" => Some(Self::Medium),
            "large" | "51+" | "enterprise" => Some(Self::Large),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Small => "small team",
            Self::Medium => "medium team",
            Self::Large => "large team",
        }
    }
}

/// How much the generated app should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Advanced,
}

impl Complexity {
    /// Bigger teams need more structure.
    pub fn for_team_size(size: TeamSize) -> Self {
        match size {
            TeamSize::Solo => Self::Simple,
            TeamSize::Small => Self::Moderate,
            TeamSize::Medium | TeamSize::Large => Self::Advanced,
        }
    }

    pub fn parse_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "simple" | "basic" | "low" => Some(Self::Simple),
            "moderate" | "medium" | "standard" => Some(Self::Moderate),
            "advanced" | "complex" | "high" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Advanced => "advanced",
        }
    }
}

/// One ledger slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot<T> {
    pub value: Option<T>,
    pub confidence: Confidence,
    pub source: SlotSource,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            confidence: Confidence::ZERO,
            source: SlotSource::Default,
        }
    }
}

impl<T: Clone + PartialEq> Slot<T> {
    pub fn is_known(&self, threshold: f64) -> bool {
        self.value.is_some() && self.confidence.meets(threshold)
    }

    /// Merges a candidate value.
    ///
    /// An empty slot takes the candidate. The same value raises confidence to
    /// the larger of the two and keeps the stronger source. A different value
    /// replaces the current one only with strictly higher confidence, so a
    /// slot's confidence never goes down. Returns true when anything changed.
    pub fn merge(&mut self, value: T, confidence: Confidence, source: SlotSource) -> bool {
        match &self.value {
            None => {
                self.value = Some(value);
                self.confidence = confidence;
                self.source = source;
                true
            }
            Some(current) if *current == value => {
                let before = (self.confidence, self.source);
                self.confidence = self.confidence.max(confidence);
                self.source = self.source.max(source);
                before != (self.confidence, self.source)
            }
            Some(_) if confidence > self.confidence => {
                self.value = Some(value);
                self.confidence = confidence;
                self.source = source;
                true
            }
            Some(_) => false,
        }
    }
}

impl Slot<Vec<String>> {
    /// Union-merge for list slots, preserving first-seen order.
    pub fn merge_list(&mut self, items: &[String], confidence: Confidence, source: SlotSource) -> bool {
        if items.is_empty() {
            return false;
        }
        let list = self.value.get_or_insert_with(Vec::new);
        let mut changed = false;
        for item in items {
            if !list.contains(item) {
                list.push(item.clone());
                changed = true;
            }
        }
        let before = (self.confidence, self.source);
        self.confidence = self.confidence.max(confidence);
        self.source = self.source.max(source);
        changed || before != (self.confidence, self.source)
    }
}

/// A value for exactly one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slot", content = "value", rename_all = "snake_case")]
pub enum SlotPatch {
    Industry(String),
    SubVertical(String),
    TeamSize(TeamSize),
    Complexity(Complexity),
    CustomerFacing(bool),
    PrimaryEntities(Vec<String>),
    Integrations(Vec<String>),
}

impl SlotPatch {
    pub fn slot(&self) -> SlotName {
        match self {
            Self::Industry(_) => SlotName::Industry,
            Self::SubVertical(_) => SlotName::SubVertical,
            Self::TeamSize(_) => SlotName::TeamSize,
            Self::Complexity(_) => SlotName::Complexity,
            Self::CustomerFacing(_) => SlotName::CustomerFacing,
            Self::PrimaryEntities(_) => SlotName::PrimaryEntities,
            Self::Integrations(_) => SlotName::Integrations,
        }
    }
}

/// A slot delta produced by input analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub patch: SlotPatch,
    pub confidence: Confidence,
    pub source: SlotSource,
}

impl SlotUpdate {
    pub fn explicit(patch: SlotPatch, confidence: f64) -> Self {
        Self {
            patch,
            confidence: Confidence::new(confidence),
            source: SlotSource::Explicit,
        }
    }

    pub fn inferred(patch: SlotPatch, confidence: f64) -> Self {
        Self {
            patch,
            confidence: Confidence::new(confidence),
            source: SlotSource::Inferred,
        }
    }

    pub fn slot(&self) -> SlotName {
        self.patch.slot()
    }

    /// Same update with confidence lowered to at most `cap`.
    pub fn capped(mut self, cap: f64) -> Self {
        if self.confidence.value() > cap {
            self.confidence = Confidence::new(cap);
        }
        self
    }
}
