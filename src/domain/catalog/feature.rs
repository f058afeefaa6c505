//! Feature definitions and priorities.

use serde::{Deserialize, Serialize};

use crate::domain::discovery::ScoringThresholds;

/// How important a feature is to the generated application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePriority {
    #[default]
    NiceToHave,
    Important,
    Essential,
}

impl FeaturePriority {
    /// Derives a priority from a detection score.
    ///
    /// Above the essential cutoff is essential, from the important cutoff up to
    /// the essential cutoff is important, anything lower is nice-to-have.
    pub fn from_score(score: f64, thresholds: &ScoringThresholds) -> Self {
        if score > thresholds.priority_essential_cutoff {
            Self::Essential
        } else if score >= thresholds.priority_important_cutoff {
            Self::Important
        } else {
            Self::NiceToHave
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Important => "important",
            Self::NiceToHave => "nice to have",
        }
    }
}

/// A product feature the engine can switch on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub id: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub default_priority: FeaturePriority,
}

impl FeatureDefinition {
    pub fn new(id: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            id: id.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            intents: Vec::new(),
            dependencies: Vec::new(),
            conflicts: Vec::new(),
            industries: Vec::new(),
            default_priority: FeaturePriority::default(),
        }
    }

    pub fn with_intents(mut self, intents: &[&str]) -> Self {
        self.intents = intents.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_conflicts(mut self, conflicts: &[&str]) -> Self {
        self.conflicts = conflicts.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_industries(mut self, industries: &[&str]) -> Self {
        self.industries = industries.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn with_priority(mut self, priority: FeaturePriority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Keywords lowercased and de-duplicated, in declaration order.
    pub fn distinct_keywords(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.keywords.len());
        for keyword in &self.keywords {
            let lower = keyword.trim().to_lowercase();
            if !lower.is_empty() && !seen.contains(&lower) {
                seen.push(lower);
            }
        }
        seen
    }
}
