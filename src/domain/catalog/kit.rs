//! Per-industry kit knowledge: smart questions and feature descriptions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::discovery::SlotName;

/// An industry-specific clarifying question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartQuestion {
    pub id: String,
    pub prompt: String,
    /// Why the question is asked; shown in debug traces, never to the user.
    pub purpose: String,
    /// Ledger slot the answer fills. A question whose slot is already known is
    /// credited without being asked.
    #[serde(default)]
    pub slot: Option<SlotName>,
    /// Features switched on by a non-negative answer.
    #[serde(default)]
    pub enables: Vec<String>,
}

impl SmartQuestion {
    pub fn new(id: &str, prompt: &str, purpose: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            purpose: purpose.to_string(),
            slot: None,
            enables: Vec::new(),
        }
    }

    pub fn filling(mut self, slot: SlotName) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn enabling(mut self, features: &[&str]) -> Self {
        self.enables = features.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Everything the engine knows about one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitKnowledge {
    pub industry: String,
    pub label: String,
    /// Asked in this order.
    pub questions: Vec<SmartQuestion>,
    /// Always enabled for this industry.
    #[serde(default)]
    pub core_features: Vec<String>,
    #[serde(default)]
    pub optional_features: Vec<String>,
    #[serde(default)]
    pub feature_descriptions: BTreeMap<String, String>,
    /// Narrower industries this kit can be split into, if any.
    #[serde(default)]
    pub sub_verticals: Vec<String>,
}

impl KitKnowledge {
    pub fn question(&self, id: &str) -> Option<&SmartQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Description for a feature, falling back to a humanized id.
    pub fn describe_feature(&self, feature_id: &str) -> String {
        self.feature_descriptions
            .get(feature_id)
            .cloned()
            .unwrap_or_else(|| humanize(feature_id))
    }
}

/// `online_booking` -> `Online booking`.
pub(crate) fn humanize(id: &str) -> String {
    let spaced = id.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit() -> KitKnowledge {
        KitKnowledge {
            industry: "plumber".to_string(),
            label: "Plumbing".to_string(),
            questions: vec![
                SmartQuestion::new("team_size", "How big is your team?", "sizing")
                    .filling(SlotName::TeamSize),
                SmartQuestion::new("booking", "Do customers book online?", "booking")
                    .enabling(&["online_booking"]),
            ],
            core_features: vec!["scheduling".to_string()],
            optional_features: vec![],
            feature_descriptions: BTreeMap::from([(
                "scheduling".to_string(),
                "Book jobs on a shared calendar".to_string(),
            )]),
            sub_verticals: vec![],
        }
    }

    #[test]
    fn finds_question_by_id() {
        let kit = kit();
        assert_eq!(kit.question("booking").unwrap().enables, vec!["online_booking"]);
        assert!(kit.question("missing").is_none());
    }

    #[test]
    fn describe_feature_prefers_catalog_text() {
        let kit = kit();
        assert_eq!(kit.describe_feature("scheduling"), "Book jobs on a shared calendar");
        assert_eq!(kit.describe_feature("online_booking"), "Online booking");
    }

    #[test]
    fn smart_question_slot_deserializes_snake_case() {
        let yaml = "id: size\nprompt: How many?\npurpose: sizing\nslot: team_size\n";
        let q: SmartQuestion = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(q.slot, Some(SlotName::TeamSize));
    }
}
