//! Behavior bundles: pre-packaged vertical templates.

use serde::{Deserialize, Serialize};

/// A vertical app template matched by score.
///
/// `weight` is the bundle's specificity on a 1-10 scale; generic bundles sit
/// low, narrow vertical bundles sit high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorBundle {
    pub id: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub workflows: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: u8,
}

fn default_weight() -> u8 {
    5
}

impl BehaviorBundle {
    pub fn new(id: impl Into<String>, keywords: &[&str], weight: u8) -> Self {
        Self {
            id: id.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            industries: Vec::new(),
            features: Vec::new(),
            entities: Vec::new(),
            workflows: Vec::new(),
            weight,
        }
    }

    pub fn with_industries(mut self, industries: &[&str]) -> Self {
        self.industries = industries.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_entities(mut self, entities: &[&str]) -> Self {
        self.entities = entities.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_workflows(mut self, workflows: &[&str]) -> Self {
        self.workflows = workflows.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_defaults_to_mid_scale() {
        let yaml = "id: generic\nkeywords: [business]\n";
        let bundle: BehaviorBundle = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bundle.weight, 5);
    }
}
