//! In-memory knowledge catalog, built in or loaded from YAML.
//!
//! ```yaml
//! default_industry: general
//! features:
//!   - id: invoicing
//!     keywords: [invoice, billing]
//! bundles: []
//! kits:
//!   - industry: general
//!     label: General business
//!     questions: []
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

use crate::domain::catalog::{BehaviorBundle, FeatureDefinition, KitKnowledge};
use crate::ports::KnowledgeCatalog;

use super::builtin;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(String),

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("default industry '{0}' has no kit")]
    MissingDefaultKit(String),

    #[error("duplicate kit for industry '{0}'")]
    DuplicateKit(String),

    #[error("duplicate feature '{0}'")]
    DuplicateFeature(String),

    #[error("{owner} references unknown feature '{feature}'")]
    UnknownFeature { owner: String, feature: String },

    #[error("{owner} references unknown industry '{industry}'")]
    UnknownIndustry { owner: String, industry: String },

    #[error("kit '{kit}' asks question '{question}' twice")]
    DuplicateQuestion { kit: String, question: String },
}

/// Serialized catalog layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub default_industry: String,
    #[serde(default)]
    pub features: Vec<FeatureDefinition>,
    #[serde(default)]
    pub bundles: Vec<BehaviorBundle>,
    pub kits: Vec<KitKnowledge>,
}

impl CatalogData {
    /// Checks cross references: every id a kit, bundle or feature mentions
    /// must exist, and the default kit must be present.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut feature_ids = HashSet::new();
        for feature in &self.features {
            if !feature_ids.insert(feature.id.as_str()) {
                return Err(CatalogError::DuplicateFeature(feature.id.clone()));
            }
        }

        let mut industries = HashSet::new();
        for kit in &self.kits {
            if !industries.insert(kit.industry.as_str()) {
                return Err(CatalogError::DuplicateKit(kit.industry.clone()));
            }
        }
        if !industries.contains(self.default_industry.as_str()) {
            return Err(CatalogError::MissingDefaultKit(self.default_industry.clone()));
        }

        let known_feature = |owner: &str, feature: &str| {
            if feature_ids.contains(feature) {
                Ok(())
            } else {
                Err(CatalogError::UnknownFeature {
                    owner: owner.to_string(),
                    feature: feature.to_string(),
                })
            }
        };

        for feature in &self.features {
            let owner = format!("feature '{}'", feature.id);
            for id in feature.dependencies.iter().chain(&feature.conflicts) {
                known_feature(&owner, id)?;
            }
        }

        for bundle in &self.bundles {
            let owner = format!("bundle '{}'", bundle.id);
            for id in &bundle.features {
                known_feature(&owner, id)?;
            }
        }

        for kit in &self.kits {
            let owner = format!("kit '{}'", kit.industry);
            for id in kit.core_features.iter().chain(&kit.optional_features) {
                known_feature(&owner, id)?;
            }

            for sub in &kit.sub_verticals {
                if !industries.contains(sub.as_str()) {
                    return Err(CatalogError::UnknownIndustry {
                        owner: owner.clone(),
                        industry: sub.clone(),
                    });
                }
            }

            let mut asked = HashSet::new();
            for question in &kit.questions {
                if !asked.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestion {
                        kit: kit.industry.clone(),
                        question: question.id.clone(),
                    });
                }
                for id in &question.enables {
                    known_feature(&format!("{} question '{}'", owner, question.id), id)?;
                }
            }
        }

        Ok(())
    }
}

/// Read-only catalog held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    features: Vec<FeatureDefinition>,
    bundles: Vec<BehaviorBundle>,
    kits: Vec<KitKnowledge>,
    index: HashMap<String, usize>,
    default_index: usize,
}

impl StaticCatalog {
    /// Validates the data and indexes kits by industry.
    pub fn new(data: CatalogData) -> Result<Self, CatalogError> {
        data.validate()?;

        let index: HashMap<String, usize> = data
            .kits
            .iter()
            .enumerate()
            .map(|(i, kit)| (kit.industry.clone(), i))
            .collect();
        let default_index = index
            .get(&data.default_industry)
            .copied()
            .ok_or_else(|| CatalogError::MissingDefaultKit(data.default_industry.clone()))?;

        Ok(Self {
            features: data.features,
            bundles: data.bundles,
            kits: data.kits,
            index,
            default_index,
        })
    }

    /// The catalog compiled into the crate. The general kit comes first.
    pub fn builtin() -> Self {
        let data = builtin::data();
        let index: HashMap<String, usize> = data
            .kits
            .iter()
            .enumerate()
            .map(|(i, kit)| (kit.industry.clone(), i))
            .collect();

        Self {
            features: data.features,
            bundles: data.bundles,
            kits: data.kits,
            index,
            default_index: 0,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let data: CatalogData =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(data)
    }

    pub async fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let yaml = fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Industry ids in catalog order.
    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.kits.iter().map(|kit| kit.industry.as_str())
    }
}

impl KnowledgeCatalog for StaticCatalog {
    fn kit(&self, industry: &str) -> &KitKnowledge {
        let i = self.index.get(industry).copied().unwrap_or(self.default_index);
        &self.kits[i]
    }

    fn has_industry(&self, industry: &str) -> bool {
        self.index.contains_key(industry)
    }

    fn features(&self) -> &[FeatureDefinition] {
        &self.features
    }

    fn bundles(&self) -> &[BehaviorBundle] {
        &self.bundles
    }

    fn default_industry(&self) -> &str {
        &self.kits[self.default_index].industry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discovery::heuristics::{GENERAL_INDUSTRY, INDUSTRY_KEYWORDS};
    use crate::domain::discovery::{ScoringThresholds, MIN_QUESTIONS};
    use std::io::Write;

    const SMALL_CATALOG: &str = r#"
default_industry: general
features:
  - id: invoicing
    keywords: [invoice, billing]
    default_priority: essential
  - id: payments
    keywords: [payment, card]
    dependencies: [invoicing]
bundles:
  - id: bakery
    keywords: [bakery, bread]
    features: [payments]
    weight: 8
kits:
  - industry: general
    label: General business
    questions:
      - id: team_size
        prompt: How many people work with you?
        purpose: sizing
        slot: team_size
  - industry: bakery
    label: Bakery
    questions: []
    core_features: [invoicing]
"#;

    mod builtin_data {
        use super::*;

        #[test]
        fn validates() {
            assert_eq!(builtin::data().validate(), Ok(()));
        }

        #[test]
        fn general_kit_is_default() {
            let catalog = StaticCatalog::builtin();
            assert_eq!(catalog.default_industry(), GENERAL_INDUSTRY);
            assert_eq!(catalog.kit("underwater_basket_weaving").industry, GENERAL_INDUSTRY);
        }

        #[test]
        fn every_heuristic_industry_has_a_kit() {
            let catalog = StaticCatalog::builtin();
            for (industry, _) in INDUSTRY_KEYWORDS {
                assert!(catalog.has_industry(industry), "missing kit for {}", industry);
            }
            assert_eq!(catalog.industries().count(), INDUSTRY_KEYWORDS.len() + 1);
        }

        #[test]
        fn every_kit_has_enough_questions() {
            let catalog = StaticCatalog::builtin();
            let thresholds = ScoringThresholds::default();
            for industry in catalog.industries() {
                let kit = catalog.kit(industry);
                assert!(kit.questions.len() > MIN_QUESTIONS as usize, "{} is short", industry);
                assert!(kit.questions.len() >= thresholds.max_questions as usize);
            }
        }

        #[test]
        fn kit_features_carry_their_dependencies() {
            let catalog = StaticCatalog::builtin();
            let deps = |id: &str| -> Vec<String> {
                catalog
                    .features()
                    .iter()
                    .find(|f| f.id == id)
                    .map(|f| f.dependencies.clone())
                    .unwrap_or_default()
            };

            for industry in catalog.industries() {
                let kit = catalog.kit(industry);
                for core in &kit.core_features {
                    for dep in deps(core) {
                        assert!(kit.core_features.contains(&dep), "{}: {} needs {}", industry, core, dep);
                    }
                }
                for question in &kit.questions {
                    for enabled in &question.enables {
                        for dep in deps(enabled) {
                            assert!(
                                question.enables.contains(&dep) || kit.core_features.contains(&dep),
                                "{} question {}: {} needs {}",
                                industry,
                                question.id,
                                enabled,
                                dep
                            );
                        }
                    }
                }
            }
        }

        #[test]
        fn payments_depends_on_invoicing() {
            let catalog = StaticCatalog::builtin();
            let payments = catalog.features().iter().find(|f| f.id == "payments").unwrap();
            assert_eq!(payments.dependencies, vec!["invoicing"]);
        }

        #[test]
        fn kits_describe_their_core_features() {
            let catalog = StaticCatalog::builtin();
            for industry in catalog.industries() {
                let kit = catalog.kit(industry);
                for core in &kit.core_features {
                    assert!(kit.feature_descriptions.contains_key(core), "{}: {}", industry, core);
                }
            }
        }
    }

    mod yaml {
        use super::*;

        #[test]
        fn loads_small_catalog() {
            let catalog = StaticCatalog::from_yaml_str(SMALL_CATALOG).unwrap();

            assert!(catalog.has_industry("bakery"));
            assert_eq!(catalog.kit("bakery").core_features, vec!["invoicing"]);
            assert_eq!(catalog.kit("florist").industry, "general");
            assert_eq!(catalog.bundles()[0].weight, 8);
        }

        #[test]
        fn rejects_missing_default_kit() {
            let yaml = SMALL_CATALOG.replace("default_industry: general", "default_industry: other");
            assert_eq!(
                StaticCatalog::from_yaml_str(&yaml).unwrap_err(),
                CatalogError::MissingDefaultKit("other".to_string())
            );
        }

        #[test]
        fn rejects_unknown_dependency() {
            let yaml = SMALL_CATALOG.replace("dependencies: [invoicing]", "dependencies: [ledger]");
            assert!(matches!(
                StaticCatalog::from_yaml_str(&yaml),
                Err(CatalogError::UnknownFeature { feature, .. }) if feature == "ledger"
            ));
        }

        #[test]
        fn rejects_malformed_yaml() {
            assert!(matches!(
                StaticCatalog::from_yaml_str("kits: [unterminated"),
                Err(CatalogError::Parse(_))
            ));
        }

        #[tokio::test]
        async fn loads_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(SMALL_CATALOG.as_bytes()).unwrap();

            let catalog = StaticCatalog::from_yaml_file(file.path()).await.unwrap();

            assert_eq!(catalog.features().len(), 2);
        }

        #[tokio::test]
        async fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let result = StaticCatalog::from_yaml_file(dir.path().join("nope.yaml")).await;
            assert!(matches!(result, Err(CatalogError::Io(_))));
        }
    }
}
