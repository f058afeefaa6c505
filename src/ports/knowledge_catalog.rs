//! Knowledge Catalog Port - read-only industry knowledge.
//!
//! Lookups never fail: an unknown industry id resolves to the default kit.

use crate::domain::catalog::{BehaviorBundle, FeatureDefinition, KitKnowledge};

/// Port for the static knowledge the engine scores against.
pub trait KnowledgeCatalog: Send + Sync {
    /// Kit for an industry, or the default kit when the id is unknown.
    fn kit(&self, industry: &str) -> &KitKnowledge;

    /// Returns true if the catalog has a kit for this exact id.
    fn has_industry(&self, industry: &str) -> bool;

    /// Every feature definition, in catalog order.
    fn features(&self) -> &[FeatureDefinition];

    /// Every behavior bundle, in catalog order.
    fn bundles(&self) -> &[BehaviorBundle];

    /// Id of the default kit.
    fn default_industry(&self) -> &str;
}
