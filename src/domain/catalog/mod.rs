//! Knowledge catalog vocabulary.
//!
//! Read-only data the discovery engine scores against: feature definitions,
//! behavior bundles (vertical templates) and per-industry kits. The data itself
//! is supplied through the `KnowledgeCatalog` port.

mod behavior;
mod feature;
mod kit;

pub use behavior::BehaviorBundle;
pub use feature::{FeatureDefinition, FeaturePriority};
pub use kit::{KitKnowledge, SmartQuestion};
