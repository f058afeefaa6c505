//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - text-completion providers (OpenAI, Anthropic, failover, mock)
//! - `catalog` - knowledge catalog (built-in or YAML)

pub mod ai;
pub mod catalog;

pub use ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, MockAIProvider, MockError,
    OpenAIConfig, OpenAIProvider,
};
pub use catalog::{CatalogData, CatalogError, StaticCatalog};
