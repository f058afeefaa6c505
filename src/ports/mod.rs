//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - text completion used by the input analyzer
//! - `KnowledgeCatalog` - read-only industry kits, features and bundles

mod ai_provider;
mod knowledge_catalog;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
pub use knowledge_catalog::KnowledgeCatalog;
