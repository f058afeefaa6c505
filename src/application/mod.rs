//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! the only suspending work (the AI call) happens here, the engine itself
//! stays synchronous.

pub mod handlers;

pub use handlers::{
    AnalyzerConfig, ContinueDiscoveryCommand, DiscoveryHandler, InputAnalyzer,
    StartDiscoveryCommand,
};
