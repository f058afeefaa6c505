//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod discovery;

pub use discovery::{
    AnalyzerConfig, ContinueDiscoveryCommand, DiscoveryHandler, InputAnalyzer,
    StartDiscoveryCommand, DEFAULT_ANALYSIS_TIMEOUT,
};
