//! Discovery command handlers.

mod discovery_handler;
mod input_analyzer;

pub use discovery_handler::{ContinueDiscoveryCommand, DiscoveryHandler, StartDiscoveryCommand};
pub use input_analyzer::{AnalyzerConfig, InputAnalyzer, DEFAULT_ANALYSIS_TIMEOUT};
