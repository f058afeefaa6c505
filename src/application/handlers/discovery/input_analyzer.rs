//! InputAnalyzer - turns a message into an `InputAnalysis`.
//!
//! Asks the AI provider first, bounded by a timeout. Any provider error,
//! timeout or unusable reply falls back to the keyword heuristics; the caller
//! never sees the failure.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::discovery::{
    extraction_prompt, InputAnalysis, ReplyExtractor, ScoringThresholds,
    EXTRACTION_SYSTEM_PROMPT,
};
use crate::domain::foundation::DiscoveryId;
use crate::ports::{AIProvider, CompletionRequest, KnowledgeCatalog, RequestMetadata};

/// Default bound on one provider call.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(12);

/// Settings for the AI half of the analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Debug-log every raw provider reply.
    pub log_replies: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
            max_tokens: 600,
            temperature: 0.1,
            log_replies: false,
        }
    }
}

/// Analyzer with an optional AI provider.
pub struct InputAnalyzer {
    provider: Option<Arc<dyn AIProvider>>,
    catalog: Arc<dyn KnowledgeCatalog>,
    thresholds: ScoringThresholds,
    extractor: ReplyExtractor,
    config: AnalyzerConfig,
}

impl InputAnalyzer {
    /// Keyword-only analyzer.
    pub fn deterministic(catalog: Arc<dyn KnowledgeCatalog>, thresholds: ScoringThresholds) -> Self {
        Self {
            provider: None,
            catalog,
            thresholds,
            extractor: ReplyExtractor::new(),
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn AIProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Analyzes `text`. `context` is the ledger summary sent alongside it.
    pub async fn analyze(
        &self,
        discovery_id: DiscoveryId,
        text: &str,
        context: &str,
    ) -> InputAnalysis {
        let Some(provider) = self.provider.as_ref() else {
            return InputAnalysis::fallback(text, &self.thresholds);
        };

        match self.ask(provider.as_ref(), discovery_id, text, context).await {
            Ok(analysis) => {
                debug!(
                    %discovery_id,
                    industry = %analysis.industry,
                    confidence = analysis.confidence.value(),
                    "AI analysis succeeded"
                );
                analysis
            }
            Err(reason) => {
                warn!(%discovery_id, %reason, "AI analysis failed, using keyword fallback");
                InputAnalysis::fallback(text, &self.thresholds)
            }
        }
    }

    async fn ask(
        &self,
        provider: &dyn AIProvider,
        discovery_id: DiscoveryId,
        text: &str,
        context: &str,
    ) -> Result<InputAnalysis, String> {
        let request = CompletionRequest::new(
            extraction_prompt(text, context),
            RequestMetadata::for_discovery(discovery_id),
        )
        .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature)
        .with_timeout(self.config.timeout);

        let response = tokio::time::timeout(self.config.timeout, provider.complete(request))
            .await
            .map_err(|_| format!("timed out after {}ms", self.config.timeout.as_millis()))?
            .map_err(|e| e.to_string())?;
        if self.config.log_replies {
            debug!(%discovery_id, reply = %response.content, "Provider reply");
        }

        let extraction = self
            .extractor
            .extract(&response.content)
            .map_err(|e| e.to_string())?;

        Ok(InputAnalysis::from_ai(
            text,
            extraction,
            |industry| self.catalog.has_industry(industry),
            &self.thresholds,
        ))
    }
}
