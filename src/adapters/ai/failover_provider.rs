//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit, unavailable,
//! network, timeout), the request is replayed against the fallback provider.
//!
//! # Example
//!
//! ```ignore
//! let primary: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(openai_config)?);
//! let fallback: Arc<dyn AIProvider> = Arc::new(AnthropicProvider::new(anthropic_config)?);
//!
//! let provider = FailoverAIProvider::new(primary).with_fallback(fallback);
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
    fallbacks_taken: AtomicU64,
}

impl FailoverAIProvider {
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
            fallbacks_taken: AtomicU64::new(0),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Number of requests that were served (or attempted) by the fallback.
    pub fn fallbacks_taken(&self) -> u64 {
        self.fallbacks_taken.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        match self.fallback {
            Some(ref fallback) if err.is_retryable() => {
                self.fallbacks_taken.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    trace_id = %request.metadata.trace_id,
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    error = %err,
                    "primary AI provider failed, using fallback"
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.primary.estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}
