//! Interactive discovery session over stdin/stdout.
//!
//! The first line is the business description; every following line answers
//! the last question. The final app configuration is printed as JSON.

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use discovery_engine::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, OpenAIConfig, OpenAIProvider,
};
use discovery_engine::adapters::catalog::{CatalogError, StaticCatalog};
use discovery_engine::application::{
    AnalyzerConfig, ContinueDiscoveryCommand, DiscoveryHandler, InputAnalyzer,
    StartDiscoveryCommand,
};
use discovery_engine::config::{
    AiConfig, AiProvider, ConfigError, EngineConfig, LogFormat, TelemetryConfig, ValidationError,
};
use discovery_engine::domain::discovery::{DiscoveryEngine, TurnResponse};
use discovery_engine::ports::{AIError, AIProvider, KnowledgeCatalog};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("ai provider: {0}")]
    Provider(#[from] AIError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("discovery-engine: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = EngineConfig::load()?;
    config.validate()?;
    init_tracing(&config.telemetry);

    let catalog: Arc<dyn KnowledgeCatalog> = match &config.discovery.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog");
            Arc::new(StaticCatalog::from_yaml_file(path).await?)
        }
        None => Arc::new(StaticCatalog::builtin()),
    };

    let thresholds = config.discovery.thresholds();
    let engine = Arc::new(DiscoveryEngine::new(catalog.clone(), thresholds.clone()));
    let mut analyzer = InputAnalyzer::deterministic(catalog, thresholds).with_config(AnalyzerConfig {
        timeout: config.ai.timeout(),
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
        log_replies: config.features.log_ai_replies,
    });
    if config.ai_analysis_enabled() {
        if let Some(provider) = provider_chain(&config)? {
            analyzer = analyzer.with_provider(provider);
        }
    } else {
        info!("No AI provider configured, running on keyword analysis");
    }

    let handler = DiscoveryHandler::new(engine, analyzer);
    converse(&handler).await
}

fn init_tracing(telemetry: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(telemetry.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays a clean transcript.
    match telemetry.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn build_provider(ai: &AiConfig, which: AiProvider) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    match which {
        AiProvider::Anthropic => {
            let Some(key) = ai.anthropic_api_key.as_deref().filter(|k| !k.is_empty()) else {
                return Ok(None);
            };
            let mut cfg = AnthropicConfig::new(key)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.anthropic_model {
                cfg = cfg.with_model(model);
            }
            Ok(Some(Arc::new(AnthropicProvider::new(cfg)?)))
        }
        AiProvider::OpenAI => {
            let Some(key) = ai.openai_api_key.as_deref().filter(|k| !k.is_empty()) else {
                return Ok(None);
            };
            let mut cfg = OpenAIConfig::new(key)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(model) = &ai.openai_model {
                cfg = cfg.with_model(model);
            }
            if let Some(url) = &ai.openai_base_url {
                cfg = cfg.with_base_url(url);
            }
            Ok(Some(Arc::new(OpenAIProvider::new(cfg)?)))
        }
    }
}

/// Primary provider, wrapped in failover when a keyed fallback is enabled.
/// A missing primary key promotes the fallback.
fn provider_chain(config: &EngineConfig) -> Result<Option<Arc<dyn AIProvider>>, AIError> {
    let ai = &config.ai;
    let primary = build_provider(ai, ai.primary_provider)?;
    let fallback = match ai.fallback_provider {
        Some(which) if config.features.enable_ai_fallback => build_provider(ai, which)?,
        _ => None,
    };

    let chain: Option<Arc<dyn AIProvider>> = match (primary, fallback) {
        (Some(primary), Some(fallback)) => {
            info!(primary = ?ai.primary_provider, fallback = ?ai.fallback_provider, "AI analysis with failover");
            Some(Arc::new(FailoverAIProvider::new(primary).with_fallback(fallback)))
        }
        (Some(primary), None) => {
            info!(primary = ?ai.primary_provider, "AI analysis enabled");
            Some(primary)
        }
        (None, Some(fallback)) => {
            warn!(primary = ?ai.primary_provider, "Primary provider has no key, using fallback only");
            Some(fallback)
        }
        (None, None) => None,
    };
    Ok(chain)
}

async fn converse(handler: &DiscoveryHandler) -> Result<(), StartupError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt("Tell me about your business.")?;
    let Some(text) = lines.next_line().await? else {
        return Ok(());
    };
    let mut response = handler
        .start(StartDiscoveryCommand { text, seed: None })
        .await;

    while !response.complete {
        show(&response)?;
        let Some(reply) = lines.next_line().await? else {
            return Ok(());
        };
        response = handler
            .handle(ContinueDiscoveryCommand {
                state: response.state,
                reply,
            })
            .await;
    }

    show(&response)?;
    if let Some(app) = &response.app_config {
        println!("{}", serde_json::to_string_pretty(app)?);
    }
    Ok(())
}

fn show(response: &TurnResponse) -> Result<(), StartupError> {
    if let Some(message) = &response.message {
        println!("{message}");
    }
    if let Some(question) = &response.question {
        prompt(question)?;
    }
    Ok(())
}

fn prompt(text: &str) -> Result<(), StartupError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}")?;
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
