//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `APP_DISCOVERY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use discovery_engine::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("AI analysis enabled: {}", config.ai_analysis_enabled());
//! ```

mod ai;
mod discovery;
mod error;
mod features;
mod telemetry;

pub use ai::{AiConfig, AiProvider};
pub use discovery::{DiscoveryConfig, MIN_AUTO_COMPLETE};
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use telemetry::{Environment, LogFormat, TelemetryConfig};

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "APP_DISCOVERY";

/// Root engine configuration
///
/// Every section has defaults, so an empty environment yields a working,
/// keyword-only engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// AI provider configuration (OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Thresholds and catalog source
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `APP_DISCOVERY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `APP_DISCOVERY__AI__TIMEOUT_SECS=12` -> `ai.timeout_secs = 12`
    /// - `APP_DISCOVERY__DISCOVERY__CATALOG_PATH=...` -> `discovery.catalog_path = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.discovery.validate()?;
        if self.features.enable_ai_fallback && self.ai.fallback_provider.is_none() {
            return Err(ValidationError::MissingRequired("ai.fallback_provider"));
        }
        if self.features.log_ai_replies && self.is_production() {
            return Err(ValidationError::ReplyLoggingInProduction);
        }
        Ok(())
    }

    /// Returns true if input analysis should call an AI provider.
    pub fn ai_analysis_enabled(&self) -> bool {
        self.features.enable_ai_analysis && self.ai.is_enabled()
    }

    pub fn is_production(&self) -> bool {
        self.telemetry.is_production()
    }
}
