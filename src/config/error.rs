//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("AI timeout must be between 1 and 60 seconds")]
    InvalidTimeout,

    #[error("AI temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("AI max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Fallback provider must differ from the primary provider")]
    FallbackSameAsPrimary,

    #[error("Threshold {0} must lie in [0, 1]")]
    ThresholdOutOfRange(&'static str),

    #[error("Auto-complete threshold must be at least 0.95")]
    AutoCompleteTooLow,

    #[error("Fallback confidence cap must sit below the auto-complete threshold")]
    FallbackCapTooHigh,

    #[error("min_questions must not exceed max_questions")]
    InvalidQuestionBounds,

    #[error("Raw AI reply logging is not allowed in production")]
    ReplyLoggingInProduction,
}
