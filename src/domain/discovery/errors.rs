//! Discovery engine errors.
//!
//! None of these reach the caller: the engine intercepts them, logs them and
//! redirects the conversation.

use thiserror::Error;

use super::step::DiscoveryStep;
use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DiscoveryError {
    /// Completion was attempted below the gate without user confirmation.
    #[error("Cannot complete at {confidence:.2} confidence without user confirmation (needs {required:.2})")]
    PrematureCompletion { confidence: f64, required: f64 },

    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: DiscoveryStep, to: DiscoveryStep },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DiscoveryError {
    pub fn premature(confidence: f64, required: f64) -> Self {
        Self::PrematureCompletion { confidence, required }
    }

    pub fn invalid_transition(from: DiscoveryStep, to: DiscoveryStep) -> Self {
        Self::InvalidTransition { from, to }
    }
}
