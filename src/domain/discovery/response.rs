//! Turn responses and the final build configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::slot::{Complexity, TeamSize};
use super::state::ConversationState;
use super::step::DiscoveryStep;
use crate::domain::foundation::Confidence;

/// Build configuration handed to app generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub industry: String,
    pub team_size: TeamSize,
    pub complexity: Complexity,
    pub customer_facing: bool,
    pub features: Vec<String>,
    pub answers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_vertical: Option<String>,
    /// Matched behavior bundle id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    pub entities: Vec<String>,
    pub workflows: Vec<String>,
}

impl AppConfig {
    /// Builds the configuration from whatever the state holds. Unknown slots
    /// take defaults: team size from the ledger or small, complexity inferred
    /// from team size, internal-only unless stated otherwise.
    pub fn from_state(state: &ConversationState) -> Self {
        let ledger = &state.collected_info;
        let team_size = ledger.team_size.value.unwrap_or_default();
        let complexity = ledger
            .complexity
            .value
            .unwrap_or_else(|| Complexity::for_team_size(team_size));

        let mut entities: Vec<String> = ledger.primary_entities.value.clone().unwrap_or_default();
        let mut workflows = Vec::new();
        if let Some(behavior) = &state.matched_behavior {
            for entity in &behavior.entities {
                if !entities.contains(entity) {
                    entities.push(entity.clone());
                }
            }
            workflows = behavior.workflows.clone();
        }

        Self {
            industry: state.industry.clone(),
            team_size,
            complexity,
            customer_facing: ledger.customer_facing.value.unwrap_or(false),
            features: state.enabled_features.clone(),
            answers: state.answers.clone(),
            business_name: state.business_name.clone(),
            theme_preset: state.theme_preset.clone(),
            sub_vertical: ledger.sub_vertical.value.clone(),
            template: state.matched_behavior.as_ref().map(|b| b.id.clone()),
            entities,
            workflows,
        }
    }
}

/// What one turn returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_config: Option<AppConfig>,
    pub confidence: Confidence,
    pub step: DiscoveryStep,
    pub question_count: u8,
    pub enabled_features: Vec<String>,
    pub answers: BTreeMap<String, String>,
    pub pending_confirmation: bool,
    /// Updated state for the caller to keep.
    pub state: ConversationState,
}

impl TurnResponse {
    pub fn new(state: ConversationState, message: Option<String>, question: Option<String>) -> Self {
        let complete = state.is_complete();
        Self {
            message,
            question,
            complete,
            app_config: complete.then(|| AppConfig::from_state(&state)),
            confidence: state.confidence,
            step: state.step,
            question_count: state.question_count,
            enabled_features: state.enabled_features.clone(),
            answers: state.answers.clone(),
            pending_confirmation: state.pending_confirmation,
            state,
        }
    }
}
