//! Conversation steps and their legal edges.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a discovery conversation stands.
///
/// Corrections after a rejected summary stay in `AwaitConfirmation` with the
/// state's pending-confirmation flag cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStep {
    #[default]
    Init,
    AskRequired,
    AskOptional,
    AskTheme,
    AskBusinessName,
    AwaitConfirmation,
    Complete,
}

impl DiscoveryStep {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AskRequired => "ask_required",
            Self::AskOptional => "ask_optional",
            Self::AskTheme => "ask_theme",
            Self::AskBusinessName => "ask_business_name",
            Self::AwaitConfirmation => "await_confirmation",
            Self::Complete => "complete",
        }
    }

    pub fn is_personalization(&self) -> bool {
        matches!(self, Self::AskTheme | Self::AskBusinessName)
    }

    pub fn is_questioning(&self) -> bool {
        matches!(self, Self::AskRequired | Self::AskOptional)
    }
}

impl fmt::Display for DiscoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl StateMachine for DiscoveryStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DiscoveryStep::*;
        match self {
            Init => vec![AskRequired, AskTheme, AwaitConfirmation, Complete],
            AskRequired => vec![AskRequired, AskOptional, AskTheme, AwaitConfirmation, Complete],
            AskOptional => vec![AskTheme, AwaitConfirmation, Complete],
            AskTheme => vec![AskBusinessName, AwaitConfirmation, Complete],
            AskBusinessName => vec![AwaitConfirmation, Complete],
            AwaitConfirmation => vec![AwaitConfirmation, Complete],
            Complete => vec![],
        }
    }
}
