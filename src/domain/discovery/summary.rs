//! Confirmation summary rendering.

use super::slot::SlotName;
use super::state::ConversationState;
use crate::domain::catalog::KitKnowledge;

pub const CONFIRMATION_PROMPT: &str =
    "Does this look right? Say \"yes\" to build it, or tell me what to change.";

/// Renders what the engine believes, for the user to confirm or correct.
pub fn render_summary(state: &ConversationState, kit: &KitKnowledge) -> String {
    let ledger = &state.collected_info;
    let mut lines = vec!["Here's what I have so far:".to_string()];

    lines.push(format!("- Business: {}", kit.label));
    if let Some(sub) = ledger.describe(SlotName::SubVertical) {
        lines.push(format!("- Specialty: {}", sub.replace('_', " ")));
    }
    lines.push(format!(
        "- Team: {}",
        ledger.describe(SlotName::TeamSize).unwrap_or_else(|| "not sure yet".to_string())
    ));
    if let Some(complexity) = ledger.describe(SlotName::Complexity) {
        lines.push(format!("- Setup: {}", complexity));
    }
    lines.push(format!(
        "- Audience: {}",
        ledger
            .describe(SlotName::CustomerFacing)
            .unwrap_or_else(|| "not sure yet".to_string())
    ));
    if let Some(integrations) = ledger.describe(SlotName::Integrations) {
        lines.push(format!("- Connects to: {}", integrations));
    }

    if state.enabled_features.is_empty() {
        lines.push("- Features: the basics".to_string());
    } else {
        lines.push("- Features:".to_string());
        for feature in &state.enabled_features {
            lines.push(format!("  - {}", kit.describe_feature(feature)));
        }
    }

    if let Some(theme) = &state.theme_preset {
        lines.push(format!("- Look and feel: {}", theme));
    }
    if let Some(name) = &state.business_name {
        lines.push(format!("- Name: {}", name));
    }

    lines.push(String::new());
    lines.push(CONFIRMATION_PROMPT.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discovery::slot::{SlotPatch, SlotUpdate, TeamSize};
    use crate::domain::foundation::DiscoveryId;
    use std::collections::BTreeMap;

    fn kit() -> KitKnowledge {
        KitKnowledge {
            industry: "plumber".into(),
            label: "Plumbing".into(),
            questions: vec![],
            core_features: vec![],
            optional_features: vec![],
            feature_descriptions: BTreeMap::from([(
                "scheduling".to_string(),
                "Job scheduling".to_string(),
            )]),
            sub_verticals: vec![],
        }
    }

    #[test]
    fn lists_slots_features_and_personalization() {
        let mut state = ConversationState::new(DiscoveryId::new(), 3);
        state
            .collected_info
            .apply(&SlotUpdate::explicit(SlotPatch::TeamSize(TeamSize::Solo), 0.9));
        state.enable_feature("scheduling");
        state.enable_feature("vehicle_history");
        state.business_name = Some("Drip Doctors".into());

        let summary = render_summary(&state, &kit());
        assert!(summary.contains("- Business: Plumbing"));
        assert!(summary.contains("- Team: solo"));
        assert!(summary.contains("  - Job scheduling"));
        assert!(summary.contains("  - Vehicle history"));
        assert!(summary.contains("- Name: Drip Doctors"));
        assert!(summary.ends_with(CONFIRMATION_PROMPT));
    }

    #[test]
    fn unknown_slots_read_not_sure() {
        let state = ConversationState::new(DiscoveryId::new(), 3);
        let summary = render_summary(&state, &kit());
        assert!(summary.contains("- Team: not sure yet"));
        assert!(summary.contains("- Features: the basics"));
    }
}
