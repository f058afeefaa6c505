//! Property tests for the completion gate and the conversation counters.
//!
//! Random conversations are driven through the engine with a mix of keyword
//! analysis and AI analyses at arbitrary confidences.

use std::sync::Arc;

use proptest::prelude::*;

use discovery_engine::adapters::catalog::StaticCatalog;
use discovery_engine::domain::discovery::{
    AiExtraction, DiscoveryEngine, DiscoveryStep, InputAnalysis, ScoringThresholds, TurnResponse,
};
use discovery_engine::ports::KnowledgeCatalog;

const REPLIES: &[&str] = &[
    "I'm a solo plumber",
    "plumer emergencies",
    "we do real estate",
    "property management mostly",
    "I run a hair salon with 4 stylists",
    "yes",
    "no",
    "not quite, I also do car repairs",
    "skip",
    "just build it",
    "maybe",
    "we need online booking and payments",
    "dark",
    "Pipe Pros",
    "",
    "fitness",
    "the second one",
    "we use quickbooks and stripe",
];

const INDUSTRIES: &[&str] = &["plumber", "salon", "gym", "realtor", "general", "space_mining"];

#[derive(Debug, Clone)]
struct Turn {
    reply: usize,
    ai: Option<(usize, f64)>,
}

fn turn() -> impl Strategy<Value = Turn> {
    (
        0..REPLIES.len(),
        proptest::option::of((0..INDUSTRIES.len(), 0.0f64..=1.0)),
    )
        .prop_map(|(reply, ai)| Turn { reply, ai })
}

fn analysis(
    catalog: &dyn KnowledgeCatalog,
    thresholds: &ScoringThresholds,
    text: &str,
    (industry, confidence): (usize, f64),
) -> InputAnalysis {
    let extraction: AiExtraction = serde_json::from_value(serde_json::json!({
        "industry": INDUSTRIES[industry],
        "confidence": confidence,
        "slots": {"team_size": "small", "complexity": "moderate", "customer_facing": true},
    }))
    .expect("extraction json is well formed");
    InputAnalysis::from_ai(text, extraction, |i| catalog.has_industry(i), thresholds)
}

fn play(turns: &[Turn]) -> Vec<TurnResponse> {
    let catalog: Arc<dyn KnowledgeCatalog> = Arc::new(StaticCatalog::builtin());
    let thresholds = ScoringThresholds::default();
    let engine = DiscoveryEngine::new(catalog.clone(), thresholds.clone());

    let mut state = engine.new_state(Some(5));
    let mut responses = Vec::with_capacity(turns.len());
    for turn in turns {
        let text = REPLIES[turn.reply];
        let ai = turn
            .ai
            .filter(|_| engine.needs_analysis(&state, text))
            .map(|ai| analysis(catalog.as_ref(), &thresholds, text, ai));
        let response = engine.respond(state, text, ai);
        state = response.state.clone();
        responses.push(response);
    }
    responses
}

proptest! {
    #[test]
    fn never_completes_without_confirmation_or_certainty(
        turns in prop::collection::vec(turn(), 1..14)
    ) {
        let gate = ScoringThresholds::default().auto_complete;
        for response in play(&turns) {
            if response.complete {
                prop_assert!(
                    response.state.user_confirmed || response.confidence.value() >= gate,
                    "completed at {} without confirmation",
                    response.confidence
                );
                prop_assert!(response.app_config.is_some());
            } else {
                prop_assert!(response.app_config.is_none());
            }
        }
    }

    #[test]
    fn confidences_stay_in_unit_range(turns in prop::collection::vec(turn(), 1..14)) {
        for response in play(&turns) {
            let ledger = &response.state.collected_info;
            prop_assert!((0.0..=1.0).contains(&response.confidence.value()));
            prop_assert!((0.0..=1.0).contains(&response.state.analysis_confidence.value()));
            prop_assert!((0.0..=1.0).contains(&ledger.industry.confidence.value()));
            prop_assert!((0.0..=1.0).contains(&ledger.team_size.confidence.value()));
            for feature in &response.state.detected_features {
                prop_assert!((0.0..=1.0).contains(&feature.confidence.value()));
            }
        }
    }

    #[test]
    fn question_count_is_bounded_and_monotonic(turns in prop::collection::vec(turn(), 1..14)) {
        let thresholds = ScoringThresholds::default();
        let (min, max) = (thresholds.min_questions, thresholds.max_questions);
        let mut previous = 0;
        for response in play(&turns) {
            prop_assert!(response.question_count <= max);
            if matches!(
                response.step,
                DiscoveryStep::AskTheme | DiscoveryStep::AskBusinessName | DiscoveryStep::AwaitConfirmation
            ) {
                prop_assert!(
                    response.question_count >= min,
                    "reached {:?} after {} questions",
                    response.step,
                    response.question_count
                );
            }
            prop_assert!(response.question_count >= previous);
            previous = response.question_count;
        }
    }

    #[test]
    fn completion_is_final(turns in prop::collection::vec(turn(), 1..14)) {
        let mut completed = false;
        for response in play(&turns) {
            if completed {
                prop_assert!(response.complete);
            }
            completed = response.complete;
        }
    }
}
