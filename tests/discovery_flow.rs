//! End-to-end discovery conversations through the application handler.
//!
//! These tests run against the built-in catalog and exercise:
//! 1. Keyword-only conversations (no AI provider)
//! 2. AI-backed analysis, including malformed, slow and failing providers
//! 3. The confirmation loop and the completion gate

use std::sync::Arc;
use std::time::Duration;

use discovery_engine::adapters::ai::{FailoverAIProvider, MockAIProvider, MockError};
use discovery_engine::adapters::catalog::StaticCatalog;
use discovery_engine::application::{
    AnalyzerConfig, ContinueDiscoveryCommand, DiscoveryHandler, InputAnalyzer,
    StartDiscoveryCommand,
};
use discovery_engine::domain::discovery::{
    DiscoveryEngine, DiscoveryStep, ScoringThresholds, TeamSize, TurnResponse, ALREADY_COMPLETE,
    CONFIRMATION_PROMPT, THEME_QUESTION,
};
use discovery_engine::ports::{AIProvider, KnowledgeCatalog};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn handler_with(provider: Option<Arc<dyn AIProvider>>) -> DiscoveryHandler {
    let catalog: Arc<dyn KnowledgeCatalog> = Arc::new(StaticCatalog::builtin());
    let thresholds = ScoringThresholds::default();
    let engine = Arc::new(DiscoveryEngine::new(catalog.clone(), thresholds.clone()));
    let mut analyzer = InputAnalyzer::deterministic(catalog, thresholds).with_config(AnalyzerConfig {
        timeout: Duration::from_millis(100),
        ..Default::default()
    });
    if let Some(provider) = provider {
        analyzer = analyzer.with_provider(provider);
    }
    DiscoveryHandler::new(engine, analyzer)
}

fn keyword_handler() -> DiscoveryHandler {
    handler_with(None)
}

async fn open(handler: &DiscoveryHandler, text: &str) -> TurnResponse {
    handler
        .start(StartDiscoveryCommand {
            text: text.to_string(),
            seed: Some(11),
        })
        .await
}

async fn reply(handler: &DiscoveryHandler, previous: TurnResponse, text: &str) -> TurnResponse {
    handler
        .handle(ContinueDiscoveryCommand {
            state: previous.state,
            reply: text.to_string(),
        })
        .await
}

/// Answers questions in detail until the theme question comes up.
async fn to_theme(handler: &DiscoveryHandler, opening: &str) -> TurnResponse {
    let mut response = open(handler, opening).await;
    for _ in 0..6 {
        if response.step == DiscoveryStep::AskTheme {
            break;
        }
        response = reply(handler, response, "yes we handle that every single week").await;
    }
    assert_eq!(response.step, DiscoveryStep::AskTheme);
    response
}

async fn to_confirmation(handler: &DiscoveryHandler, opening: &str) -> TurnResponse {
    let response = to_theme(handler, opening).await;
    let response = reply(handler, response, "modern").await;
    let response = reply(handler, response, "Drip Doctors").await;
    assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
    response
}

// =============================================================================
// Keyword-only conversations
// =============================================================================

#[tokio::test]
async fn solo_plumber_skips_team_size_question() {
    let handler = keyword_handler();
    let response = open(&handler, "I'm a solo plumber").await;

    assert_eq!(response.state.industry, "plumber");
    assert_eq!(
        response.state.collected_info.team_size.value,
        Some(TeamSize::Solo)
    );
    assert_eq!(response.question_count, 1);
    assert!(response.answers.contains_key("team_size"));
    assert_eq!(response.state.pending_question.as_deref(), Some("emergency_calls"));
    assert_eq!(response.step, DiscoveryStep::AskRequired);
}

#[tokio::test]
async fn misspelled_industry_is_still_recognized() {
    let response = open(&keyword_handler(), "plumer emergencies").await;

    assert_eq!(response.state.industry, "plumber");
    assert!(response.enabled_features.contains(&"scheduling".to_string()));
}

#[tokio::test]
async fn just_build_it_completes_immediately() {
    let handler = keyword_handler();
    let response = open(&handler, "I run a hair salon").await;
    let response = reply(&handler, response, "just build it").await;

    assert!(response.complete);
    assert!(response.state.user_confirmed);
    let config = response.app_config.expect("complete response carries config");
    assert_eq!(config.industry, "salon");
}

#[tokio::test]
async fn keyword_only_conversation_needs_a_yes() {
    let handler = keyword_handler();
    let response = to_confirmation(&handler, "I run a plumbing company").await;

    assert!(!response.complete);
    assert!(response.pending_confirmation);
    assert!(response.confidence.value() < ScoringThresholds::default().auto_complete);
    assert!(response
        .question
        .clone()
        .unwrap_or_default()
        .ends_with(CONFIRMATION_PROMPT));

    let response = reply(&handler, response, "yes").await;
    assert!(response.complete);
    assert!(response.state.user_confirmed);
    let config = response.app_config.expect("complete response carries config");
    assert_eq!(config.business_name.as_deref(), Some("Drip Doctors"));
}

#[tokio::test]
async fn elaboration_at_confirmation_merges_features() {
    let handler = keyword_handler();
    let response = to_confirmation(&handler, "I run a plumbing company").await;
    let response = reply(&handler, response, "not quite, I also do car repairs").await;

    assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
    assert!(!response.complete);
    assert!(response.pending_confirmation);
    assert_eq!(response.state.industry, "plumber");
    assert!(response.enabled_features.contains(&"vehicle_history".to_string()));
}

#[tokio::test]
async fn chosen_sub_vertical_carries_only_its_own_kit() {
    let handler = keyword_handler();
    let response = open(&handler, "we do real estate").await;
    assert!(response.question.is_some());

    let response = reply(&handler, response, "property management").await;
    assert_eq!(response.state.industry, "property_manager");

    let response = reply(&handler, response, "just build it").await;
    let config = response.app_config.expect("complete response carries config");
    assert_eq!(config.industry, "property_manager");
    assert!(config.features.contains(&"tenant_portal".to_string()));
    assert!(!config.features.contains(&"property_listings".to_string()));
    assert!(!config.features.contains(&"lead_tracking".to_string()));
}

#[tokio::test]
async fn finished_conversation_ignores_further_replies() {
    let handler = keyword_handler();
    let done = open(&handler, "just build it").await;
    assert!(done.complete);

    let state = done.state.clone();
    let again = reply(&handler, done, "add invoicing please").await;
    assert_eq!(again.message.as_deref(), Some(ALREADY_COMPLETE));
    assert_eq!(again.state, state);
}

// =============================================================================
// AI-backed analysis
// =============================================================================

#[tokio::test]
async fn confident_ai_takes_the_fast_path() {
    let provider = MockAIProvider::new().with_response(
        r#"{"industry": "plumber", "confidence": 0.9, "slots": {"team_size": 3}}"#,
    );
    let handler = handler_with(Some(Arc::new(provider)));

    let response = open(&handler, "We fix pipes and drains around town").await;

    assert_eq!(response.state.industry, "plumber");
    assert_eq!(response.step, DiscoveryStep::AskTheme);
    assert_eq!(response.question.as_deref(), Some(THEME_QUESTION));
    assert_eq!(response.question_count, ScoringThresholds::default().min_questions);
}

#[tokio::test]
async fn near_certain_ai_completes_after_personalization() {
    let provider = MockAIProvider::new().with_response(
        r#"{"industry": "plumber", "confidence": 0.98,
            "slots": {"team_size": "solo", "complexity": "simple", "customer_facing": true}}"#,
    );
    let handler = handler_with(Some(Arc::new(provider)));

    let response = open(&handler, "I'm a plumber").await;
    assert_eq!(response.step, DiscoveryStep::AskTheme);
    let response = reply(&handler, response, "skip").await;
    let response = reply(&handler, response, "Pipe Pros").await;

    assert!(response.complete);
    assert!(!response.state.user_confirmed);
    assert!(response.confidence.value() >= ScoringThresholds::default().auto_complete);
}

#[tokio::test]
async fn malformed_ai_reply_falls_back_to_keywords() {
    let provider = MockAIProvider::new().with_response("I think this is a plumber!");
    let handler = handler_with(Some(Arc::new(provider.clone())));

    let response = open(&handler, "plumer emergencies").await;

    assert_eq!(provider.call_count(), 1);
    assert_eq!(response.state.industry, "plumber");
    assert!(response.state.analysis_confidence.value() <= ScoringThresholds::default().fallback_cap);
}

#[tokio::test]
async fn slow_ai_falls_back_to_keywords() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"industry": "gym", "confidence": 0.99}"#)
        .with_delay(Duration::from_secs(2));
    let handler = handler_with(Some(Arc::new(provider)));

    let response = open(&handler, "I run a hair salon").await;

    assert_eq!(response.state.industry, "salon");
    assert_ne!(response.step, DiscoveryStep::AskTheme);
}

#[tokio::test]
async fn failover_provider_answers_when_primary_is_down() {
    let primary = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "maintenance".to_string(),
    });
    let fallback = MockAIProvider::new()
        .with_response(r#"{"industry": "auto_repair", "confidence": 0.7}"#);
    let failover = FailoverAIProvider::new(Arc::new(primary)).with_fallback(Arc::new(fallback.clone()));
    let handler = handler_with(Some(Arc::new(failover)));

    let response = open(&handler, "We fix cars and do oil changes").await;

    assert_eq!(fallback.call_count(), 1);
    assert_eq!(response.state.industry, "auto_repair");
    assert!(response.enabled_features.contains(&"vehicle_history".to_string()));
}

#[tokio::test]
async fn unknown_ai_industry_uses_keyword_guess() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"industry": "underwater_basket_weaving", "confidence": 0.95}"#);
    let handler = handler_with(Some(Arc::new(provider)));

    let response = open(&handler, "I run a hair salon").await;

    assert_eq!(response.state.industry, "salon");
    assert_ne!(response.step, DiscoveryStep::AskTheme);
}

#[tokio::test]
async fn confirmations_do_not_call_the_provider() {
    let provider = MockAIProvider::new();
    let handler = handler_with(Some(Arc::new(provider.clone())));

    let response = to_confirmation(&handler, "I run a plumbing company").await;
    let calls = provider.call_count();
    let response = reply(&handler, response, "yes").await;

    assert!(response.complete);
    assert_eq!(provider.call_count(), calls);
}
