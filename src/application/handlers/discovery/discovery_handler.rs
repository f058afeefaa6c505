//! DiscoveryHandler - start and continue discovery conversations.
//!
//! The handler owns nothing between calls: every turn takes the caller's
//! `ConversationState` and returns the updated copy inside the `TurnResponse`.

use std::sync::Arc;
use tracing::info;

use super::input_analyzer::InputAnalyzer;
use crate::domain::discovery::{prepare_input, ConversationState, DiscoveryEngine, TurnResponse};

/// Command to open a conversation with a business description.
#[derive(Debug, Clone)]
pub struct StartDiscoveryCommand {
    pub text: String,
    /// Fixes acknowledgment phrasing; random per conversation when absent.
    pub seed: Option<u64>,
}

/// Command to answer the engine's last prompt.
#[derive(Debug, Clone)]
pub struct ContinueDiscoveryCommand {
    pub state: ConversationState,
    pub reply: String,
}

/// Handler for both discovery commands.
pub struct DiscoveryHandler {
    engine: Arc<DiscoveryEngine>,
    analyzer: InputAnalyzer,
}

impl DiscoveryHandler {
    pub fn new(engine: Arc<DiscoveryEngine>, analyzer: InputAnalyzer) -> Self {
        Self { engine, analyzer }
    }

    pub fn engine(&self) -> &DiscoveryEngine {
        &self.engine
    }

    pub async fn start(&self, cmd: StartDiscoveryCommand) -> TurnResponse {
        let state = self.engine.new_state(cmd.seed);
        info!(discovery_id = %state.id, "Discovery started");
        self.turn(state, &cmd.text).await
    }

    pub async fn handle(&self, cmd: ContinueDiscoveryCommand) -> TurnResponse {
        self.turn(cmd.state, &cmd.reply).await
    }

    async fn turn(&self, state: ConversationState, text: &str) -> TurnResponse {
        let analysis = if self.engine.needs_analysis(&state, text) {
            let context = state.collected_info.context_summary();
            Some(
                self.analyzer
                    .analyze(state.id, &prepare_input(text), &context)
                    .await,
            )
        } else {
            None
        };

        let response = self.engine.respond(state, text, analysis);
        if response.complete {
            info!(
                discovery_id = %response.state.id,
                turns = response.state.turn,
                user_confirmed = response.state.user_confirmed,
                "Discovery complete"
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::catalog::StaticCatalog;
    use crate::domain::discovery::{DiscoveryStep, ScoringThresholds, REPROMPT};
    use crate::ports::KnowledgeCatalog;

    fn handler(provider: Option<MockAIProvider>) -> DiscoveryHandler {
        let catalog: Arc<dyn KnowledgeCatalog> = Arc::new(StaticCatalog::builtin());
        let thresholds = ScoringThresholds::default();
        let engine = Arc::new(DiscoveryEngine::new(catalog.clone(), thresholds.clone()));
        let mut analyzer = InputAnalyzer::deterministic(catalog, thresholds);
        if let Some(provider) = provider {
            analyzer = analyzer.with_provider(Arc::new(provider));
        }
        DiscoveryHandler::new(engine, analyzer)
    }

    fn start(text: &str) -> StartDiscoveryCommand {
        StartDiscoveryCommand {
            text: text.to_string(),
            seed: Some(7),
        }
    }

    #[tokio::test]
    async fn start_asks_first_question() {
        let response = handler(None).start(start("I run a hair salon")).await;

        assert!(!response.complete);
        assert_eq!(response.state.industry, "salon");
        assert_eq!(response.step, DiscoveryStep::AskRequired);
        assert!(response.question.is_some());
    }

    #[tokio::test]
    async fn empty_start_reprompts() {
        let response = handler(None).start(start("   ")).await;

        assert_eq!(response.message.as_deref(), Some(REPROMPT));
        assert_eq!(response.question_count, 0);
    }

    #[tokio::test]
    async fn quick_build_skips_the_provider() {
        let provider = MockAIProvider::new();
        let handler = handler(Some(provider.clone()));
        let opening = handler.start(start("I'm a plumber")).await;
        let calls_after_opening = provider.call_count();

        let response = handler
            .handle(ContinueDiscoveryCommand {
                state: opening.state,
                reply: "just build it".to_string(),
            })
            .await;

        assert!(response.complete);
        assert!(response.state.user_confirmed);
        assert_eq!(provider.call_count(), calls_after_opening);
    }

    #[tokio::test]
    async fn answers_are_analyzed_with_ledger_context() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"industry": "plumber", "confidence": 0.8}"#)
            .with_response(r#"{"industry": "plumber", "confidence": 0.8, "slots": {"team_size": 4}}"#);
        let handler = handler(Some(provider.clone()));

        let opening = handler.start(start("We fix pipes and drains")).await;
        handler
            .handle(ContinueDiscoveryCommand {
                state: opening.state,
                reply: "There are four of us".to_string(),
            })
            .await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].prompt.contains("plumber"));
    }
}
