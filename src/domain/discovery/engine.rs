//! Discovery engine - the conversation state machine.
//!
//! The engine is pure and synchronous. The caller re-supplies the
//! `ConversationState` every turn, together with an optional analysis of the
//! new text produced elsewhere (usually by the AI-backed input analyzer). When
//! no analysis is supplied the keyword fallback runs in place.
//!
//! Turn order: quick-build check, analysis merge, step handler, transition.
//! Every step change goes through [`StateMachine::can_transition_to`], and
//! COMPLETE is only reachable through the completion gate.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::analysis::{InputAnalysis, DETERMINISTIC_SLOT_CAP};
use super::behavior_matcher::BehaviorMatcher;
use super::errors::DiscoveryError;
use super::feature_detector::FeatureDetector;
use super::heuristics::{self, GENERAL_INDUSTRY};
use super::parsed_input::ParsedInput;
use super::phrases::{self, ConfirmationReply};
use super::response::TurnResponse;
use super::slot::{Complexity, SlotName, SlotPatch, SlotUpdate, TeamSize};
use super::state::ConversationState;
use super::step::DiscoveryStep;
use super::summary::render_summary;
use super::thresholds::ScoringThresholds;
use crate::domain::catalog::{FeaturePriority, SmartQuestion};
use crate::domain::foundation::{DiscoveryId, StateMachine};
use crate::ports::KnowledgeCatalog;

/// Longer inputs are cut before analysis.
pub const MAX_INPUT_CHARS: usize = 4_000;

pub const REPROMPT: &str =
    "I'd like to understand better. Could you tell me a bit more about your business?";
pub const ALREADY_COMPLETE: &str = "This discovery is already complete.";
pub const CORRECTION_PROMPT: &str = "No problem. What should I change?";
pub const THEME_QUESTION: &str = "What look and feel suits your business: modern, classic, bold, \
     professional, warm or dark? Say \"skip\" to keep the default.";
pub const BUSINESS_NAME_QUESTION: &str =
    "What's your business called? Say \"skip\" to leave it out.";
pub const BUILD_MESSAGE: &str = "Great, I have everything I need. Building your app now.";

/// Answer key of the disambiguation question between sibling industries.
pub const SUB_VERTICAL_QUESTION: &str = "sub_vertical";
const THEME_ANSWER: &str = "theme";
const BUSINESS_NAME_ANSWER: &str = "business_name";

/// Trims and truncates raw input to at most [`MAX_INPUT_CHARS`] characters.
pub fn prepare_input(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

/// What kind of message is being merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// The opening description.
    Opening,
    /// An answer to a smart question.
    Answer,
    /// Extra detail offered at the confirmation step.
    Elaboration,
}

/// Where a turn goes next.
#[derive(Debug, Clone, PartialEq)]
enum Next {
    Question {
        id: String,
        prompt: String,
        optional: bool,
    },
    Theme,
    BusinessName,
    Confirmation,
    Correction,
    Complete,
}

impl Next {
    fn step(&self) -> DiscoveryStep {
        match self {
            Next::Question { optional: false, .. } => DiscoveryStep::AskRequired,
            Next::Question { optional: true, .. } => DiscoveryStep::AskOptional,
            Next::Theme => DiscoveryStep::AskTheme,
            Next::BusinessName => DiscoveryStep::AskBusinessName,
            Next::Confirmation | Next::Correction => DiscoveryStep::AwaitConfirmation,
            Next::Complete => DiscoveryStep::Complete,
        }
    }
}

#[derive(Debug, Default)]
struct Prompt {
    message: Option<String>,
    question: Option<String>,
}

impl Prompt {
    fn question(text: impl Into<String>) -> Self {
        Self {
            message: None,
            question: Some(text.into()),
        }
    }

    fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            question: None,
        }
    }
}

/// Multi-turn discovery over one knowledge catalog.
pub struct DiscoveryEngine {
    catalog: Arc<dyn KnowledgeCatalog>,
    thresholds: ScoringThresholds,
    detector: FeatureDetector,
    matcher: BehaviorMatcher,
}

impl DiscoveryEngine {
    pub fn new(catalog: Arc<dyn KnowledgeCatalog>, thresholds: ScoringThresholds) -> Self {
        Self {
            detector: FeatureDetector::new(thresholds.clone()),
            matcher: BehaviorMatcher::new(thresholds.min_behavior_score),
            catalog,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn catalog(&self) -> &dyn KnowledgeCatalog {
        self.catalog.as_ref()
    }

    /// Fresh state. The seed defaults to one derived from the new id.
    pub fn new_state(&self, seed: Option<u64>) -> ConversationState {
        let id = DiscoveryId::new();
        ConversationState::new(id, seed.unwrap_or_else(|| id.seed()))
    }

    /// Starts a conversation from the opening description.
    pub fn start(
        &self,
        text: &str,
        analysis: Option<InputAnalysis>,
        seed: Option<u64>,
    ) -> TurnResponse {
        let state = self.new_state(seed);
        info!(discovery_id = %state.id, "Discovery started");
        self.respond(state, text, analysis)
    }

    /// Returns true if a turn with this text would use an input analysis.
    ///
    /// Lets the caller skip the AI call for replies that are classified
    /// locally: quick-build phrases, personalization answers and plain
    /// yes/no confirmations.
    pub fn needs_analysis(&self, state: &ConversationState, text: &str) -> bool {
        let text = text.trim();
        if state.is_complete() || text.is_empty() || self.is_quick_build(state, text) {
            return false;
        }
        match state.step {
            DiscoveryStep::Init | DiscoveryStep::AskRequired | DiscoveryStep::AskOptional => true,
            DiscoveryStep::AwaitConfirmation => match phrases::classify_confirmation(text) {
                ConfirmationReply::Elaboration => true,
                ConfirmationReply::Negative => !state.pending_confirmation,
                ConfirmationReply::Affirmative => false,
            },
            DiscoveryStep::AskTheme | DiscoveryStep::AskBusinessName | DiscoveryStep::Complete => false,
        }
    }

    /// Processes one user turn.
    pub fn respond(
        &self,
        mut state: ConversationState,
        text: &str,
        analysis: Option<InputAnalysis>,
    ) -> TurnResponse {
        if state.is_complete() {
            return TurnResponse::new(state, Some(ALREADY_COMPLETE.to_string()), None);
        }

        let text = prepare_input(text);
        if text.is_empty() {
            return TurnResponse::new(state, Some(REPROMPT.to_string()), None);
        }

        state.turn += 1;

        if self.is_quick_build(&state, &text) {
            info!(discovery_id = %state.id, step = %state.step, "Quick build requested");
            state.user_confirmed = true;
            let prompt = self.enter(&mut state, Next::Complete);
            return self.finish(state, prompt);
        }

        let analysis = if self.needs_analysis(&state, &text) {
            Some(analysis.unwrap_or_else(|| InputAnalysis::fallback(&text, &self.thresholds)))
        } else {
            None
        };

        let prompt = match state.step {
            DiscoveryStep::Init => {
                let analysis =
                    analysis.unwrap_or_else(|| InputAnalysis::fallback(&text, &self.thresholds));
                self.on_opening(&mut state, &text, analysis)
            }
            DiscoveryStep::AskRequired | DiscoveryStep::AskOptional => {
                self.on_answer(&mut state, &text, analysis)
            }
            DiscoveryStep::AskTheme => self.on_theme(&mut state, &text),
            DiscoveryStep::AskBusinessName => self.on_business_name(&mut state, &text),
            DiscoveryStep::AwaitConfirmation => self.on_confirmation(&mut state, &text, analysis),
            DiscoveryStep::Complete => Prompt::message(ALREADY_COMPLETE),
        };
        self.finish(state, prompt)
    }

    /// In personalization an exact "skip" skips one question. A business name
    /// only counts as a shortcut when the whole reply is a quick-build phrase.
    fn is_quick_build(&self, state: &ConversationState, text: &str) -> bool {
        if state.step.is_personalization() && phrases::is_exact_skip(text) {
            return false;
        }
        if state.step == DiscoveryStep::AskBusinessName {
            return phrases::is_whole_quick_build_phrase(text);
        }
        phrases::is_quick_build(text)
    }

    fn finish(&self, mut state: ConversationState, prompt: Prompt) -> TurnResponse {
        state.touch();
        let message = prompt
            .message
            .or_else(|| Some(phrases::acknowledgment_for(state.seed, state.turn).to_string()));
        debug!(
            discovery_id = %state.id,
            step = %state.step,
            question_count = state.question_count,
            confidence = %state.confidence,
            "Turn processed"
        );
        TurnResponse::new(state, message, prompt.question)
    }

    // ---- step handlers ----

    fn on_opening(&self, state: &mut ConversationState, text: &str, analysis: InputAnalysis) -> Prompt {
        state.description = text.to_string();
        state.analysis_confidence = analysis.confidence;
        state.sub_vertical_candidates = if analysis.is_ambiguous() {
            analysis.sub_vertical_candidates.clone()
        } else {
            Vec::new()
        };
        self.absorb(state, &analysis, Origin::Opening);

        info!(
            discovery_id = %state.id,
            industry = %state.industry,
            analysis_confidence = %analysis.confidence,
            source = ?analysis.source,
            "Opening analyzed"
        );

        if analysis.confidence.meets(self.thresholds.fast_path) && !analysis.is_ambiguous() {
            debug!(discovery_id = %state.id, "Fast path, crediting remaining questions");
            self.credit_remaining(state);
            return self.enter(state, Next::Theme);
        }

        let next = self.next_question(state);
        self.enter(state, next)
    }

    fn on_answer(
        &self,
        state: &mut ConversationState,
        reply: &str,
        analysis: Option<InputAnalysis>,
    ) -> Prompt {
        match state.pending_question.take() {
            Some(id) => {
                if id == SUB_VERTICAL_QUESTION {
                    self.choose_sub_vertical(state, reply);
                } else {
                    let kit = self.catalog.kit(&state.industry);
                    if let Some(question) = kit.question(&id) {
                        self.apply_slot_answer(state, question, reply);
                    }
                }
                state.answers.insert(id, reply.to_string());
                state.question_count = (state.question_count + 1).min(self.thresholds.max_questions);
            }
            None => debug!(discovery_id = %state.id, "Reply without a pending question"),
        }

        if let Some(analysis) = &analysis {
            self.absorb(state, analysis, Origin::Answer);
        }

        let next = self.next_question(state);
        self.enter(state, next)
    }

    fn on_theme(&self, state: &mut ConversationState, reply: &str) -> Prompt {
        if phrases::is_exact_skip(reply) {
            debug!(discovery_id = %state.id, "Theme skipped");
        } else {
            state.theme_preset = phrases::match_theme(reply).map(str::to_string);
            state.answers.insert(THEME_ANSWER.to_string(), reply.to_string());
        }
        self.enter(state, Next::BusinessName)
    }

    fn on_business_name(&self, state: &mut ConversationState, reply: &str) -> Prompt {
        if phrases::is_exact_skip(reply) {
            debug!(discovery_id = %state.id, "Business name skipped");
        } else if let Some(name) = phrases::clean_business_name(reply) {
            state.answers.insert(BUSINESS_NAME_ANSWER.to_string(), name.clone());
            state.business_name = Some(name);
        }

        if state.confidence.meets(self.thresholds.auto_complete) {
            self.enter(state, Next::Complete)
        } else {
            self.enter(state, Next::Confirmation)
        }
    }

    fn on_confirmation(
        &self,
        state: &mut ConversationState,
        reply: &str,
        analysis: Option<InputAnalysis>,
    ) -> Prompt {
        match (state.pending_confirmation, phrases::classify_confirmation(reply)) {
            (true, ConfirmationReply::Affirmative) => {
                state.user_confirmed = true;
                return self.enter(state, Next::Complete);
            }
            (true, ConfirmationReply::Negative) => return self.enter(state, Next::Correction),
            // A bare "yes" to the correction prompt re-shows the summary
            // unchanged; confirming still takes a "yes" to the summary itself.
            (false, ConfirmationReply::Affirmative) => {
                debug!(discovery_id = %state.id, "Nothing to correct, re-rendering summary");
                return self.enter(state, Next::Confirmation);
            }
            _ => {}
        }

        let analysis =
            analysis.unwrap_or_else(|| InputAnalysis::fallback(reply, &self.thresholds));
        self.absorb(state, &analysis, Origin::Elaboration);
        state
            .answers
            .insert(format!("elaboration_{}", state.turn), reply.to_string());
        self.enter(state, Next::Confirmation)
    }

    // ---- merging ----

    /// Merges an analysis into the ledger, then re-scores features and bundles.
    ///
    /// Follow-up replies may only set the industry while it is still general.
    fn absorb(&self, state: &mut ConversationState, analysis: &InputAnalysis, origin: Origin) {
        let industry_open = origin == Origin::Opening || state.industry == GENERAL_INDUSTRY;
        let updates = analysis.slots.iter().filter(|update| {
            industry_open || !matches!(update.slot(), SlotName::Industry | SlotName::SubVertical)
        });
        let changed = state.collected_info.apply_all(updates);

        if let Some(industry) = &state.collected_info.industry.value {
            if *industry != state.industry {
                debug!(from = %state.industry, to = %industry, "Industry resolved");
                state.industry = industry.clone();
            }
        }
        debug!(discovery_id = %state.id, changed, ?origin, "Slots merged");

        self.score(state, &analysis.parsed, origin);
    }

    fn score(&self, state: &mut ConversationState, parsed: &ParsedInput, origin: Origin) {
        let kit = self.catalog.kit(&state.industry);
        let detected =
            self.detector
                .detect(parsed, &state.industry, self.catalog.features(), kit);
        let declined = origin == Origin::Answer && phrases::is_declining(&parsed.raw);

        state.enable_features(&kit.core_features);
        for feature in detected {
            let wanted = match origin {
                Origin::Opening => feature.priority >= FeaturePriority::Important,
                Origin::Answer => !declined,
                Origin::Elaboration => true,
            };
            if wanted {
                state.enable_feature(&feature.id);
            }
            state.record_detection(feature);
        }

        let matched = self.matcher.find_match(
            parsed,
            &state.industry,
            &state.detected_features,
            self.catalog.bundles(),
        );
        state.record_behavior(matched);

        let suggestions = kit
            .optional_features
            .iter()
            .filter(|f| !state.enabled_features.contains(f))
            .map(|f| kit.describe_feature(f))
            .collect();
        state.collected_info.set_suggestions(suggestions);
        state.collected_info.refresh_gaps(self.thresholds.slot_known);
        state.confidence = state.collected_info.overall_confidence();
    }

    /// Direct parse of an answer to a slot-filling question. The answer is
    /// taken at face value, so it lands as explicit.
    fn apply_slot_answer(&self, state: &mut ConversationState, question: &SmartQuestion, reply: &str) {
        let patch = match question.slot {
            Some(SlotName::TeamSize) => TeamSize::parse_label(reply).map(SlotPatch::TeamSize),
            Some(SlotName::Complexity) => Complexity::parse_label(reply).map(SlotPatch::Complexity),
            Some(SlotName::CustomerFacing) => phrases::polarity(reply).map(SlotPatch::CustomerFacing),
            _ => None,
        };
        if let Some(patch) = patch {
            state
                .collected_info
                .apply(&SlotUpdate::explicit(patch, DETERMINISTIC_SLOT_CAP));
        }

        if !question.enables.is_empty() && !phrases::is_declining(reply) {
            state.enable_features(&question.enables);
        }
    }

    fn choose_sub_vertical(&self, state: &mut ConversationState, reply: &str) {
        let candidates = std::mem::take(&mut state.sub_vertical_candidates);
        let Some(choice) = self.pick_candidate(&candidates, reply) else {
            debug!(discovery_id = %state.id, industry = %state.industry, "No sub-vertical picked");
            return;
        };

        let confidence = state
            .collected_info
            .confidence_of(SlotName::Industry)
            .value()
            .max(DETERMINISTIC_SLOT_CAP);
        let ledger = &mut state.collected_info;
        ledger.overwrite(&SlotUpdate::explicit(SlotPatch::Industry(choice.clone()), confidence));
        ledger.overwrite(&SlotUpdate::explicit(SlotPatch::SubVertical(choice.clone()), confidence));

        info!(discovery_id = %state.id, industry = %choice, "Sub-vertical chosen");
        state.industry = choice;
        state.reset_scoring();

        let description = ParsedInput::parse(&state.description);
        self.score(state, &description, Origin::Opening);
    }

    fn pick_candidate(&self, candidates: &[String], reply: &str) -> Option<String> {
        let parsed = ParsedInput::parse(reply);

        let guess = heuristics::guess_industry(&parsed);
        if !guess.is_general() && !guess.is_ambiguous() && self.catalog.has_industry(&guess.industry) {
            return Some(guess.industry);
        }

        if let Some(named) = candidates.iter().find(|c| {
            parsed.contains_phrase(&c.replace('_', " "))
                || parsed.contains_phrase(&self.catalog.kit(c).label)
        }) {
            return Some(named.clone());
        }

        let index = if parsed.has_token("first") || parsed.has_token("1") {
            Some(0)
        } else if parsed.has_token("second") || parsed.has_token("2") {
            Some(1)
        } else {
            None
        };
        index.and_then(|i| candidates.get(i).cloned())
    }

    // ---- question selection ----

    /// Answer for a question whose slot the ledger already knows.
    fn known_answer(&self, state: &ConversationState, question: &SmartQuestion) -> Option<String> {
        let slot = question.slot?;
        if !state.collected_info.is_known(slot, self.thresholds.slot_known) {
            return None;
        }
        state.collected_info.describe(slot)
    }

    /// Next required question, crediting any whose slot is already known, then
    /// the optional follow-up, then personalization.
    fn next_question(&self, state: &mut ConversationState) -> Next {
        let min = self.thresholds.min_questions;
        while state.question_count < min {
            if state.sub_vertical_candidates.len() > 1 && !state.is_answered(SUB_VERTICAL_QUESTION) {
                return Next::Question {
                    id: SUB_VERTICAL_QUESTION.to_string(),
                    prompt: self.sub_vertical_prompt(&state.sub_vertical_candidates),
                    optional: false,
                };
            }

            let kit = self.catalog.kit(&state.industry);
            let Some(question) = kit.questions.iter().find(|q| !state.is_answered(&q.id)) else {
                debug!(industry = %state.industry, "Kit out of questions, crediting the rest");
                state.question_count = min;
                break;
            };

            match self.known_answer(state, question) {
                Some(answer) => {
                    debug!(question = %question.id, %answer, "Slot already known, question credited");
                    state.answers.insert(question.id.clone(), answer);
                    state.question_count += 1;
                }
                None => {
                    return Next::Question {
                        id: question.id.clone(),
                        prompt: question.prompt.clone(),
                        optional: false,
                    }
                }
            }
        }

        if let Some(question) = self.follow_up(state) {
            return Next::Question {
                id: question.id.clone(),
                prompt: question.prompt.clone(),
                optional: true,
            };
        }
        Next::Theme
    }

    /// The optional extra question, offered once when an asked answer was vague.
    fn follow_up(&self, state: &ConversationState) -> Option<&SmartQuestion> {
        let thresholds = &self.thresholds;
        if state.question_count != thresholds.min_questions
            || thresholds.min_questions >= thresholds.max_questions
            || !state.asked_answers().any(phrases::is_vague)
        {
            return None;
        }
        self.catalog
            .kit(&state.industry)
            .questions
            .iter()
            .find(|q| !state.is_answered(&q.id) && self.known_answer(state, q).is_none())
    }

    fn credit_remaining(&self, state: &mut ConversationState) {
        let min = self.thresholds.min_questions;
        let kit = self.catalog.kit(&state.industry);
        for question in &kit.questions {
            if state.question_count >= min {
                break;
            }
            if state.is_answered(&question.id) {
                continue;
            }
            if let Some(answer) = self.known_answer(state, question) {
                state.answers.insert(question.id.clone(), answer);
            }
            state.question_count += 1;
        }
        state.question_count = state.question_count.max(min);
    }

    fn sub_vertical_prompt(&self, candidates: &[String]) -> String {
        let labels: Vec<String> = candidates
            .iter()
            .map(|c| self.catalog.kit(c).label.clone())
            .collect();
        format!("Which describes you best: {}?", join_choices(&labels))
    }

    // ---- transitions ----

    fn enter(&self, state: &mut ConversationState, next: Next) -> Prompt {
        let target = next.step();
        if !state.step.can_transition_to(&target) {
            let error = DiscoveryError::invalid_transition(state.step, target);
            warn!(discovery_id = %state.id, %error, "Redirecting to confirmation");
            return self.confirm(state);
        }

        match next {
            Next::Question { id, prompt, .. } => {
                state.step = target;
                if !state.questions_asked.contains(&id) {
                    state.questions_asked.push(id.clone());
                }
                state.pending_question = Some(id);
                Prompt::question(prompt)
            }
            Next::Theme => {
                state.step = target;
                state.pending_question = None;
                Prompt::question(THEME_QUESTION)
            }
            Next::BusinessName => {
                state.step = target;
                Prompt::question(BUSINESS_NAME_QUESTION)
            }
            Next::Confirmation => self.confirm(state),
            Next::Correction => {
                state.step = target;
                state.pending_confirmation = false;
                Prompt::question(CORRECTION_PROMPT)
            }
            Next::Complete => self.complete(state),
        }
    }

    fn confirm(&self, state: &mut ConversationState) -> Prompt {
        state.step = DiscoveryStep::AwaitConfirmation;
        state.pending_question = None;
        state.pending_confirmation = true;
        let kit = self.catalog.kit(&state.industry);
        Prompt::question(render_summary(state, kit))
    }

    /// The completion gate: COMPLETE needs explicit user confirmation or
    /// overall confidence at the auto-complete threshold.
    fn complete(&self, state: &mut ConversationState) -> Prompt {
        let required = self.thresholds.auto_complete;
        if !state.user_confirmed && !state.confidence.meets(required) {
            let error = DiscoveryError::premature(state.confidence.value(), required);
            warn!(discovery_id = %state.id, %error, "Completion intercepted");
            return self.confirm(state);
        }

        state.step = DiscoveryStep::Complete;
        state.pending_question = None;
        state.pending_confirmation = false;
        info!(
            discovery_id = %state.id,
            industry = %state.industry,
            confirmed = state.user_confirmed,
            features = state.enabled_features.len(),
            "Discovery complete"
        );
        Prompt::message(BUILD_MESSAGE)
    }
}

/// `["A", "B", "C"]` -> `"A, B or C"`.
fn join_choices(labels: &[String]) -> String {
    match labels {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{BehaviorBundle, FeatureDefinition, KitKnowledge};
    use crate::domain::discovery::summary::CONFIRMATION_PROMPT;
    use crate::domain::foundation::Confidence;
    use std::collections::BTreeMap;

    struct TestCatalog {
        kits: Vec<KitKnowledge>,
        features: Vec<FeatureDefinition>,
        bundles: Vec<BehaviorBundle>,
    }

    impl KnowledgeCatalog for TestCatalog {
        fn kit(&self, industry: &str) -> &KitKnowledge {
            self.kits
                .iter()
                .find(|k| k.industry == industry)
                .unwrap_or(&self.kits[0])
        }

        fn has_industry(&self, industry: &str) -> bool {
            self.kits.iter().any(|k| k.industry == industry)
        }

        fn features(&self) -> &[FeatureDefinition] {
            &self.features
        }

        fn bundles(&self) -> &[BehaviorBundle] {
            &self.bundles
        }

        fn default_industry(&self) -> &str {
            GENERAL_INDUSTRY
        }
    }

    fn kit(industry: &str, label: &str, questions: Vec<SmartQuestion>, core: &[&str]) -> KitKnowledge {
        KitKnowledge {
            industry: industry.to_string(),
            label: label.to_string(),
            questions,
            core_features: core.iter().map(|c| c.to_string()).collect(),
            optional_features: vec!["online_payments".to_string()],
            feature_descriptions: BTreeMap::from([(
                "vehicle_history".to_string(),
                "Vehicle and repair history".to_string(),
            )]),
            sub_verticals: vec![],
        }
    }

    fn team_question() -> SmartQuestion {
        SmartQuestion::new("team_size", "How many people work with you?", "sizing")
            .filling(SlotName::TeamSize)
    }

    fn customers_question() -> SmartQuestion {
        SmartQuestion::new("customers", "Will customers use the app themselves?", "audience")
            .filling(SlotName::CustomerFacing)
            .enabling(&["online_booking"])
    }

    fn catalog() -> Arc<dyn KnowledgeCatalog> {
        let general = kit(
            GENERAL_INDUSTRY,
            "Small business",
            vec![
                SmartQuestion::new("offer", "What do you sell or offer?", "scope"),
                team_question(),
                customers_question(),
                SmartQuestion::new("tracking", "What do you track today?", "entities"),
            ],
            &[],
        );
        let plumber = kit(
            "plumber",
            "Plumbing",
            vec![
                team_question(),
                SmartQuestion::new("emergency", "Do you take emergency calls?", "dispatch")
                    .enabling(&["emergency_dispatch"]),
                customers_question(),
                SmartQuestion::new("invoices", "Do you send invoices after jobs?", "billing")
                    .enabling(&["invoicing"]),
                SmartQuestion::new("parts", "Do you track parts on the truck?", "inventory"),
            ],
            &["scheduling"],
        );
        let realtor = kit(
            "realtor",
            "Real estate agent",
            vec![
                team_question(),
                SmartQuestion::new("listings", "How many listings do you carry?", "scale"),
                customers_question(),
            ],
            &["listings"],
        );
        let property_manager = kit(
            "property_manager",
            "Property management",
            vec![
                SmartQuestion::new("units", "How many units do you manage?", "scale"),
                team_question(),
                customers_question(),
            ],
            &["maintenance_requests"],
        );

        Arc::new(TestCatalog {
            kits: vec![general, plumber, realtor, property_manager],
            features: vec![
                FeatureDefinition::new("scheduling", &["schedule", "appointment", "calendar"]),
                FeatureDefinition::new("invoicing", &["invoice", "billing"]),
                FeatureDefinition::new("payments", &["payment", "pay online"])
                    .with_dependencies(&["invoicing"]),
                FeatureDefinition::new(
                    "vehicle_history",
                    &["vehicle", "car repair", "auto repair", "repair history"],
                ),
            ],
            bundles: vec![BehaviorBundle::new("plumber", &["plumber", "plumbing"], 7)
                .with_industries(&["plumber"])
                .with_features(&["scheduling"])],
        })
    }

    fn engine() -> DiscoveryEngine {
        DiscoveryEngine::new(catalog(), ScoringThresholds::default())
    }

    fn reply(engine: &DiscoveryEngine, previous: TurnResponse, text: &str) -> TurnResponse {
        engine.respond(previous.state, text, None)
    }

    /// Answers every question with a detailed reply until personalization.
    fn to_theme(engine: &DiscoveryEngine, opening: &str) -> TurnResponse {
        let mut response = engine.start(opening, None, Some(7));
        for _ in 0..6 {
            if response.step == DiscoveryStep::AskTheme {
                break;
            }
            response = reply(engine, response, "yes we handle that every single week");
        }
        assert_eq!(response.step, DiscoveryStep::AskTheme);
        response
    }

    fn to_confirmation(engine: &DiscoveryEngine, opening: &str) -> TurnResponse {
        let response = to_theme(engine, opening);
        let response = reply(engine, response, "modern please");
        reply(engine, response, "Drip Doctors")
    }

    mod opening {
        use super::*;

        #[test]
        fn solo_plumber_resolves_slots_and_skips_team_question() {
            let engine = engine();
            let response = engine.start("I'm a solo plumber", None, Some(1));
            let ledger = &response.state.collected_info;

            assert_eq!(response.state.industry, "plumber");
            assert_eq!(ledger.team_size.value, Some(TeamSize::Solo));
            assert_eq!(ledger.complexity.value, Some(Complexity::Simple));

            assert_eq!(response.question_count, 1);
            assert_eq!(response.answers.get("team_size").map(String::as_str), Some("solo"));
            assert_eq!(response.state.questions_asked, vec!["emergency"]);
            assert_eq!(response.question.as_deref(), Some("Do you take emergency calls?"));
            assert_eq!(response.step, DiscoveryStep::AskRequired);
        }

        #[test]
        fn misspelled_industry_resolves_through_fallback() {
            let response = engine().start("plumer emergencies", None, Some(1));
            assert_eq!(response.state.industry, "plumber");
        }

        #[test]
        fn core_features_are_enabled() {
            let response = engine().start("I run a plumbing company", None, Some(1));
            assert!(response.enabled_features.contains(&"scheduling".to_string()));
        }

        #[test]
        fn fast_path_skips_to_personalization() {
            let engine = engine();
            let mut analysis = InputAnalysis::fallback("I'm a plumber", engine.thresholds());
            analysis.confidence = Confidence::new(0.9);

            let response = engine.start("I'm a plumber", Some(analysis), Some(1));
            assert_eq!(response.step, DiscoveryStep::AskTheme);
            assert_eq!(response.question_count, 3);
            assert_eq!(response.question.as_deref(), Some(THEME_QUESTION));
        }

        #[test]
        fn ambiguous_family_asks_sub_vertical_first() {
            let engine = engine();
            let response = engine.start("we do real estate", None, Some(1));
            assert_eq!(response.state.pending_question.as_deref(), Some(SUB_VERTICAL_QUESTION));
            let question = response.question.clone().unwrap_or_default();
            assert!(question.contains("Real estate agent or Property management"));

            let response = reply(&engine, response, "property management mostly");
            assert_eq!(response.state.industry, "property_manager");
            assert_eq!(
                response.state.collected_info.sub_vertical.value.as_deref(),
                Some("property_manager")
            );
            assert!(response.state.sub_vertical_candidates.is_empty());
            assert_eq!(response.question.as_deref(), Some("How many units do you manage?"));
            assert!(response.enabled_features.contains(&"maintenance_requests".to_string()));
        }

        #[test]
        fn sub_vertical_choice_drops_the_other_kit_features() {
            let engine = engine();
            let response = engine.start("we do real estate", None, Some(1));
            assert_eq!(response.state.industry, "realtor");
            assert!(response.enabled_features.contains(&"listings".to_string()));

            let response = reply(&engine, response, "property management");
            assert!(!response.enabled_features.contains(&"listings".to_string()));
            assert!(response.enabled_features.contains(&"maintenance_requests".to_string()));

            let response = reply(&engine, response, "just build it");
            let config = response.app_config.expect("complete response carries config");
            assert_eq!(config.industry, "property_manager");
            assert!(!config.features.contains(&"listings".to_string()));
        }

        #[test]
        fn empty_input_reprompts_without_touching_state() {
            let engine = engine();
            let state = engine.new_state(Some(3));
            let response = engine.respond(state.clone(), "   ", None);
            assert_eq!(response.message.as_deref(), Some(REPROMPT));
            assert_eq!(response.state, state);
        }

        #[test]
        fn long_input_is_truncated() {
            let long = "é".repeat(MAX_INPUT_CHARS + 500);
            assert_eq!(prepare_input(&long).chars().count(), MAX_INPUT_CHARS);
            assert_eq!(prepare_input("  short  "), "short");
        }
    }

    mod questions {
        use super::*;

        #[test]
        fn detailed_answers_reach_theme_after_three() {
            let response = to_theme(&engine(), "I run a plumbing company");
            assert_eq!(response.question_count, 3);
            assert!(response.state.pending_question.is_none());
        }

        #[test]
        fn vague_answer_earns_one_optional_question() {
            let engine = engine();
            let mut response = engine.start("I run a plumbing company", None, Some(1));
            for _ in 0..3 {
                response = reply(&engine, response, "yes");
            }
            assert_eq!(response.step, DiscoveryStep::AskOptional);
            assert_eq!(response.question_count, 3);

            let response = reply(&engine, response, "yes");
            assert_eq!(response.step, DiscoveryStep::AskTheme);
            assert_eq!(response.question_count, 4);
        }

        #[test]
        fn slot_answers_land_as_explicit() {
            let engine = engine();
            let response = engine.start("I run a plumbing company", None, Some(1));
            assert_eq!(response.state.pending_question.as_deref(), Some("team_size"));

            let response = reply(&engine, response, "solo");
            let ledger = &response.state.collected_info;
            assert_eq!(ledger.team_size.value, Some(TeamSize::Solo));
            assert_eq!(ledger.team_size.confidence, Confidence::new(DETERMINISTIC_SLOT_CAP));
        }

        #[test]
        fn declined_question_does_not_enable_its_features() {
            let engine = engine();
            let response = engine.start("I'm a solo plumber", None, Some(1));
            let response = reply(&engine, response, "no, we don't need that");
            assert!(!response.enabled_features.contains(&"emergency_dispatch".to_string()));
            assert_eq!(response.question_count, 2);
        }

        #[test]
        fn accepted_question_enables_its_features() {
            let engine = engine();
            let response = engine.start("I'm a solo plumber", None, Some(1));
            let response = reply(&engine, response, "yes, nights and weekends");
            assert!(response.enabled_features.contains(&"emergency_dispatch".to_string()));
        }
    }

    mod shortcuts {
        use super::*;

        #[test]
        fn quick_build_mid_questions_completes_confirmed() {
            let engine = engine();
            let response = engine.start("I run a plumbing company", None, Some(1));
            let response = reply(&engine, response, "about five of us");
            let response = reply(&engine, response, "just build it");

            assert!(response.complete);
            assert!(response.state.user_confirmed);
            assert_eq!(response.step, DiscoveryStep::Complete);
            assert_eq!(response.app_config.map(|c| c.industry), Some("plumber".to_string()));
        }

        #[test]
        fn skip_during_personalization_skips_one_question() {
            let engine = engine();
            let response = to_theme(&engine, "I run a plumbing company");
            let response = reply(&engine, response, "skip");
            assert_eq!(response.step, DiscoveryStep::AskBusinessName);
            assert!(response.state.theme_preset.is_none());

            let response = reply(&engine, response, "skip");
            assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
            assert!(response.state.business_name.is_none());
        }

        #[test]
        fn business_name_containing_shortcut_words_is_kept() {
            let engine = engine();
            for name in ["Build", "Just Build Co"] {
                let response = to_theme(&engine, "I run a plumbing company");
                let response = reply(&engine, response, "skip");
                let response = reply(&engine, response, name);

                assert!(!response.complete, "{name} triggered a quick build");
                assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
                assert_eq!(response.state.business_name.as_deref(), Some(name));
            }
        }

        #[test]
        fn whole_quick_build_phrase_still_works_at_name_step() {
            let engine = engine();
            let response = to_theme(&engine, "I run a plumbing company");
            let response = reply(&engine, response, "skip");
            let response = reply(&engine, response, "just build it");

            assert!(response.complete);
            assert!(response.state.user_confirmed);
            assert!(response.state.business_name.is_none());
        }

        #[test]
        fn replies_after_completion_change_nothing() {
            let engine = engine();
            let response = engine.start("just build it", None, Some(1));
            assert!(response.complete);

            let state = response.state.clone();
            let again = engine.respond(state.clone(), "actually add invoicing", None);
            assert_eq!(again.message.as_deref(), Some(ALREADY_COMPLETE));
            assert_eq!(again.state, state);
        }
    }

    mod confirmation {
        use super::*;

        #[test]
        fn personalization_leads_to_summary() {
            let response = to_confirmation(&engine(), "I run a plumbing company");
            assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
            assert!(response.pending_confirmation);
            assert!(!response.complete);
            assert_eq!(response.state.theme_preset.as_deref(), Some("modern"));
            assert_eq!(response.state.business_name.as_deref(), Some("Drip Doctors"));
            assert!(response.question.unwrap_or_default().ends_with(CONFIRMATION_PROMPT));
        }

        #[test]
        fn yes_completes_with_config() {
            let engine = engine();
            let response = to_confirmation(&engine, "I run a plumbing company");
            let response = reply(&engine, response, "yes");

            assert!(response.complete);
            assert!(response.state.user_confirmed);
            let config = response.app_config.expect("complete response carries config");
            assert_eq!(config.business_name.as_deref(), Some("Drip Doctors"));
            assert_eq!(config.theme_preset.as_deref(), Some("modern"));
            assert_eq!(response.message.as_deref(), Some(BUILD_MESSAGE));
        }

        #[test]
        fn no_asks_for_correction_then_loops_back() {
            let engine = engine();
            let response = to_confirmation(&engine, "I run a plumbing company");
            let response = reply(&engine, response, "no");
            assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
            assert!(!response.pending_confirmation);
            assert_eq!(response.question.as_deref(), Some(CORRECTION_PROMPT));

            let response = reply(&engine, response, "we need billing too");
            assert!(response.pending_confirmation);
            assert!(response.enabled_features.contains(&"invoicing".to_string()));
            assert!(response.question.unwrap_or_default().ends_with(CONFIRMATION_PROMPT));
        }

        #[test]
        fn yes_to_correction_prompt_reshows_summary() {
            let engine = engine();
            let response = to_confirmation(&engine, "I run a plumbing company");
            let answers_before = response.answers.len();
            let response = reply(&engine, response, "no");
            assert!(!response.pending_confirmation);

            let response = reply(&engine, response, "yes");
            assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
            assert!(response.pending_confirmation);
            assert!(!response.complete);
            assert_eq!(response.answers.len(), answers_before);
            assert!(response.question.clone().unwrap_or_default().ends_with(CONFIRMATION_PROMPT));

            let response = reply(&engine, response, "yes");
            assert!(response.complete);
            assert!(response.state.user_confirmed);
        }

        #[test]
        fn elaboration_merges_and_rerenders() {
            let engine = engine();
            let response = to_confirmation(&engine, "I run a plumbing company");
            let response = reply(&engine, response, "not quite, I also do car repairs");

            assert_eq!(response.step, DiscoveryStep::AwaitConfirmation);
            assert!(!response.complete);
            assert!(response.pending_confirmation);
            assert!(response.enabled_features.contains(&"vehicle_history".to_string()));
            assert!(response
                .answers
                .values()
                .any(|a| a == "not quite, I also do car repairs"));
            let summary = response.question.unwrap_or_default();
            assert!(summary.contains("Vehicle and repair history"));
            assert_eq!(response.state.industry, "plumber");
        }
    }

    mod gate {
        use super::*;

        #[test]
        fn completion_below_threshold_is_redirected() {
            let engine = engine();
            let mut state = engine.new_state(Some(1));
            state.step = DiscoveryStep::AwaitConfirmation;
            state.confidence = Confidence::new(0.6);

            let prompt = engine.enter(&mut state, Next::Complete);
            assert_eq!(state.step, DiscoveryStep::AwaitConfirmation);
            assert!(state.pending_confirmation);
            assert!(prompt.question.unwrap_or_default().ends_with(CONFIRMATION_PROMPT));
        }

        #[test]
        fn high_confidence_completes_unconfirmed() {
            let engine = engine();
            let mut state = engine.new_state(Some(1));
            state.step = DiscoveryStep::AskBusinessName;
            state.confidence = Confidence::new(0.97);

            let response = engine.respond(state, "Pipe Pros", None);
            assert!(response.complete);
            assert!(!response.state.user_confirmed);
        }

        #[test]
        fn invalid_transition_redirects_to_confirmation() {
            let engine = engine();
            let mut state = engine.new_state(Some(1));
            state.step = DiscoveryStep::AskBusinessName;

            engine.enter(
                &mut state,
                Next::Question {
                    id: "offer".to_string(),
                    prompt: "What do you sell?".to_string(),
                    optional: false,
                },
            );
            assert_eq!(state.step, DiscoveryStep::AwaitConfirmation);
            assert!(state.pending_confirmation);
        }
    }

    mod analysis_needs {
        use super::*;

        #[test]
        fn classified_locally_where_possible() {
            let engine = engine();
            let mut state = engine.new_state(Some(1));
            assert!(engine.needs_analysis(&state, "I'm a plumber"));
            assert!(!engine.needs_analysis(&state, "  "));
            assert!(!engine.needs_analysis(&state, "just build it"));

            state.step = DiscoveryStep::AskTheme;
            assert!(!engine.needs_analysis(&state, "dark"));

            state.step = DiscoveryStep::AwaitConfirmation;
            state.pending_confirmation = true;
            assert!(!engine.needs_analysis(&state, "yes"));
            assert!(engine.needs_analysis(&state, "not quite, I also do car repairs"));

            state.pending_confirmation = false;
            assert!(!engine.needs_analysis(&state, "yes"));
            assert!(engine.needs_analysis(&state, "no"));
            assert!(engine.needs_analysis(&state, "we need billing too"));
        }
    }

    #[test]
    fn same_seed_replays_same_messages() {
        let engine = engine();
        let a = engine.start("I'm a solo plumber", None, Some(99));
        let b = engine.start("I'm a solo plumber", None, Some(99));
        assert_eq!(a.message, b.message);
        assert_eq!(a.question, b.question);
    }

    #[test]
    fn join_choices_formats_lists() {
        let labels = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_choices(&labels(&["A"])), "A");
        assert_eq!(join_choices(&labels(&["A", "B"])), "A or B");
        assert_eq!(join_choices(&labels(&["A", "B", "C"])), "A, B or C");
    }
}
