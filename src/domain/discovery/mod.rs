//! Discovery domain - turns business descriptions into build configurations.
//!
//! # Components
//!
//! - `ParsedInput` - lexical view of a message (tokens, nouns, intents, identity)
//! - `FeatureDetector` - additive signal scoring with a dependency gate
//! - `BehaviorMatcher` - picks the vertical template that best fits
//! - `InputAnalysis` - industry guess and slot deltas, from AI or keywords
//! - `CertaintyLedger` - slots with confidence and provenance
//! - `DiscoveryEngine` - the turn-based state machine and completion gate
//!
//! Everything here is synchronous and free of I/O. The AI call lives in the
//! application layer and hands its result in as an `InputAnalysis`.

mod analysis;
mod behavior_matcher;
mod engine;
mod errors;
mod extractor;
mod feature_detector;
pub mod heuristics;
mod ledger;
mod parsed_input;
pub mod phrases;
mod response;
mod slot;
mod state;
mod step;
mod summary;
mod thresholds;

pub use analysis::{AnalysisSource, InputAnalysis, DEFAULT_INTENT, DETERMINISTIC_SLOT_CAP};
pub use behavior_matcher::{BehaviorMatcher, MatchedBehavior};
pub use engine::{
    prepare_input, DiscoveryEngine, ALREADY_COMPLETE, BUILD_MESSAGE, BUSINESS_NAME_QUESTION,
    CORRECTION_PROMPT, MAX_INPUT_CHARS, REPROMPT, SUB_VERTICAL_QUESTION, THEME_QUESTION,
};
pub use errors::DiscoveryError;
pub use extractor::{
    extraction_prompt, AiExtraction, AiSlots, ExtractionError, ReplyExtractor, ResponseSanitizer,
    SanitizationError, EXTRACTION_SYSTEM_PROMPT,
};
pub use feature_detector::{DetectedFeature, FeatureDetector};
pub use ledger::CertaintyLedger;
pub use parsed_input::{normalize, ParsedInput};
pub use response::{AppConfig, TurnResponse};
pub use slot::{Complexity, Slot, SlotName, SlotPatch, SlotSource, SlotUpdate, TeamSize};
pub use state::ConversationState;
pub use step::DiscoveryStep;
pub use summary::{render_summary, CONFIRMATION_PROMPT};
pub use thresholds::{
    ScoringThresholds, ALWAYS_INCLUDE_CONFIDENCE, AUTO_COMPLETE_THRESHOLD,
    DEPENDENCY_GATE_THRESHOLD, FALLBACK_CONFIDENCE_CAP, FAST_PATH_THRESHOLD, MAX_QUESTIONS,
    MIN_BEHAVIOR_SCORE, MIN_FEATURE_SCORE, MIN_QUESTIONS, PRIORITY_ESSENTIAL_CUTOFF,
    PRIORITY_IMPORTANT_CUTOFF, SLOT_KNOWN_THRESHOLD,
};
