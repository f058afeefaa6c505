//! Trigger tables and reply classification.
//!
//! Quick-build, affirmation, negation and vagueness are all literal phrase
//! lists matched on whole words. Acknowledgments are drawn from a fixed pool
//! with an explicit RNG so a conversation replays identically.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use super::parsed_input::{is_stopword, normalize};

/// Phrases that end the conversation and build immediately, anywhere in a reply.
pub const QUICK_BUILD_PHRASES: &[&str] = &[
    "just build it",
    "build it now",
    "build now",
    "just build",
    "skip the questions",
    "skip questions",
    "skip all",
    "just make it",
    "make it now",
    "go ahead and build",
    "enough questions",
    "stop asking",
];

/// Replies that trigger quick-build only when they are the whole reply.
pub const QUICK_BUILD_EXACT: &[&str] = &["skip", "build it", "build"];

pub const AFFIRMATIVE_PHRASES: &[&str] = &[
    "yes", "yep", "yeah", "yup", "sure", "correct", "right", "exactly", "perfect", "ok",
    "okay", "confirm", "confirmed", "looks good", "sounds good", "looks right", "all good",
    "that's right", "that's it", "go ahead", "great", "lgtm",
];

pub const NEGATIVE_PHRASES: &[&str] = &[
    "no", "nope", "nah", "not quite", "not really", "not exactly", "not right",
    "not correct", "incorrect", "wrong", "that's not it", "that's wrong",
];

/// Ways to turn down a yes/no smart question.
const DECLINE_PHRASES: &[&str] = &["don't need", "do not need", "dont need", "never", "none"];

/// Words that carry no content once a polarity phrase is removed.
const FILLER_WORDS: &[&str] = &[
    "that's", "thats", "it's", "please", "thanks", "thank", "actually", "all", "looks",
    "sounds", "good", "great", "quite", "really", "right", "wrong", "correct", "exactly",
];

pub const ACKNOWLEDGMENTS: &[&str] = &[
    "Got it.",
    "Thanks, that helps.",
    "Great, noted.",
    "Perfect.",
    "Understood.",
    "Makes sense.",
];

/// Theme presets and the words that select them.
pub const THEME_PRESETS: &[(&str, &[&str])] = &[
    ("modern", &["modern", "sleek", "clean", "minimal", "minimalist"]),
    ("classic", &["classic", "traditional", "timeless", "elegant"]),
    ("bold", &["bold", "bright", "vibrant", "colorful", "colourful", "fun"]),
    ("professional", &["professional", "corporate", "serious", "trustworthy"]),
    ("warm", &["warm", "friendly", "cozy", "welcoming", "earthy"]),
    ("dark", &["dark", "moody", "night"]),
];

/// Lead-ins people put in front of their business name.
const NAME_PREFIXES: &[&str] = &[
    "it's called",
    "it is called",
    "we're called",
    "we are called",
    "our name is",
    "the name is",
    "my business is",
    "my company is",
    "call it",
    "name it",
    "it's",
];

const MAX_BUSINESS_NAME_CHARS: usize = 80;
const VAGUE_MIN_CHARS: usize = 10;

static VAGUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:yes|yeah|yep|no|nope|maybe|perhaps|probably|sometimes|not sure|idk|dunno|i don't know|i guess)\b(?:\s+\S+){0,2}$",
    )
    .expect("vague pattern is a valid regex")
});

/// How a reply to the confirmation summary reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationReply {
    Affirmative,
    Negative,
    /// Adds or corrects information.
    Elaboration,
}

fn padded(text: &str) -> String {
    format!(" {} ", normalize(text))
}

fn matching<'a>(padded_text: &str, phrases: &[&'a str]) -> Vec<&'a str> {
    phrases
        .iter()
        .copied()
        .filter(|p| padded_text.contains(&format!(" {} ", p)))
        .collect()
}

/// Content words left after removing the given phrases.
fn remaining_content_words(padded_text: &str, phrases: &[&str]) -> usize {
    let mut remainder = padded_text.to_string();
    let mut sorted: Vec<&str> = phrases.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));
    for phrase in sorted {
        remainder = remainder.replace(&format!(" {} ", phrase), " ");
    }
    remainder
        .split_whitespace()
        .filter(|w| !is_stopword(w) && !FILLER_WORDS.contains(w))
        .count()
}

pub fn is_quick_build(text: &str) -> bool {
    let normalized = normalize(text);
    if QUICK_BUILD_EXACT.contains(&normalized.as_str()) {
        return true;
    }
    !matching(&format!(" {} ", normalized), QUICK_BUILD_PHRASES).is_empty()
}

/// The whole reply is one of the multi-word quick-build phrases. Used where
/// free text such as a business name could contain a shortcut word.
pub fn is_whole_quick_build_phrase(text: &str) -> bool {
    QUICK_BUILD_PHRASES.contains(&normalize(text).as_str())
}

/// The reply is exactly "skip".
pub fn is_exact_skip(text: &str) -> bool {
    normalize(text) == "skip"
}

/// Negation wins over affirmation; either turns into an elaboration when the
/// reply carries at least two content words besides the polarity phrase.
pub fn classify_confirmation(text: &str) -> ConfirmationReply {
    let padded_text = padded(text);

    let negatives = matching(&padded_text, NEGATIVE_PHRASES);
    if !negatives.is_empty() {
        return if remaining_content_words(&padded_text, &negatives) >= 2 {
            ConfirmationReply::Elaboration
        } else {
            ConfirmationReply::Negative
        };
    }

    let affirmatives = matching(&padded_text, AFFIRMATIVE_PHRASES);
    if !affirmatives.is_empty() {
        return if remaining_content_words(&padded_text, &affirmatives) >= 2 {
            ConfirmationReply::Elaboration
        } else {
            ConfirmationReply::Affirmative
        };
    }

    ConfirmationReply::Elaboration
}

/// A smart-question answer that turns the offer down.
pub fn is_declining(text: &str) -> bool {
    let padded_text = padded(text);
    let negative = !matching(&padded_text, NEGATIVE_PHRASES).is_empty()
        || !matching(&padded_text, DECLINE_PHRASES).is_empty();
    negative && matching(&padded_text, AFFIRMATIVE_PHRASES).is_empty()
}

/// Yes or no, ignoring any detail that follows. `None` when the reply has
/// neither.
pub fn polarity(text: &str) -> Option<bool> {
    if is_declining(text) {
        return Some(false);
    }
    let padded_text = padded(text);
    (!matching(&padded_text, AFFIRMATIVE_PHRASES).is_empty()).then_some(true)
}

/// Short or noncommittal answers.
pub fn is_vague(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.chars().count() < VAGUE_MIN_CHARS || VAGUE_PATTERN.is_match(&normalize(trimmed))
}

pub fn acknowledgment<R: Rng>(rng: &mut R) -> &'static str {
    ACKNOWLEDGMENTS[rng.gen_range(0..ACKNOWLEDGMENTS.len())]
}

/// Deterministic acknowledgment for a given conversation turn.
pub fn acknowledgment_for(seed: u64, turn: u32) -> &'static str {
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(turn).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    acknowledgment(&mut rng)
}

/// Maps a free-text style preference onto a preset.
pub fn match_theme(text: &str) -> Option<&'static str> {
    let padded_text = padded(text);
    THEME_PRESETS
        .iter()
        .find(|(_, words)| words.iter().any(|w| padded_text.contains(&format!(" {} ", w))))
        .map(|(preset, _)| *preset)
}

/// Strips lead-ins and quotes from a business name reply.
pub fn clean_business_name(text: &str) -> Option<String> {
    let mut name = text.trim();
    let lower = name.to_lowercase();
    for prefix in NAME_PREFIXES {
        if lower.starts_with(prefix) && name.is_char_boundary(prefix.len()) {
            name = name[prefix.len()..].trim_start();
            break;
        }
    }
    let cleaned: String = name
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '!' || c.is_whitespace())
        .chars()
        .take(MAX_BUSINESS_NAME_CHARS)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
