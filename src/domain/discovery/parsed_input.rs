//! Lightweight lexical parse of one user message.
//!
//! No grammar here: the detector and matcher only need lowercase tokens, a
//! rough split into nouns and action verbs, adjacent word pairs, a few intent
//! triggers and the profession a speaker names for themselves.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Words that carry no signal on their own.
pub(crate) const STOPWORDS: &[&str] = &[
    "a", "about", "also", "am", "an", "and", "any", "are", "as", "at", "be", "been", "but",
    "by", "can", "could", "do", "does", "for", "from", "get", "got", "has", "have", "i",
    "i'm", "im", "in", "into", "is", "it", "it's", "its", "just", "like", "lot", "lots",
    "me", "mostly", "my", "need", "no", "not", "of", "on", "or", "our", "out", "really",
    "so", "some", "that", "the", "their", "them", "then", "there", "they", "this", "to",
    "too", "up", "us", "very", "want", "was", "we", "we're", "well", "what", "when", "who",
    "will", "with", "would", "yes", "you", "your",
];

/// Verbs that describe something the app should do.
pub(crate) const ACTION_VERBS: &[&str] = &[
    "accept", "assign", "bill", "book", "charge", "collect", "dispatch", "email", "estimate",
    "handle", "invoice", "list", "log", "manage", "message", "order", "organize", "pay",
    "plan", "quote", "remind", "rent", "reschedule", "schedule", "sell", "send", "ship",
    "show", "take", "text", "track",
];

/// Intent triggers. A trigger matches at the start of any word, so stems such
/// as `schedul` catch every inflection.
pub(crate) const INTENT_TRIGGERS: &[(&str, &[&str])] = &[
    ("scheduling", &["schedul", "appointment", "book", "calendar", "availability"]),
    ("invoicing", &["invoic", "bill", "billing"]),
    ("payments", &["pay", "payment", "card", "deposit", "checkout"]),
    ("customer_management", &["customer", "client", "crm", "contact"]),
    ("quoting", &["quote", "estimate", "bid", "proposal"]),
    ("inventory", &["inventory", "stock", "parts", "supplies"]),
    ("dispatch", &["dispatch", "route", "technician", "crew", "truck"]),
    ("communication", &["text", "sms", "email", "remind", "notify", "message"]),
    ("marketing", &["marketing", "promot", "newsletter", "campaign", "review"]),
    ("reporting", &["report", "analytic", "dashboard", "revenue", "metric"]),
    ("online_presence", &["website", "online", "portfolio", "gallery"]),
];

/// Adjectives allowed between the article and the profession.
const IDENTITY_ADJECTIVES: &str =
    "solo|small|local|independent|family|mobile|licensed|busy|new|certified|freelance|professional|residential|commercial";

static IDENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:i am|i'm|im|we are|we're|i run|we run|i own|we own|i work as)\s+(?:a|an)\s+(?:(?:{adj})\s+)*([a-z]+)(?:\s+([a-z]+))?",
        adj = IDENTITY_ADJECTIVES
    ))
    .expect("identity pattern is a valid regex")
});

/// Lexical view of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInput {
    pub raw: String,
    /// Lowercase, punctuation folded to spaces, whitespace collapsed.
    pub normalized: String,
    pub tokens: Vec<String>,
    pub nouns: Vec<String>,
    pub actions: Vec<String>,
    /// Adjacent pairs of content words, e.g. `"water heater"`.
    pub phrases: Vec<String>,
    pub intents: Vec<String>,
    /// Profession the speaker named for themselves ("I'm a plumber").
    pub identity: Option<String>,
}

impl ParsedInput {
    pub fn parse(text: &str) -> Self {
        let normalized = normalize(text);
        let tokens: Vec<String> = normalized.split_whitespace().map(str::to_string).collect();

        let mut nouns = Vec::new();
        let mut actions = Vec::new();
        for token in &tokens {
            if ACTION_VERBS.contains(&token.as_str()) {
                push_unique(&mut actions, token);
            } else if is_content_word(token) && token.len() >= 3 {
                push_unique(&mut nouns, token);
            }
        }

        let phrases = tokens
            .windows(2)
            .filter(|pair| is_content_word(&pair[0]) && is_content_word(&pair[1]))
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .fold(Vec::new(), |mut acc, phrase| {
                push_unique(&mut acc, &phrase);
                acc
            });

        let padded = format!(" {} ", normalized);
        let intents = INTENT_TRIGGERS
            .iter()
            .filter(|(_, triggers)| triggers.iter().any(|t| padded.contains(&format!(" {}", t))))
            .map(|(intent, _)| intent.to_string())
            .collect();

        let identity = extract_identity(&normalized);

        Self {
            raw: text.to_string(),
            normalized,
            tokens,
            nouns,
            actions,
            phrases,
            intents,
            identity,
        }
    }

    /// Whole-word (or whole-phrase) containment against the normalized text.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let needle = normalize(phrase);
        if needle.is_empty() {
            return false;
        }
        format!(" {} ", self.normalized).contains(&format!(" {} ", needle))
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn has_intent(&self, intent: &str) -> bool {
        self.intents.iter().any(|i| i == intent)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Count of words that are not stopwords.
    pub fn content_word_count(&self) -> usize {
        self.tokens.iter().filter(|t| is_content_word(t)).count()
    }
}

/// Lowercases and folds everything except letters, digits and apostrophes to
/// single spaces.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn is_content_word(token: &str) -> bool {
    !is_stopword(token) && !token.chars().all(|c| c.is_ascii_digit())
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

fn extract_identity(normalized: &str) -> Option<String> {
    let captures = IDENTITY_PATTERN.captures(normalized)?;
    let first = captures.get(1)?.as_str();
    if is_stopword(first) {
        return None;
    }
    match captures.get(2).map(|m| m.as_str()) {
        Some(second) if is_content_word(second) && !ACTION_VERBS.contains(&second) => {
            Some(format!("{} {}", first, second))
        }
        _ => Some(first.to_string()),
    }
}
