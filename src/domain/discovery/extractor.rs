//! AI reply sanitization and extraction.
//!
//! The provider is asked for a single JSON object. Replies are cleaned of
//! control characters and prompt-injection markers, then the first JSON object
//! (fenced or bare) is parsed into an [`AiExtraction`].

use serde::Deserialize;
use thiserror::Error;

use super::slot::{Complexity, SlotPatch, SlotUpdate, TeamSize};
use crate::domain::foundation::Confidence;

/// Maximum accepted reply length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length kept for any single string field.
pub const MAX_FIELD_LENGTH: usize = 200;

/// System prompt sent with every analysis request.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "You classify small-business descriptions for an app builder. \
Reply with exactly one JSON object and nothing else. Fields: \
\"industry\" (snake_case id such as plumber, salon, auto_repair, or general), \
\"sub_vertical\" (string or null), \
\"intent\" (short snake_case phrase), \
\"confidence\" (number 0-1), \
\"slots\" (object with optional team_size: solo|small|medium|large or a headcount, \
complexity: simple|moderate|advanced, customer_facing: boolean, \
primary_entities: string array, integrations: string array).";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("Response is empty")]
    Empty,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Sanitization failed: {0}")]
    Sanitization(#[from] SanitizationError),

    #[error("No JSON object found in response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Slots as the provider reports them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AiSlots {
    /// Either a label or a headcount.
    #[serde(default)]
    pub team_size: Option<serde_json::Value>,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default)]
    pub customer_facing: Option<bool>,
    #[serde(default)]
    pub primary_entities: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
}

/// Parsed provider reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiExtraction {
    pub industry: String,
    #[serde(default)]
    pub sub_vertical: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub slots: AiSlots,
}

impl AiExtraction {
    /// Slot deltas carried by the reply, at the reply's confidence.
    pub fn slot_updates(&self) -> Vec<SlotUpdate> {
        let confidence = self.confidence.value();
        let mut updates = Vec::new();

        let team_size = self.slots.team_size.as_ref().and_then(|v| match v {
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(|count| TeamSize::from_headcount(u32::try_from(count).unwrap_or(u32::MAX))),
            serde_json::Value::String(s) => TeamSize::parse_label(s),
            _ => None,
        });
        if let Some(size) = team_size {
            updates.push(SlotUpdate::inferred(SlotPatch::TeamSize(size), confidence));
        }

        if let Some(complexity) = self.slots.complexity.as_deref().and_then(Complexity::parse_label) {
            updates.push(SlotUpdate::inferred(SlotPatch::Complexity(complexity), confidence));
        }

        if let Some(facing) = self.slots.customer_facing {
            updates.push(SlotUpdate::inferred(SlotPatch::CustomerFacing(facing), confidence));
        }

        let entities = normalize_ids(&self.slots.primary_entities);
        if !entities.is_empty() {
            updates.push(SlotUpdate::inferred(SlotPatch::PrimaryEntities(entities), confidence));
        }

        let integrations = normalize_ids(&self.slots.integrations);
        if !integrations.is_empty() {
            updates.push(SlotUpdate::inferred(SlotPatch::Integrations(integrations), confidence));
        }

        updates
    }
}

fn normalize_ids(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let id = to_snake_id(value);
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// `"Auto Repair"` -> `"auto_repair"`.
pub fn to_snake_id(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Builds the user prompt for one analysis request.
pub fn extraction_prompt(text: &str, context: &str) -> String {
    format!(
        "What we know so far:\n{}\n\nNew message from the business owner:\n\"\"\"\n{}\n\"\"\"",
        context, text
    )
}

/// Cleans provider replies before parsing.
#[derive(Debug, Clone, Default)]
pub struct ResponseSanitizer {
    additional_patterns: Vec<String>,
}

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_additional_patterns(mut self, patterns: Vec<String>) -> Self {
        self.additional_patterns = patterns;
        self
    }

    pub fn sanitize(&self, response: &str) -> Result<String, SanitizationError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let cleaned: String = response
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect();

        let mut stripped = cleaned;
        for pattern in INJECTION_MARKERS {
            stripped = stripped.replace(pattern, "");
        }
        for pattern in &self.additional_patterns {
            stripped = stripped.replace(pattern.as_str(), "");
        }

        if stripped.trim().is_empty() {
            return Err(SanitizationError::Empty);
        }
        Ok(stripped)
    }
}

const INJECTION_MARKERS: &[&str] = &[
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

/// Turns a provider reply into an [`AiExtraction`].
#[derive(Debug, Clone, Default)]
pub struct ReplyExtractor {
    sanitizer: ResponseSanitizer,
}

impl ReplyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sanitizer(sanitizer: ResponseSanitizer) -> Self {
        Self { sanitizer }
    }

    pub fn extract(&self, response: &str) -> Result<AiExtraction, ExtractionError> {
        let sanitized = self.sanitizer.sanitize(response)?;
        let json = find_json_object(&sanitized).ok_or(ExtractionError::NoJson)?;

        let mut extraction: AiExtraction =
            serde_json::from_str(json).map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        extraction.industry = to_snake_id(&extraction.industry);
        if extraction.industry.is_empty() {
            return Err(ExtractionError::MissingField("industry".to_string()));
        }
        extraction.sub_vertical = extraction
            .sub_vertical
            .map(|s| to_snake_id(&s))
            .filter(|s| !s.is_empty());
        extraction.intent = extraction.intent.map(|i| truncate(&i));
        Ok(extraction)
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_FIELD_LENGTH).collect()
}

/// The fenced ```json block if there is one, else the first balanced object.
fn find_json_object(text: &str) -> Option<&str> {
    if let Some(block) = fenced_block(text) {
        if let Some(start) = block.find('{') {
            return balanced_object(block, start);
        }
    }
    let start = text.find('{')?;
    balanced_object(text, start)
}

fn fenced_block(text: &str) -> Option<&str> {
    for fence in ["```json", "```JSON", "```"] {
        if let Some(open) = text.find(fence) {
            let body_start = open + fence.len();
            if let Some(len) = text[body_start..].find("```") {
                return Some(text[body_start..body_start + len].trim());
            }
        }
    }
    None
}

fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
