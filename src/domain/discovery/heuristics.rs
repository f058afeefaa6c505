//! Deterministic keyword heuristics.
//!
//! Used when the AI provider is disabled, slow or returns garbage, and always
//! for slot extraction. Every table here is plain data so it can be tested on
//! its own.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::parsed_input::ParsedInput;
use super::slot::{Complexity, SlotPatch, SlotUpdate, TeamSize};
use crate::domain::foundation::Confidence;

/// Industry used when nothing matches.
pub const GENERAL_INDUSTRY: &str = "general";

const SELF_IDENTIFIED_CONFIDENCE: f64 = 0.65;
const MULTI_WORD_CONFIDENCE: f64 = 0.55;
const SINGLE_WORD_CONFIDENCE: f64 = 0.45;
const NO_MATCH_CONFIDENCE: f64 = 0.15;

/// Industry keyword table, including common misspellings. Table order breaks
/// score ties.
pub const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "plumber",
        &[
            "plumber", "plumbers", "plumbing", "plumer", "plumbr", "plummer", "pluming",
            "drain", "drains", "pipes", "leak", "leaks", "water heater", "sewer", "faucet",
        ],
    ),
    (
        "electrician",
        &[
            "electrician", "electricians", "electrical", "elecrician", "electrican", "wiring",
            "panel upgrade", "circuit breaker", "outlets",
        ],
    ),
    (
        "hvac",
        &[
            "hvac", "air conditioning", "heating and cooling", "furnace", "ac repair",
            "heat pump", "ductwork",
        ],
    ),
    (
        "auto_repair",
        &[
            "mechanic", "mechanics", "machanic", "mecanic", "car repair", "car repairs",
            "auto repair", "auto shop", "oil change", "brakes", "garage",
        ],
    ),
    (
        "realtor",
        &["realtor", "realtors", "relator", "real estate agent", "broker", "home buyers", "listings"],
    ),
    (
        "property_manager",
        &[
            "property manager", "property management", "landlord", "tenant", "tenants",
            "rentals", "rental properties",
        ],
    ),
    (
        "salon",
        &[
            "salon", "salons", "salone", "hair salon", "nail salon", "hairdresser", "stylist",
            "barber", "barbershop", "haircuts",
        ],
    ),
    (
        "restaurant",
        &[
            "restaurant", "restaurants", "resturant", "restaraunt", "cafe", "diner", "bistro",
            "food truck", "catering",
        ],
    ),
    (
        "personal_trainer",
        &["personal trainer", "personal training", "trainer", "fitness coach", "coaching clients"],
    ),
    (
        "gym",
        &["gym", "gyms", "fitness studio", "fitness center", "crossfit", "yoga studio", "pilates"],
    ),
    (
        "cleaning",
        &[
            "cleaning", "cleaner", "cleaners", "cleaing", "maid", "janitorial", "house cleaning",
            "housekeeping",
        ],
    ),
    (
        "landscaping",
        &[
            "landscaping", "landscaper", "landscapping", "lawn care", "lawn", "mowing",
            "gardening",
        ],
    ),
    (
        "photographer",
        &[
            "photographer", "photographers", "fotographer", "photography", "photo shoot",
            "photoshoot",
        ],
    ),
];

/// Phrases that point at a family of industries without choosing one.
pub const AMBIGUITY_GROUPS: &[(&str, &[&str])] = &[
    ("real estate", &["realtor", "property_manager"]),
    ("fitness", &["personal_trainer", "gym"]),
];

/// Known integrations, matched as whole words or phrases.
pub const INTEGRATIONS: &[(&str, &str)] = &[
    ("stripe", "stripe"),
    ("quickbooks", "quickbooks"),
    ("quick books", "quickbooks"),
    ("square", "square"),
    ("paypal", "paypal"),
    ("google calendar", "google_calendar"),
    ("mailchimp", "mailchimp"),
    ("xero", "xero"),
    ("zapier", "zapier"),
    ("twilio", "twilio"),
    ("shopify", "shopify"),
    ("gmail", "gmail"),
    ("outlook", "outlook"),
];

/// Entity vocabulary: surface word to canonical entity.
pub const ENTITY_WORDS: &[(&str, &str)] = &[
    ("customer", "customer"),
    ("customers", "customer"),
    ("client", "client"),
    ("clients", "client"),
    ("job", "job"),
    ("jobs", "job"),
    ("appointment", "appointment"),
    ("appointments", "appointment"),
    ("invoice", "invoice"),
    ("invoices", "invoice"),
    ("quote", "quote"),
    ("quotes", "quote"),
    ("property", "property"),
    ("properties", "property"),
    ("tenant", "tenant"),
    ("tenants", "tenant"),
    ("vehicle", "vehicle"),
    ("vehicles", "vehicle"),
    ("car", "vehicle"),
    ("cars", "vehicle"),
    ("order", "order"),
    ("orders", "order"),
    ("booking", "booking"),
    ("bookings", "booking"),
    ("member", "member"),
    ("members", "member"),
    ("class", "class"),
    ("classes", "class"),
    ("listing", "listing"),
    ("listings", "listing"),
    ("project", "project"),
    ("projects", "project"),
    ("employee", "employee"),
    ("employees", "employee"),
];

const CUSTOMER_FACING_PHRASES: &[&str] = &[
    "customers book", "customers can", "clients can", "let customers", "let clients",
    "online booking", "book online", "customer portal", "client portal", "self service",
    "customers see", "public facing",
];

const INTERNAL_ONLY_PHRASES: &[&str] = &[
    "internal only", "internal use", "just for me", "only for me", "just for my team",
    "only for my team", "back office", "for internal", "staff only",
];

const SIMPLE_WORDS: &[&str] = &["simple", "basic", "easy", "minimal", "lightweight"];
const MODERATE_WORDS: &[&str] = &["moderate", "standard"];
const ADVANCED_WORDS: &[&str] = &["advanced", "complex", "sophisticated", "enterprise", "multi location"];

static SOLO_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(just me|solo|by myself|on my own|one man|one woman|one person|sole proprietor|work alone|only me|myself only)\b",
    )
    .expect("solo pattern is a valid regex")
});

static HEADCOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:team of\s+(\d{1,5})|(\d{1,5})\s+(?:employees|people|staff|techs|technicians|workers|guys|person team|team members|stylists|agents|trainers|mechanics|plumbers|electricians|cleaners|crews?))\b",
    )
    .expect("headcount pattern is a valid regex")
});

static WORD_HEADCOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:two|three|four|five|six|seven|eight|nine|ten|a few|a couple of|a couple)\s+(?:employees|people|staff|techs|technicians|workers|guys|team members|stylists|agents|trainers|mechanics|cleaners)\b",
    )
    .expect("word headcount pattern is a valid regex")
});

static TEAM_WORDS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(small team|small crew|small staff|few employees|large team|big team|hundreds of employees)\b")
        .expect("team words pattern is a valid regex")
});

/// Result of the keyword table lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryGuess {
    pub industry: String,
    pub confidence: Confidence,
    /// The speaker named the profession themselves.
    pub self_identified: bool,
    /// Phrases from the table that matched, in table order.
    pub matched: Vec<String>,
    /// Sibling industries when the text only names their family.
    pub candidates: Vec<String>,
}

impl IndustryGuess {
    fn general() -> Self {
        Self {
            industry: GENERAL_INDUSTRY.to_string(),
            confidence: Confidence::new(NO_MATCH_CONFIDENCE),
            self_identified: false,
            matched: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn is_general(&self) -> bool {
        self.industry == GENERAL_INDUSTRY
    }
}

fn phrase_matches(input: &ParsedInput, phrase: &str) -> bool {
    if phrase.contains(' ') {
        input.contains_phrase(phrase)
    } else {
        input.has_token(phrase)
    }
}

/// Resolves an industry from the keyword table.
///
/// Score is the summed token count of every matched phrase; the first table
/// entry wins a tie. Confidence follows the strongest evidence: the speaker
/// naming the profession, then any multi-word phrase, then single keywords.
pub fn guess_industry(input: &ParsedInput) -> IndustryGuess {
    let mut best: Option<(usize, &str, Vec<String>)> = None;
    for (industry, phrases) in INDUSTRY_KEYWORDS {
        let matched: Vec<String> = phrases
            .iter()
            .filter(|p| phrase_matches(input, p))
            .map(|p| p.to_string())
            .collect();
        let score: usize = matched.iter().map(|p| p.split_whitespace().count()).sum();
        if score > 0 && best.as_ref().map_or(true, |(top, _, _)| score > *top) {
            best = Some((score, *industry, matched));
        }
    }

    if let Some((_, industry, matched)) = best {
        let self_identified = input.identity.as_deref().is_some_and(|identity| {
            matched.iter().any(|p| {
                identity == p.as_str() || identity.split_whitespace().any(|w| w == p.as_str())
            })
        });
        let confidence = if self_identified {
            SELF_IDENTIFIED_CONFIDENCE
        } else if matched.iter().any(|p| p.contains(' ')) {
            MULTI_WORD_CONFIDENCE
        } else {
            SINGLE_WORD_CONFIDENCE
        };
        return IndustryGuess {
            industry: industry.to_string(),
            confidence: Confidence::new(confidence),
            self_identified,
            matched,
            candidates: Vec::new(),
        };
    }

    for (phrase, members) in AMBIGUITY_GROUPS {
        if phrase_matches(input, phrase) {
            let confidence = if phrase.contains(' ') {
                MULTI_WORD_CONFIDENCE
            } else {
                SINGLE_WORD_CONFIDENCE
            };
            return IndustryGuess {
                industry: members[0].to_string(),
                confidence: Confidence::new(confidence),
                self_identified: false,
                matched: vec![phrase.to_string()],
                candidates: members.iter().map(|m| m.to_string()).collect(),
            };
        }
    }

    IndustryGuess::general()
}

/// Ambiguity candidates for an industry the caller already resolved, e.g.
/// from the AI provider.
pub fn ambiguity_candidates(input: &ParsedInput, industry: &str) -> Vec<String> {
    AMBIGUITY_GROUPS
        .iter()
        .find(|(phrase, members)| members.contains(&industry) && phrase_matches(input, phrase))
        .filter(|(_, members)| {
            !INDUSTRY_KEYWORDS
                .iter()
                .filter(|(id, _)| members.contains(id))
                .any(|(_, phrases)| phrases.iter().any(|p| phrase_matches(input, p)))
        })
        .map(|(_, members)| members.iter().map(|m| m.to_string()).collect())
        .unwrap_or_default()
}

/// Pulls every slot the text states or strongly implies.
pub fn extract_slots(input: &ParsedInput) -> Vec<SlotUpdate> {
    let mut updates = Vec::new();
    let text = input.normalized.as_str();

    if let Some(size) = team_size(text) {
        updates.push(size);
    }

    if let Some(complexity) = complexity(input) {
        updates.push(SlotUpdate::explicit(SlotPatch::Complexity(complexity), 0.8));
    }

    if INTERNAL_ONLY_PHRASES.iter().any(|p| input.contains_phrase(p)) {
        updates.push(SlotUpdate::explicit(SlotPatch::CustomerFacing(false), 0.8));
    } else if CUSTOMER_FACING_PHRASES.iter().any(|p| input.contains_phrase(p)) {
        updates.push(SlotUpdate::explicit(SlotPatch::CustomerFacing(true), 0.8));
    }

    let mut integrations: Vec<String> = Vec::new();
    for (phrase, id) in INTEGRATIONS {
        if phrase_matches(input, phrase) && !integrations.iter().any(|i| i == id) {
            integrations.push(id.to_string());
        }
    }
    if !integrations.is_empty() {
        updates.push(SlotUpdate::explicit(SlotPatch::Integrations(integrations), 0.85));
    }

    let mut entities: Vec<String> = Vec::new();
    for token in &input.tokens {
        if let Some((_, entity)) = ENTITY_WORDS.iter().find(|(word, _)| word == token) {
            if !entities.iter().any(|e| e == entity) {
                entities.push(entity.to_string());
            }
        }
    }
    if !entities.is_empty() {
        updates.push(SlotUpdate::inferred(SlotPatch::PrimaryEntities(entities), 0.7));
    }

    updates
}

fn team_size(text: &str) -> Option<SlotUpdate> {
    if let Some(captures) = HEADCOUNT_PATTERN.captures(text) {
        let count = captures
            .get(1)
            .or_else(|| captures.get(2))
            .and_then(|m| m.as_str().parse::<u32>().ok());
        if let Some(count) = count {
            return Some(SlotUpdate::explicit(
                SlotPatch::TeamSize(TeamSize::from_headcount(count)),
                0.9,
            ));
        }
    }
    if SOLO_PATTERN.is_match(text) {
        return Some(SlotUpdate::explicit(SlotPatch::TeamSize(TeamSize::Solo), 0.9));
    }
    if WORD_HEADCOUNT_PATTERN.is_match(text) {
        return Some(SlotUpdate::explicit(SlotPatch::TeamSize(TeamSize::Small), 0.8));
    }
    TEAM_WORDS_PATTERN.captures(text).and_then(|c| {
        let size = match c.get(1)?.as_str() {
            "large team" | "big team" | "hundreds of employees" => TeamSize::Large,
            _ => TeamSize::Small,
        };
        Some(SlotUpdate::inferred(SlotPatch::TeamSize(size), 0.75))
    })
}

fn complexity(input: &ParsedInput) -> Option<Complexity> {
    if ADVANCED_WORDS.iter().any(|w| phrase_matches(input, w)) {
        Some(Complexity::Advanced)
    } else if MODERATE_WORDS.iter().any(|w| phrase_matches(input, w)) {
        Some(Complexity::Moderate)
    } else if SIMPLE_WORDS.iter().any(|w| phrase_matches(input, w)) {
        Some(Complexity::Simple)
    } else {
        None
    }
}
