//! Discovery Engine - conversational requirements discovery for small-business apps
//!
//! Turns a free-text business description plus a short series of answers into
//! an app configuration: detected industry, enabled features, matched
//! behavior bundles and a certainty ledger explaining each decision.
//!
//! Layers:
//! - `domain`: pure, synchronous discovery logic (detection, scoring, ledger, state machine)
//! - `ports`: traits for AI providers and the knowledge catalog
//! - `adapters`: OpenAI/Anthropic/mock providers and the static catalog
//! - `application`: async handlers that combine analysis with the state machine
//! - `config`: environment-driven engine configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
