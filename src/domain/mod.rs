//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - Knowledge catalog vocabulary (features, bundles, kits)
//! - `discovery` - Scoring, ledger and the conversation state machine

pub mod catalog;
pub mod discovery;
pub mod foundation;
