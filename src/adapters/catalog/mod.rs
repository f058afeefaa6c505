//! Knowledge catalog adapters.
//!
//! - `StaticCatalog` - in-memory catalog, either the built-in verticals or a
//!   YAML file with the same layout

mod builtin;
mod static_catalog;

pub use static_catalog::{CatalogData, CatalogError, StaticCatalog};
