//! Immutable question catalog for the Mahes progression engine.
//!
//! The catalog is the leaf of the workspace: a validated, read-only table of
//! questions and region metadata that the progression engine queries but
//! never mutates. The bundled reference content lives in
//! `content/catalog.yaml` (24 questions across three regions).
//!
//! # Modules
//!
//! - [`catalog`] -- The [`Catalog`] accessor: lookup by id, per-region queries
//! - [`content`] -- YAML content schema and item token parsing
//! - [`error`] -- Load and lookup errors ([`CatalogError`])

pub mod catalog;
pub mod content;
pub mod error;

pub use catalog::Catalog;
pub use content::{FRAGMENT_PREFIX, HINT_TOKEN, parse_item_token};
pub use error::CatalogError;
