//! Data-driven content definitions and loaders.
//!
//! This crate reads rules content from RON/TOML data files:
//! - Negative trait catalog (RON)
//! - Compendium packs of template items (RON)
//! - Character roster (RON)
//! - Encounter scripts (RON)
//! - Rules configuration (TOML)
//!
//! It also holds the host document boundary, which turns the tabletop host's
//! JSON actors and items into `unicreon-core` types and writes patches back.

#[cfg(feature = "loaders")]
pub mod document;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use document::{ActorDocument, ItemDocument, item_from_document, item_to_document};

#[cfg(feature = "loaders")]
pub use loaders::{
    CompendiumLoader, ConfigLoader, ContentFactory, EncounterLoader, LoadResult, RosterLoader,
    TraitCatalogLoader,
    encounter::{EncounterScript, EncounterStep},
};
