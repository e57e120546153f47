//! Read-only data the engine consults.
//!
//! Granting items looks entries up in compendium packs through
//! [`ItemSource`]. The content crate loads packs from disk into a
//! [`CompendiumSnapshot`]; tests build one in memory.
mod compendium;

pub use compendium::{CompendiumEntry, CompendiumSnapshot, ItemSource};
