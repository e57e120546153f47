//! Character roster loader.
//!
//! Loads player characters and NPCs from a RON list of [`Character`] sheets
//! and repairs them against the trait catalog.

use std::collections::HashSet;
use std::path::Path;

use unicreon_core::{Character, ItemId, TraitCatalog, TraitProgress};

use crate::loaders::{LoadResult, read_file};

/// Loader for `characters.ron`.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path, catalog: &TraitCatalog) -> LoadResult<Vec<Character>> {
        let content = read_file(path)?;
        Self::parse(&content, catalog)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster at {:?}: {}", path, e))
    }

    pub fn parse(content: &str, catalog: &TraitCatalog) -> LoadResult<Vec<Character>> {
        let mut roster: Vec<Character> = ron::from_str(content)?;

        let mut ids = HashSet::new();
        for character in &mut roster {
            if !ids.insert(character.id) {
                anyhow::bail!("duplicate actor id {} ({})", character.id, character.name);
            }
            normalize_character(character, catalog);
        }
        Ok(roster)
    }
}

/// Repairs a sheet read from untrusted data.
///
/// Item ids are made unique (zero and repeated ids are renumbered), grant
/// links to missing items are dropped, and trait progress is brought in
/// line with the catalog.
/// Pools are already clamped on deserialization.
pub fn normalize_character(character: &mut Character, catalog: &TraitCatalog) {
    let mut seen = HashSet::new();
    let mut next = character
        .items
        .iter()
        .map(|item| item.id.0)
        .max()
        .unwrap_or(0)
        + 1;
    let mut renumbered = 0;
    for item in &mut character.items {
        if item.id.0 == 0 || !seen.insert(item.id) {
            item.id = ItemId(next);
            seen.insert(item.id);
            next += 1;
            renumbered += 1;
        }
    }
    if renumbered > 0 {
        tracing::warn!(actor = %character.id, renumbered, "renumbered item ids");
    }

    let known: HashSet<ItemId> = character.items.iter().map(|item| item.id).collect();
    for item in &mut character.items {
        if let Some(source) = item.granted_by
            && !known.contains(&source)
        {
            item.granted_by = None;
        }
    }

    if catalog.get(&character.negative_trait.key).is_none() {
        tracing::warn!(
            actor = %character.id,
            key = %character.negative_trait.key,
            "unknown negative trait, clearing"
        );
        character.negative_trait = TraitProgress::default();
    }
    let def = catalog.resolve(&character.negative_trait.key);
    character.negative_trait.normalize(def);
}
