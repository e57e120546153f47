use std::collections::BTreeMap;

use crate::state::{GrantSpec, Item};
use crate::text::fold;

/// Compendium lookup used when equipping items that grant others.
pub trait ItemSource: Send + Sync {
    /// Resolves a grant reference to a template item.
    ///
    /// With a pack, only that pack is searched. Without one, every pack is
    /// searched by id first and by name second.
    fn lookup(&self, spec: &GrantSpec) -> Option<Item>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompendiumEntry {
    pub id: String,
    pub item: Item,
}

/// In-memory packs keyed by pack name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompendiumSnapshot {
    packs: BTreeMap<String, Vec<CompendiumEntry>>,
}

impl CompendiumSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pack(&mut self, name: impl Into<String>, entries: Vec<CompendiumEntry>) {
        self.packs.insert(name.into(), entries);
    }

    #[must_use]
    pub fn with_entry(mut self, pack: &str, id: &str, item: Item) -> Self {
        self.packs
            .entry(pack.to_string())
            .or_default()
            .push(CompendiumEntry {
                id: id.to_string(),
                item,
            });
        self
    }

    pub fn pack_names(&self) -> impl Iterator<Item = &str> {
        self.packs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn by_id<'a>(
        mut entries: impl Iterator<Item = &'a CompendiumEntry>,
        id: &str,
    ) -> Option<&'a CompendiumEntry> {
        entries.find(|entry| entry.id == id)
    }

    fn by_name<'a>(
        mut entries: impl Iterator<Item = &'a CompendiumEntry>,
        name: &str,
    ) -> Option<&'a CompendiumEntry> {
        let wanted = fold(name.trim());
        entries.find(|entry| fold(&entry.item.name) == wanted)
    }
}

impl ItemSource for CompendiumSnapshot {
    fn lookup(&self, spec: &GrantSpec) -> Option<Item> {
        if !spec.is_valid() {
            return None;
        }
        let id = spec.id.as_deref().filter(|id| !id.trim().is_empty());
        let name = spec.name.as_deref().filter(|name| !name.trim().is_empty());

        let scoped: Vec<&CompendiumEntry> = match spec.pack.as_deref() {
            Some(pack) => self.packs.get(pack)?.iter().collect(),
            None => self.packs.values().flatten().collect(),
        };

        let found = id
            .and_then(|id| Self::by_id(scoped.iter().copied(), id))
            .or_else(|| name.and_then(|name| Self::by_name(scoped.iter().copied(), name)));
        found.map(|entry| entry.item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemId, ItemKind};

    fn snapshot() -> CompendiumSnapshot {
        CompendiumSnapshot::new()
            .with_entry(
                "competences",
                "abc",
                Item::new(ItemId(0), "Résistance physique", ItemKind::Skill),
            )
            .with_entry("sorts", "def", Item::new(ItemId(0), "Boule de feu", ItemKind::Skill))
    }

    #[test]
    fn lookup_by_id_then_name_across_packs() {
        let packs = snapshot();
        let by_id = GrantSpec {
            id: Some("def".into()),
            ..GrantSpec::default()
        };
        assert_eq!(packs.lookup(&by_id).unwrap().name, "Boule de feu");

        let by_name = GrantSpec {
            name: Some("resistance PHYSIQUE".into()),
            ..GrantSpec::default()
        };
        assert_eq!(packs.lookup(&by_name).unwrap().name, "Résistance physique");
    }

    #[test]
    fn pack_restricts_the_search() {
        let packs = snapshot();
        let spec = GrantSpec {
            pack: Some("competences".into()),
            id: Some("def".into()),
            ..GrantSpec::default()
        };
        assert!(packs.lookup(&spec).is_none());
        let missing_pack = GrantSpec {
            pack: Some("armes".into()),
            id: Some("abc".into()),
            ..GrantSpec::default()
        };
        assert!(packs.lookup(&missing_pack).is_none());
    }

    #[test]
    fn invalid_spec_finds_nothing() {
        assert!(snapshot().lookup(&GrantSpec::default()).is_none());
    }
}
