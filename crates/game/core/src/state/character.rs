//! Character sheet.

use crate::combat::DefenseStance;
use crate::negative::{AddictionState, TraitProgress};
use crate::stats::{
    Attributes, Characteristic, DerivedBonuses, Effect, EffectivePool, PoolBonusKey, Pools,
};
use crate::text::fold;

use super::ids::{ActorId, ItemId};
use super::item::Item;

/// Player characters are subject to encumbrance vetoes, NPCs are not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    #[default]
    Personnage,
    Pnj,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    /// Experience needed for the next level. `None` uses the configured default.
    pub xp_next: Option<u32>,
}

impl Progression {
    pub fn percent(&self, default_next: u32) -> u32 {
        let next = self.xp_next.unwrap_or(default_next);
        if next == 0 {
            return 100;
        }
        ((u64::from(self.xp) * 100 / u64::from(next)).min(100)) as u32
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Character {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub attributes: Attributes,
    pub pools: Pools,
    pub effects: Vec<Effect>,
    pub items: Vec<Item>,
    pub negative_trait: TraitProgress,
    pub addiction: AddictionState,
    /// Per-character override of the actions granted each turn.
    pub actions_total: Option<u32>,
    pub actions_left: u32,
    pub stance: Option<DefenseStance>,
    /// Per-character override of the base carry capacity.
    pub carry_base: Option<u32>,
    pub progress: Progression,
}

impl Character {
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// First owned item with this name, ignoring case and accents.
    pub fn item_named(&self, name: &str) -> Option<&Item> {
        let wanted = fold(name.trim());
        self.items.iter().find(|item| fold(item.name.trim()) == wanted)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Smallest id above every owned item.
    pub fn next_item_id(&self) -> ItemId {
        ItemId(self.items.iter().map(|item| item.id.0 + 1).max().unwrap_or(1))
    }

    /// Adds an item under a fresh id and returns that id.
    pub fn add_item(&mut self, mut item: Item) -> ItemId {
        item.id = self.next_item_id();
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Net modifiers from effects and worn equipment.
    pub fn bonuses(&self) -> DerivedBonuses {
        DerivedBonuses::compute(&self.effects, &self.items)
    }

    /// Hit points with the `pv.max` bonus applied.
    pub fn effective_pv(&self) -> EffectivePool {
        EffectivePool::of(&self.pools.pv, self.bonuses().pool(PoolBonusKey::PvMax))
    }

    /// Worn equipment.
    pub fn equipment(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_active_equipment())
    }

    /// Total absorption of worn armor and shields.
    pub fn absorption(&self) -> u32 {
        self.equipment().map(Item::absorption).sum()
    }

    /// Defense characteristic suggested by the first worn item that has one.
    pub fn suggested_defense(&self) -> Option<Characteristic> {
        self.equipment()
            .find_map(|item| item.defense.and_then(|defense| defense.carac))
    }

    /// Items created by `source` through a grant.
    pub fn granted_by(&self, source: ItemId) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.granted_by == Some(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DefenseConfig, ItemKind};

    #[test]
    fn item_ids_are_allocated_above_existing() {
        let mut hero = Character::new(ActorId(1), "Aube");
        let first = hero.add_item(Item::new(ItemId(0), "Dague", ItemKind::Weapon));
        let second = hero.add_item(Item::new(ItemId(0), "Corde", ItemKind::Consumable));
        assert_eq!((first, second), (ItemId(1), ItemId(2)));
        hero.remove_item(first);
        assert_eq!(hero.next_item_id(), ItemId(3));
    }

    #[test]
    fn items_are_found_by_folded_name() {
        let mut hero = Character::new(ActorId(1), "Aube");
        let id = hero.add_item(Item::new(ItemId(0), "Résistance physique", ItemKind::Skill));
        assert_eq!(hero.item_named("resistance PHYSIQUE").map(|i| i.id), Some(id));
        assert!(hero.item_named("Parade").is_none());
    }

    #[test]
    fn suggested_defense_comes_from_worn_equipment() {
        let mut hero = Character::new(ActorId(1), "Aube");
        let mut shield = Item::new(ItemId(0), "Pavois", ItemKind::Armor);
        shield.equippable = true;
        shield.defense = Some(DefenseConfig {
            carac: Some(Characteristic::Puissance),
            absorption: 1,
        });
        let id = hero.add_item(shield);
        assert_eq!(hero.suggested_defense(), None);
        hero.item_mut(id).unwrap().equipped = true;
        assert_eq!(hero.suggested_defense(), Some(Characteristic::Puissance));
        assert_eq!(hero.absorption(), 1);
    }

    #[test]
    fn progression_percent() {
        let progress = Progression {
            level: 2,
            xp: 40,
            xp_next: None,
        };
        assert_eq!(progress.percent(100), 40);
        assert_eq!(Progression { xp_next: Some(0), ..progress }.percent(100), 100);
    }
}
