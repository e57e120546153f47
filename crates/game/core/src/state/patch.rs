//! Minimal updates for host documents.
//!
//! The engine mutates a working copy of a character; [`ActorPatch::from_states`]
//! then diffs it against the original and emits only what changed, keyed by
//! the dotted paths host documents use.

use strum::IntoEnumIterator;

use crate::combat::DefenseStance;
use crate::stats::{Characteristic, Effect, PoolKind};

use super::character::Character;
use super::ids::{ActorId, ItemId};
use super::item::Item;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatchValue {
    Int(i64),
    Bool(bool),
    Text(String),
    Effects(Vec<Effect>),
    Stance(DefenseStance),
    Null,
}

impl From<u32> for PatchValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<PatchValue>> From<Option<T>> for PatchValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Change {
    Set { path: String, value: PatchValue },
    CreateItem(Box<Item>),
    UpdateItem(Box<Item>),
    DeleteItem(ItemId),
}

/// Changes to write back to one actor document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorPatch {
    pub actor: ActorId,
    pub changes: Vec<Change>,
}

impl ActorPatch {
    pub fn from_states(before: &Character, after: &Character) -> Option<Self> {
        let mut changes = Vec::new();
        let mut set = |path: String, old: PatchValue, new: PatchValue| {
            if old != new {
                changes.push(Change::Set { path, value: new });
            }
        };

        set("name".into(), before.name.clone().into(), after.name.clone().into());
        for carac in Characteristic::iter() {
            set(
                format!("system.attributes.{}", carac.key()),
                before.attributes.get(carac).to_string().into(),
                after.attributes.get(carac).to_string().into(),
            );
        }
        for kind in PoolKind::iter() {
            let (old, new) = (before.pools.get(kind), after.pools.get(kind));
            set(
                format!("system.pools.{kind}.value"),
                old.value().into(),
                new.value().into(),
            );
            set(format!("system.pools.{kind}.max"), old.max().into(), new.max().into());
        }
        set(
            "system.effects".into(),
            PatchValue::Effects(before.effects.clone()),
            PatchValue::Effects(after.effects.clone()),
        );
        set(
            "system.progress.level".into(),
            before.progress.level.into(),
            after.progress.level.into(),
        );
        set(
            "system.progress.xp".into(),
            before.progress.xp.into(),
            after.progress.xp.into(),
        );
        set(
            "system.progress.xpNext".into(),
            before.progress.xp_next.into(),
            after.progress.xp_next.into(),
        );
        set(
            "system.carry.base".into(),
            before.carry_base.into(),
            after.carry_base.into(),
        );

        set(
            "flags.unicreon.actionsLeft".into(),
            before.actions_left.into(),
            after.actions_left.into(),
        );
        set(
            "flags.unicreon.actionsTotal".into(),
            before.actions_total.into(),
            after.actions_total.into(),
        );
        set(
            "flags.unicreon.defenseStance".into(),
            before.stance.map_or(PatchValue::Null, PatchValue::Stance),
            after.stance.map_or(PatchValue::Null, PatchValue::Stance),
        );

        let (old, new) = (&before.negative_trait, &after.negative_trait);
        set(
            "flags.unicreon.negativeTrait".into(),
            old.key.clone().into(),
            new.key.clone().into(),
        );
        set(
            "flags.unicreon.negativeTraitState".into(),
            old.state.key().to_string().into(),
            new.state.key().to_string().into(),
        );
        set(
            "flags.unicreon.negativeTraitFailCount".into(),
            old.fail_count.into(),
            new.fail_count.into(),
        );

        let (old, new) = (&before.addiction, &after.addiction);
        set(
            "flags.unicreon.addictionType".into(),
            old.substance.map(|s| s.key().to_string()).into(),
            new.substance.map(|s| s.key().to_string()).into(),
        );
        set(
            "flags.unicreon.addictionLastUseMs".into(),
            old.last_dose.map(|t| t.timestamp_millis()).map_or(PatchValue::Null, PatchValue::Int),
            new.last_dose.map(|t| t.timestamp_millis()).map_or(PatchValue::Null, PatchValue::Int),
        );
        set(
            "flags.unicreon.addictionWithdrawal".into(),
            old.withdrawal.into(),
            new.withdrawal.into(),
        );

        for item in &before.items {
            match after.item(item.id) {
                None => changes.push(Change::DeleteItem(item.id)),
                Some(updated) if updated != item => {
                    changes.push(Change::UpdateItem(Box::new(updated.clone())));
                }
                Some(_) => {}
            }
        }
        for item in &after.items {
            if before.item(item.id).is_none() {
                changes.push(Change::CreateItem(Box::new(item.clone())));
            }
        }

        if changes.is_empty() {
            return None;
        }
        Some(Self {
            actor: after.id,
            changes,
        })
    }

    /// Value written at `path`, if any.
    pub fn value_at(&self, path: &str) -> Option<&PatchValue> {
        self.changes.iter().find_map(|change| match change {
            Change::Set { path: p, value } if p == path => Some(value),
            _ => None,
        })
    }

    pub fn created_items(&self) -> impl Iterator<Item = &Item> {
        self.changes.iter().filter_map(|change| match change {
            Change::CreateItem(item) => Some(item.as_ref()),
            _ => None,
        })
    }

    pub fn deleted_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.changes.iter().filter_map(|change| match change {
            Change::DeleteItem(id) => Some(*id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemKind;

    #[test]
    fn identical_states_produce_no_patch() {
        let hero = Character::new(ActorId(1), "Aube");
        assert!(ActorPatch::from_states(&hero, &hero.clone()).is_none());
    }

    #[test]
    fn only_changed_fields_are_written() {
        let before = Character::new(ActorId(1), "Aube");
        let mut after = before.clone();
        after.pools.pv.set_max(10);
        after.pools.pv.set_value(7);
        after.actions_left = 1;

        let patch = ActorPatch::from_states(&before, &after).unwrap();
        assert_eq!(patch.value_at("system.pools.pv.value"), Some(&PatchValue::Int(7)));
        assert_eq!(patch.value_at("system.pools.pv.max"), Some(&PatchValue::Int(10)));
        assert_eq!(patch.value_at("flags.unicreon.actionsLeft"), Some(&PatchValue::Int(1)));
        assert_eq!(patch.value_at("system.pools.pm.value"), None);
        assert_eq!(patch.changes.len(), 3);
    }

    #[test]
    fn item_creation_and_deletion_are_reported() {
        let mut before = Character::new(ActorId(1), "Aube");
        let old = before.add_item(Item::new(ItemId(0), "Torche", ItemKind::Consumable));
        let mut after = before.clone();
        after.add_item(Item::new(ItemId(0), "Lanterne", ItemKind::Consumable));
        after.remove_item(old);

        let patch = ActorPatch::from_states(&before, &after).unwrap();
        assert_eq!(patch.deleted_items().collect::<Vec<_>>(), vec![old]);
        assert_eq!(patch.created_items().map(|i| i.name.as_str()).collect::<Vec<_>>(), vec!["Lanterne"]);
    }
}
