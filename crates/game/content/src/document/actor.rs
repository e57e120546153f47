//! Actor documents and patch write-back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use unicreon_core::stats::PoolBonusKey;
use unicreon_core::text::fold;
use unicreon_core::{
    ActorId, ActorKind, ActorPatch, AddictionState, Change, Character, Characteristic,
    DefenseStance, DieCode, Effect, EffectKind, EffectTarget, ItemId, PatchValue, Pool, PoolKind,
    Progression, RollMode, StanceKind, Substance, TraitCatalog, TraitProgress, TraitState,
};

use super::item::{item_from_document, item_to_document};
use super::value::{at, flag, int, set, text, uint};
use crate::loaders::actors::normalize_character;

/// A character read from a host actor document, with the host ids of its
/// items so patches can be written back.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorDocument {
    /// Host document id.
    pub key: String,
    pub character: Character,
    item_keys: BTreeMap<ItemId, String>,
}

impl ActorDocument {
    /// Reads an actor. Anything unreadable falls back to its default.
    pub fn parse(doc: &Value, id: ActorId, catalog: &TraitCatalog) -> Self {
        let key = text(doc.get("_id")).unwrap_or_else(|| id.0.to_string());
        let mut character = Character::new(id, text(doc.get("name")).unwrap_or_default());
        character.kind = match text(doc.get("type")).as_deref() {
            Some("pnj") => ActorKind::Pnj,
            _ => ActorKind::Personnage,
        };

        let sys = doc.get("system").unwrap_or(&Value::Null);
        for carac in Characteristic::iter() {
            let die = text(at(sys, &format!("attributes.{}", carac.key())))
                .map_or(DieCode::DEFAULT, |raw| DieCode::normalize(&raw));
            character.attributes.set(carac, die);
        }
        for kind in PoolKind::iter() {
            let pool = at(sys, &format!("pools.{kind}"));
            *character.pools.get_mut(kind) = Pool::new(
                int(pool.and_then(|p| p.get("value"))).unwrap_or(0),
                int(pool.and_then(|p| p.get("max"))).unwrap_or(0),
            );
        }
        character.effects = match sys.get("effects") {
            Some(Value::Array(list)) => list.iter().filter_map(effect_from_host).collect(),
            _ => Vec::new(),
        };
        character.progress = Progression {
            level: uint(at(sys, "progress.level")).unwrap_or(1),
            xp: uint(at(sys, "progress.xp")).unwrap_or(0),
            xp_next: uint(at(sys, "progress.xpNext")),
        };
        character.carry_base = uint(at(sys, "carry.base"));

        let flags = at(doc, "flags.unicreon").unwrap_or(&Value::Null);
        character.actions_total = uint(flags.get("actionsTotal"));
        character.actions_left = uint(flags.get("actionsLeft"))
            .or(character.actions_total)
            .unwrap_or(0);
        character.stance = flags.get("defenseStance").and_then(stance_from_host);
        character.negative_trait = TraitProgress {
            key: text(flags.get("negativeTrait"))
                .unwrap_or_else(|| TraitProgress::default().key),
            state: text(flags.get("negativeTraitState"))
                .map_or(TraitState::None, |raw| TraitState::from_key(&raw)),
            fail_count: uint(flags.get("negativeTraitFailCount")).unwrap_or(0),
        };
        character.addiction = AddictionState {
            substance: text(flags.get("addictionType")).and_then(|raw| Substance::from_key(&raw)),
            last_dose: int(flags.get("addictionLastUseMs")).and_then(DateTime::<Utc>::from_timestamp_millis),
            withdrawal: flag(flags.get("addictionWithdrawal")),
        };

        let mut item_keys = BTreeMap::new();
        let mut grants = Vec::new();
        if let Some(Value::Array(items)) = doc.get("items") {
            for raw in items {
                let Some(read) = item_from_document(raw) else {
                    continue;
                };
                let id = character.add_item(read.item);
                item_keys.insert(id, read.key);
                if let Some(source) = read.granted_by {
                    grants.push((id, source));
                }
            }
        }
        for (id, source) in grants {
            let source = item_keys
                .iter()
                .find_map(|(sid, skey)| (*skey == source).then_some(*sid));
            if let Some(item) = character.item_mut(id) {
                item.granted_by = source;
            }
        }

        normalize_character(&mut character, catalog);
        Self {
            key,
            character,
            item_keys,
        }
    }

    pub fn item_key(&self, id: ItemId) -> Option<&str> {
        self.item_keys.get(&id).map(String::as_str)
    }

    /// Writes a patch into the host document `doc` and keeps the local
    /// character in sync with it.
    pub fn apply_patch(&mut self, doc: &mut Value, patch: &ActorPatch, after: &Character) {
        for change in &patch.changes {
            match change {
                Change::Set { path, value } => set(doc, path, patch_value_to_json(value)),
                Change::DeleteItem(id) => {
                    if let Some(key) = self.item_keys.remove(id)
                        && let Some(items) = items_mut(doc)
                    {
                        items.retain(|raw| text(raw.get("_id")).as_deref() != Some(key.as_str()));
                    }
                }
                Change::CreateItem(item) => {
                    let key = format!("{}-{}", self.key, item.id.0);
                    let granted_by = item.granted_by.and_then(|s| self.item_keys.get(&s)).cloned();
                    if let Some(items) = items_mut(doc) {
                        items.push(item_to_document(&key, item, granted_by.as_deref()));
                    }
                    self.item_keys.insert(item.id, key);
                }
                Change::UpdateItem(item) => {
                    let Some(key) = self.item_keys.get(&item.id).cloned() else {
                        continue;
                    };
                    let granted_by = item.granted_by.and_then(|s| self.item_keys.get(&s)).cloned();
                    let fresh = item_to_document(&key, item, granted_by.as_deref());
                    if let Some(existing) = items_mut(doc).and_then(|items| {
                        items
                            .iter_mut()
                            .find(|raw| text(raw.get("_id")).as_deref() == Some(key.as_str()))
                    }) {
                        merge(existing, fresh);
                    }
                }
            }
        }
        self.character = after.clone();
    }
}

fn items_mut(doc: &mut Value) -> Option<&mut Vec<Value>> {
    if !doc.get("items").is_some_and(Value::is_array) {
        set(doc, "items", Value::Array(Vec::new()));
    }
    doc.get_mut("items").and_then(Value::as_array_mut)
}

/// Overwrites known fields, keeping whatever else the host stores.
fn merge(target: &mut Value, fresh: Value) {
    match (target, fresh) {
        (Value::Object(target), Value::Object(fresh)) => {
            for (key, value) in fresh {
                let nested = value.is_object() && target.get(&key).is_some_and(Value::is_object);
                if nested && let Some(existing) = target.get_mut(&key) {
                    merge(existing, value);
                } else {
                    target.insert(key, value);
                }
            }
        }
        (target, fresh) => *target = fresh,
    }
}

fn patch_value_to_json(value: &PatchValue) -> Value {
    match value {
        PatchValue::Int(n) => json!(n),
        PatchValue::Bool(b) => json!(b),
        PatchValue::Text(s) => json!(s),
        PatchValue::Effects(effects) => Value::Array(effects.iter().map(effect_to_host).collect()),
        PatchValue::Stance(stance) => stance_to_host(stance),
        PatchValue::Null => Value::Null,
    }
}

/// Reads one effect. Entries without a label are dropped.
pub fn effect_from_host(raw: &Value) -> Option<Effect> {
    let label = text(raw.get("label"))?;
    let kind = match text(raw.get("type")).as_deref() {
        Some("debuff") => EffectKind::Debuff,
        _ => EffectKind::Buff,
    };
    let key = text(raw.get("key")).unwrap_or_default();
    let target = match text(raw.get("target")).as_deref() {
        Some("carac") => Characteristic::from_label(&key).map(EffectTarget::Carac),
        Some("pool") => PoolBonusKey::from_folded(&fold(&key)).map(EffectTarget::Pool),
        _ => None,
    };
    Some(Effect {
        label,
        kind,
        remaining_turns: int(raw.get("remainingTurns"))
            .map_or(0, |n| n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32),
        target,
        value: int(raw.get("value")).map_or(0, |n| n.clamp(-9999, 9999) as i32),
        description: text(raw.get("description")).unwrap_or_default(),
        one_shot: flag(raw.get("oneShot")),
    })
}

pub fn effect_to_host(effect: &Effect) -> Value {
    let (target, key) = match effect.target {
        Some(EffectTarget::Carac(carac)) => ("carac", carac.key()),
        Some(EffectTarget::Pool(pool)) => ("pool", pool.key()),
        None => ("", ""),
    };
    json!({
        "label": effect.label,
        "type": match effect.kind {
            EffectKind::Buff => "buff",
            EffectKind::Debuff => "debuff",
        },
        "remainingTurns": effect.remaining_turns,
        "target": target,
        "key": key,
        "value": effect.value,
        "description": effect.description,
        "oneShot": effect.one_shot,
    })
}

fn stance_from_host(raw: &Value) -> Option<DefenseStance> {
    let kind = match text(raw.get("type")).as_deref()? {
        "physical" | "physique" => StanceKind::Physical,
        "mental" | "mentale" => StanceKind::Mental,
        _ => return None,
    };
    let uses = uint(raw.get("usesRemaining")).unwrap_or(1);
    if uses == 0 {
        return None;
    }
    let mut stance = DefenseStance::new(kind);
    stance.uses_remaining = uses;
    stance.restricted_to = uint(raw.get("restrictedToAttackerId")).map(ActorId);
    Some(stance)
}

fn stance_to_host(stance: &DefenseStance) -> Value {
    json!({
        "type": match stance.kind {
            StanceKind::Physical => "physical",
            StanceKind::Mental => "mental",
        },
        "mode": match stance.mode {
            RollMode::Advantage => "advantage",
            RollMode::Disadvantage => "disadvantage",
            RollMode::Normal => "normal",
        },
        "usesRemaining": stance.uses_remaining,
        "restrictedToAttackerId": stance.restricted_to.map(|id| id.0),
    })
}

#[cfg(test)]
mod tests {
    use unicreon_core::{CompendiumSnapshot, Item, ItemKind, RulesEngine};

    use super::*;

    fn host_actor() -> Value {
        json!({
            "_id": "a1",
            "name": "Aube",
            "type": "personnage",
            "system": {
                "attributes": {"agilite": "d8", "puissance": "banane"},
                "pools": {"pv": {"value": "12", "max": 10}, "pm": {"value": 3, "max": 6}},
                "effects": [
                    {"label": "Vif", "type": "buff", "target": "carac", "key": "agilite", "value": 1, "remainingTurns": 2},
                    {"type": "debuff"}
                ],
                "progress": {"level": 2, "xp": 30}
            },
            "flags": {"unicreon": {
                "actionsLeft": 1,
                "negativeTrait": "paranoiaque",
                "negativeTraitState": "latent",
                "negativeTraitFailCount": "1",
                "addictionType": "Tabac"
            }},
            "items": [
                {"_id": "i1", "name": "Épée", "type": "arme", "system": {"equippable": true, "equipped": true, "custom": 7}},
                {"_id": "i2", "name": "Parade", "type": "competence", "flags": {"unicreon": {"grantedBy": "i1"}}},
                {"_id": "i3", "name": "Carrosse", "type": "vehicule"}
            ]
        })
    }

    #[test]
    fn reads_host_actor_leniently() {
        let read = ActorDocument::parse(&host_actor(), ActorId(1), &TraitCatalog::builtin());
        let hero = &read.character;
        assert_eq!(hero.attributes.agilite, DieCode::D8);
        assert_eq!(hero.attributes.puissance, DieCode::D6);
        assert_eq!(hero.pools.pv.value(), 10);
        assert_eq!(hero.effects.len(), 1);
        assert_eq!(hero.progress.level, 2);
        assert_eq!(hero.negative_trait.state, TraitState::Latent);
        assert_eq!(hero.negative_trait.fail_count, 1);
        assert_eq!(hero.addiction.substance, Some(Substance::Tabac));
        assert_eq!(hero.items.len(), 2);
        let parry = &hero.items[1];
        assert_eq!(parry.granted_by, Some(hero.items[0].id));
        assert_eq!(read.item_key(parry.id), Some("i2"));
    }

    #[test]
    fn patches_are_written_back() {
        let engine = RulesEngine::default();
        let mut doc = host_actor();
        let mut read = ActorDocument::parse(&doc, ActorId(1), &TraitCatalog::builtin());
        let before = read.character.clone();
        let mut after = before.clone();

        engine.set_pool_value(&mut after, PoolKind::Pm, 1);
        let sword = after.items[0].id;
        engine
            .set_equipped(&mut after, sword, false, &CompendiumSnapshot::new())
            .unwrap();
        after.add_item(Item::new(ItemId(0), "Torche", ItemKind::Consumable));

        let patch = ActorPatch::from_states(&before, &after).unwrap();
        read.apply_patch(&mut doc, &patch, &after);

        assert_eq!(at(&doc, "system.pools.pm.value"), Some(&json!(1)));
        let items = doc["items"].as_array().unwrap();
        let names: Vec<_> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Épée", "Carrosse", "Torche"]);
        assert_eq!(items[0]["system"]["equipped"], json!(false));
        assert_eq!(items[0]["system"]["custom"], json!(7));
        assert_eq!(read.character, after);
    }

    #[test]
    fn effects_write_in_host_shape() {
        let effect = Effect::new("Vigueur", EffectKind::Buff)
            .with_target(EffectTarget::Pool(PoolBonusKey::PvMax), 3);
        let raw = effect_to_host(&effect);
        assert_eq!(raw["key"], json!("pv.max"));
        assert_eq!(effect_from_host(&raw), Some(effect));
    }
}
