//! Item documents.

use serde_json::{Value, json};
use unicreon_core::{
    AttackConfig, AttackType, Characteristic, DamageSpec, DefenseConfig, DieCode, GrantSpec, Item,
    ItemId, ItemKind, SpellSchool, Substance,
};

use super::value::{at, flag, int, text, uint};

/// An item read from a host document, before ids are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDocument {
    /// Host document id.
    pub key: String,
    /// Host id of the item that granted this one.
    pub granted_by: Option<String>,
    pub item: Item,
}

/// Host item `type` to the typed kind. Unknown types are skipped.
pub fn kind_from_host(raw: &str) -> Option<ItemKind> {
    let kind = match raw.trim() {
        "arme" => ItemKind::Weapon,
        "armure" => ItemKind::Armor,
        "objet" | "potion" => ItemKind::Consumable,
        "sort" => ItemKind::Spell(SpellSchool::Sort),
        "rituel" => ItemKind::Spell(SpellSchool::Rituel),
        "incantation" | "pouvoir" => ItemKind::Spell(SpellSchool::Incantation),
        "competence" => ItemKind::Skill,
        "race" => ItemKind::Race,
        "metier" => ItemKind::Profession,
        _ => return None,
    };
    Some(kind)
}

pub fn kind_to_host(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Weapon => "arme",
        ItemKind::Armor => "armure",
        ItemKind::Consumable => "objet",
        ItemKind::Spell(SpellSchool::Sort) => "sort",
        ItemKind::Spell(SpellSchool::Rituel) => "rituel",
        ItemKind::Spell(SpellSchool::Incantation) => "incantation",
        ItemKind::Skill => "competence",
        ItemKind::Race => "race",
        ItemKind::Profession => "metier",
    }
}

fn carac(value: Option<&Value>) -> Option<Characteristic> {
    text(value).and_then(|raw| Characteristic::from_label(&raw))
}

fn attack_type(value: Option<&Value>) -> AttackType {
    match text(value).as_deref() {
        Some("ranged") | Some("distance") => AttackType::Ranged,
        Some("spell") | Some("sort") => AttackType::Spell,
        _ => AttackType::Melee,
    }
}

fn attack_from_host(raw: &Value) -> AttackConfig {
    let defaults = AttackConfig::default();
    AttackConfig {
        enabled: flag(raw.get("enabled")),
        carac: carac(raw.get("caracKey")),
        default_defense: carac(raw.get("defaultDefense")),
        base_difficulty: uint(raw.get("baseDifficulty")).unwrap_or(defaults.base_difficulty),
        defense_difficulty: uint(raw.get("defenseDifficulty")),
        damage: text(raw.get("damage"))
            .map(|spec| DamageSpec::normalize(&spec))
            .unwrap_or_default(),
        actions_cost: uint(raw.get("actionsCost")),
        use_pk: flag(raw.get("usePK")),
        kind: attack_type(raw.get("type")),
    }
}

/// Grant specs may be a list, a single spec or a map of specs.
fn grants_from_host(raw: Option<&Value>) -> Vec<GrantSpec> {
    let spec = |g: &Value| GrantSpec {
        pack: text(g.get("pack")),
        id: text(g.get("id")),
        name: text(g.get("name")),
    };
    let specs: Vec<GrantSpec> = match raw {
        Some(Value::Array(list)) => list.iter().map(spec).collect(),
        Some(Value::Object(map))
            if ["pack", "id", "name"].iter().any(|k| map.contains_key(*k)) =>
        {
            raw.map(spec).into_iter().collect()
        }
        Some(Value::Object(map)) => map.values().map(spec).collect(),
        _ => Vec::new(),
    };
    specs.into_iter().filter(GrantSpec::is_valid).collect()
}

/// Reads one item. Returns `None` for unknown item types.
pub fn item_from_document(doc: &Value) -> Option<ItemDocument> {
    let raw_kind = text(doc.get("type")).unwrap_or_default();
    let Some(kind) = kind_from_host(&raw_kind) else {
        tracing::warn!(kind = %raw_kind, "skipping item of unknown type");
        return None;
    };
    let sys = doc.get("system").unwrap_or(&Value::Null);
    let tag = |keys: &[&str]| keys.iter().find_map(|key| text(sys.get(*key)));

    let item = Item {
        id: ItemId::default(),
        name: text(doc.get("name")).unwrap_or_default(),
        kind,
        level: text(sys.get("level")).map(|raw| DieCode::normalize(&raw)),
        carac: carac(sys.get("caracKey")),
        equippable: flag(sys.get("equippable")),
        equipped: flag(sys.get("equipped")),
        passive_tag: tag(&["passiveTag"]),
        effect_tag: tag(&["effectTag", "unicreonTag", "activeTag", "effectActive", "unicreonUse"]),
        attack: sys.get("attack").filter(|a| a.is_object()).map(attack_from_host),
        defense: sys.get("defense").filter(|d| d.is_object()).map(|d| DefenseConfig {
            carac: carac(d.get("caracKey")),
            absorption: uint(d.get("absorption")).unwrap_or(0),
        }),
        granted_items: grants_from_host(sys.get("grantedItems")),
        granted_by: None,
        encumbrance: uint(sys.get("encumbrance")).unwrap_or(0),
        capacity_pe: uint(sys.get("capacityPe")).unwrap_or(0),
        uses: uint(sys.get("uses")).unwrap_or(0),
        uses_max: uint(sys.get("usesMax")).unwrap_or(0),
        destroy_on_use: flag(sys.get("destroyOnUse")),
        cost_ps: uint(sys.get("costPS")).unwrap_or(0),
        cost_pv: uint(sys.get("costPV")).unwrap_or(0),
        addiction: text(sys.get("addictionType")).and_then(|raw| Substance::from_key(&raw)),
    };
    Some(ItemDocument {
        key: text(doc.get("_id")).unwrap_or_default(),
        granted_by: text(at(doc, "flags.unicreon.grantedBy")),
        item,
    })
}

/// Writes an item back in host shape.
pub fn item_to_document(key: &str, item: &Item, granted_by: Option<&str>) -> Value {
    let mut sys = json!({
        "equippable": item.equippable,
        "equipped": item.equipped,
        "encumbrance": item.encumbrance,
        "capacityPe": item.capacity_pe,
        "uses": item.uses,
        "usesMax": item.uses_max,
        "destroyOnUse": item.destroy_on_use,
        "costPS": item.cost_ps,
        "costPV": item.cost_pv,
        "grantedItems": item.granted_items.iter().map(|g| json!({
            "pack": g.pack,
            "id": g.id,
            "name": g.name,
        })).collect::<Vec<_>>(),
    });
    let optional = [
        ("level", item.level.map(|d| json!(d.to_string()))),
        ("caracKey", item.carac.map(|c| json!(c.key()))),
        ("passiveTag", item.passive_tag.as_ref().map(|t| json!(t))),
        ("effectTag", item.effect_tag.as_ref().map(|t| json!(t))),
        ("addictionType", item.addiction.map(|s| json!(s.key()))),
        ("attack", item.attack.as_ref().map(attack_to_host)),
        (
            "defense",
            item.defense.map(|d| {
                json!({"caracKey": d.carac.map(Characteristic::key), "absorption": d.absorption})
            }),
        ),
    ];
    for (key, value) in optional {
        if let (Some(value), Some(map)) = (value, sys.as_object_mut()) {
            map.insert(key.to_string(), value);
        }
    }

    let mut doc = json!({
        "_id": key,
        "name": item.name,
        "type": kind_to_host(item.kind),
        "system": sys,
    });
    if let Some(source) = granted_by {
        super::value::set(&mut doc, "flags.unicreon.grantedBy", json!(source));
    }
    doc
}

fn attack_to_host(attack: &AttackConfig) -> Value {
    json!({
        "enabled": attack.enabled,
        "caracKey": attack.carac.map(Characteristic::key),
        "defaultDefense": attack.default_defense.map(Characteristic::key),
        "baseDifficulty": attack.base_difficulty,
        "defenseDifficulty": attack.defense_difficulty,
        "damage": attack.damage.to_string(),
        "actionsCost": attack.actions_cost,
        "usePK": attack.use_pk,
        "type": match attack.kind {
            AttackType::Melee => "melee",
            AttackType::Ranged => "ranged",
            AttackType::Spell => "spell",
        },
    })
}
