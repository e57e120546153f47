//! Typed item schema.
//!
//! Items are validated once at the boundary (see the content crate) and the
//! engine only ever works against these structures.

use crate::combat::DamageSpec;
use crate::negative::Substance;
use crate::stats::{Characteristic, DieCode};

use super::ids::ItemId;

/// School of a spell-like item. All three behave identically in the rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellSchool {
    #[default]
    Sort,
    Rituel,
    Incantation,
}

/// Item category. Race, profession and skill are conceptual: they never
/// weigh anything in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Spell(SpellSchool),
    Skill,
    Race,
    Profession,
}

impl ItemKind {
    pub const fn is_conceptual(self) -> bool {
        matches!(self, Self::Skill | Self::Race | Self::Profession)
    }

    pub const fn is_spell(self) -> bool {
        matches!(self, Self::Spell(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
    Spell,
}

impl AttackType {
    /// Defense characteristic used when nothing else suggests one.
    pub const fn default_defense(self) -> Characteristic {
        match self {
            Self::Spell => Characteristic::Volonte,
            Self::Melee | Self::Ranged => Characteristic::Agilite,
        }
    }
}

/// Attack configuration carried by weapons and offensive spells.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AttackConfig {
    pub enabled: bool,
    /// Attack characteristic. Falls back to the item's, then puissance.
    pub carac: Option<Characteristic>,
    /// Defense characteristic imposed on the target.
    pub default_defense: Option<Characteristic>,
    /// Total the attacker must reach.
    pub base_difficulty: u32,
    /// Total the defender must reach. Defaults to `base_difficulty`.
    pub defense_difficulty: Option<u32>,
    pub damage: DamageSpec,
    /// Actions consumed. `None` uses the configured default.
    pub actions_cost: Option<u32>,
    /// Whether the attacker may spend karma on this attack.
    pub use_pk: bool,
    pub kind: AttackType,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            carac: None,
            default_defense: None,
            base_difficulty: 4,
            defense_difficulty: None,
            damage: DamageSpec::default(),
            actions_cost: None,
            use_pk: false,
            kind: AttackType::default(),
        }
    }
}

impl AttackConfig {
    pub fn defense_difficulty(&self) -> u32 {
        self.defense_difficulty.unwrap_or(self.base_difficulty)
    }
}

/// Defensive properties of armor and shields, applied while equipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DefenseConfig {
    /// Defense characteristic this equipment suggests.
    pub carac: Option<Characteristic>,
    pub absorption: u32,
}

/// Reference to a compendium item granted while the owner is equipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GrantSpec {
    pub pack: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
}

impl GrantSpec {
    /// A spec needs an id or a name to be looked up.
    pub fn is_valid(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.id) || filled(&self.name)
    }

    pub fn describe(&self) -> String {
        let target = self
            .name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("?");
        match &self.pack {
            Some(pack) => format!("{target} ({pack})"),
            None => target.to_string(),
        }
    }
}

/// An owned item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Skill or spell level die.
    pub level: Option<DieCode>,
    pub carac: Option<Characteristic>,
    pub equippable: bool,
    pub equipped: bool,
    pub passive_tag: Option<String>,
    pub effect_tag: Option<String>,
    pub attack: Option<AttackConfig>,
    pub defense: Option<DefenseConfig>,
    pub granted_items: Vec<GrantSpec>,
    /// Source item that created this one through a grant.
    pub granted_by: Option<ItemId>,
    pub encumbrance: u32,
    pub capacity_pe: u32,
    pub uses: u32,
    pub uses_max: u32,
    pub destroy_on_use: bool,
    pub cost_ps: u32,
    pub cost_pv: u32,
    /// Substance dosed when the item is used.
    pub addiction: Option<Substance>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: ItemId::default(),
            name: String::new(),
            kind: ItemKind::Consumable,
            level: None,
            carac: None,
            equippable: false,
            equipped: false,
            passive_tag: None,
            effect_tag: None,
            attack: None,
            defense: None,
            granted_items: Vec::new(),
            granted_by: None,
            encumbrance: 0,
            capacity_pe: 0,
            uses: 0,
            uses_max: 0,
            destroy_on_use: false,
            cost_ps: 0,
            cost_pv: 0,
            addiction: None,
        }
    }
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Equippable items that are currently worn.
    pub const fn is_active_equipment(&self) -> bool {
        self.equippable && self.equipped
    }

    /// The attack configuration, if present and enabled.
    pub fn enabled_attack(&self) -> Option<&AttackConfig> {
        self.attack.as_ref().filter(|attack| attack.enabled)
    }

    pub fn absorption(&self) -> u32 {
        if !self.is_active_equipment() {
            return 0;
        }
        self.defense.map_or(0, |defense| defense.absorption)
    }

    /// Whether using the item should delete it afterwards.
    pub const fn consumed_on_use(&self) -> bool {
        self.destroy_on_use && (self.uses_max == 0 || self.uses == 0)
    }
}
