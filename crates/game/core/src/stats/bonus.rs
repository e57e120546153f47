//! Derived attribute aggregation.
//!
//! Sums the modifiers contributed by timed effects and by the passive tags of
//! worn equipment. The computation is a full recompute over its inputs: there
//! is no incremental path, so callers re-run it whenever effects or equipment
//! change.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::state::Item;
use crate::tags::{PassiveDirective, parse_passive_tag};

use super::characteristic::Characteristic;
use super::effects::{Effect, EffectTarget};
use super::pools::PoolBonusKey;

/// Net modifiers per characteristic and per pool maximum.
///
/// Every characteristic and every pool key is always present, defaulting to 0.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedBonuses {
    carac: BTreeMap<Characteristic, i32>,
    pool: BTreeMap<PoolBonusKey, i32>,
}

impl Default for DerivedBonuses {
    fn default() -> Self {
        Self {
            carac: Characteristic::iter().map(|carac| (carac, 0)).collect(),
            pool: PoolBonusKey::iter().map(|key| (key, 0)).collect(),
        }
    }
}

impl DerivedBonuses {
    /// Aggregates effects and the passive tags of worn equipment.
    ///
    /// Disabled effects are skipped. Items count only when both equippable
    /// and equipped.
    pub fn compute<'a>(effects: &[Effect], items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut bonuses = Self::default();

        for (target, value) in effects.iter().filter_map(Effect::contribution) {
            bonuses.add(target, value);
        }

        for item in items.into_iter().filter(|item| item.is_active_equipment()) {
            let Some(tag) = item.passive_tag.as_deref() else {
                continue;
            };
            match parse_passive_tag(tag) {
                Some(PassiveDirective::Carac { carac, value }) => {
                    bonuses.add(EffectTarget::Carac(carac), value)
                }
                Some(PassiveDirective::Pool { key, value }) => {
                    bonuses.add(EffectTarget::Pool(key), value)
                }
                None => tracing::trace!("passive tag {:?} on {} ignored", tag, item.name),
            }
        }

        bonuses
    }

    fn add(&mut self, target: EffectTarget, value: i32) {
        let slot = match target {
            EffectTarget::Carac(carac) => self.carac.entry(carac).or_insert(0),
            EffectTarget::Pool(key) => self.pool.entry(key).or_insert(0),
        };
        *slot = slot.saturating_add(value);
    }

    pub fn carac(&self, carac: Characteristic) -> i32 {
        self.carac.get(&carac).copied().unwrap_or(0)
    }

    pub fn pool(&self, key: PoolBonusKey) -> i32 {
        self.pool.get(&key).copied().unwrap_or(0)
    }

    pub fn caracs(&self) -> impl Iterator<Item = (Characteristic, i32)> + '_ {
        self.carac.iter().map(|(carac, value)| (*carac, *value))
    }

    /// Characteristic modifiers worth displaying.
    pub fn nonzero_caracs(&self) -> impl Iterator<Item = (Characteristic, i32)> + '_ {
        self.caracs().filter(|(_, value)| *value != 0)
    }
}

/// Formats a modifier with an explicit sign (`+1`, `-2`, `+0`).
pub fn signed(value: i32) -> String {
    format!("{value:+}")
}
