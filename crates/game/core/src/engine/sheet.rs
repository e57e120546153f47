//! Derived character sheet.

use chrono::{DateTime, Utc};

use crate::negative::{NegativeTrait, TraitState};
use crate::state::Character;
use crate::stats::{CarryLoad, DerivedBonuses, EffectivePool, PoolBonusKey};

use super::RulesEngine;

/// What the sheet shows about the character's negative trait.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitInfo {
    pub key: String,
    pub label: String,
    pub state: TraitState,
    pub active: bool,
    /// Short description matching the state: dormant text while latent.
    pub summary: String,
    pub hours_since_last_dose: Option<f64>,
    pub withdrawal_active: bool,
}

/// Every value derived from a character, recomputed in full on each call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetSummary {
    pub bonuses: DerivedBonuses,
    pub carry: CarryLoad,
    pub pv: EffectivePool,
    pub absorption: u32,
    pub xp_percent: u32,
    pub negative_trait: TraitInfo,
}

impl RulesEngine {
    pub fn carry_load(&self, character: &Character) -> CarryLoad {
        let base = character
            .carry_base
            .unwrap_or(self.config.base_carry_capacity);
        CarryLoad::compute(&character.items, base)
    }

    pub fn trait_info(&self, character: &Character, now: DateTime<Utc>) -> TraitInfo {
        let def: &NegativeTrait = self.trait_of(character);
        let progress = &character.negative_trait;
        let summary = if def.secret && progress.state == TraitState::Latent {
            def.dormant_text().to_string()
        } else {
            def.short_active.clone()
        };
        let addicted = def.mechanics.addiction && character.addiction.substance.is_some();
        TraitInfo {
            key: def.key.clone(),
            label: def.label.clone(),
            state: progress.state,
            active: progress.is_active(def),
            summary,
            hours_since_last_dose: addicted
                .then(|| character.addiction.hours_since_last_dose(now))
                .flatten(),
            withdrawal_active: self.withdrawal_active(character, now),
        }
    }

    pub fn sheet(&self, character: &Character, now: DateTime<Utc>) -> SheetSummary {
        let bonuses = character.bonuses();
        let pv = EffectivePool::of(&character.pools.pv, bonuses.pool(PoolBonusKey::PvMax));
        SheetSummary {
            carry: self.carry_load(character),
            pv,
            absorption: character.absorption(),
            xp_percent: character.progress.percent(self.config.default_xp_next),
            negative_trait: self.trait_info(character, now),
            bonuses,
        }
    }
}
