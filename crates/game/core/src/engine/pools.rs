//! Sheet edits of pool values and maxima.
//!
//! Edits come from untrusted input and are normalized, never refused.
//! Hit points are edited in effective space, like the sheet shows them.

use crate::state::Character;
use crate::stats::{EffectivePool, PoolBonusKey, PoolKind, set_effective_value};

use super::RulesEngine;

impl RulesEngine {
    /// Sets a pool's current value. For PV the value is the effective one.
    pub fn set_pool_value(&self, character: &mut Character, pool: PoolKind, value: i64) -> u32 {
        if pool == PoolKind::Pv {
            return self.set_effective_pv(character, value).value;
        }
        let stored = character.pools.get_mut(pool).set_value(value);
        tracing::trace!(actor = %character.id, %pool, stored, "pool value edited");
        stored
    }

    /// Sets a pool's stored maximum. The value is clamped down if needed.
    pub fn set_pool_max(&self, character: &mut Character, pool: PoolKind, max: i64) -> u32 {
        let target = character.pools.get_mut(pool);
        target.set_max(max);
        target.max()
    }

    pub fn set_effective_pv(&self, character: &mut Character, value: i64) -> EffectivePool {
        let bonus = character.bonuses().pool(PoolBonusKey::PvMax);
        set_effective_value(&mut character.pools.pv, bonus, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{character, engine};
    use crate::stats::{Effect, EffectKind, EffectTarget};

    #[test]
    fn edits_are_clamped() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        assert_eq!(engine.set_pool_value(&mut hero, PoolKind::Pm, 99), 6);
        assert_eq!(engine.set_pool_value(&mut hero, PoolKind::Pk, -4), 0);
        assert_eq!(engine.set_pool_max(&mut hero, PoolKind::Ps, 2), 2);
        assert_eq!(hero.pools.ps.value(), 2);
        assert_eq!(engine.set_pool_max(&mut hero, PoolKind::Ps, -1), 0);
    }

    #[test]
    fn pv_edits_go_through_effective_space() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.effects.push(
            Effect::new("Vigueur", EffectKind::Buff)
                .with_target(EffectTarget::Pool(PoolBonusKey::PvMax), 3),
        );
        let pv = engine.set_effective_pv(&mut hero, 8);
        assert_eq!((pv.value, pv.max), (8, 13));
        assert_eq!(hero.pools.pv.value(), 5);
        assert_eq!(engine.set_pool_value(&mut hero, PoolKind::Pv, 50), 13);
        assert_eq!(hero.pools.pv.value(), 10);
    }
}
