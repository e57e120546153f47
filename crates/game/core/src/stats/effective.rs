//! Effective hit points.
//!
//! The stored PV pool is the base quantity. Gameplay and display work on the
//! effective pool, which adds the aggregated `pv.max` bonus on top of it.

use super::pools::Pool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectivePool {
    pub base_value: u32,
    pub base_max: u32,
    pub bonus: i32,
    pub value: u32,
    pub max: u32,
}

impl EffectivePool {
    pub fn of(base: &Pool, bonus: i32) -> Self {
        let max = (i64::from(base.max()) + i64::from(bonus)).clamp(0, i64::from(u32::MAX));
        let value = (i64::from(base.value()) + i64::from(bonus)).clamp(0, max);
        Self {
            base_value: base.value(),
            base_max: base.max(),
            bonus,
            value: value as u32,
            max: max as u32,
        }
    }

    pub fn percent(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        (u64::from(self.value) * 100 / u64::from(self.max)) as u32
    }
}

/// Sets the effective value and writes the matching base value back.
///
/// The requested value is clamped to the effective range first, then the
/// base is clamped to `[0, base_max]`.
pub fn set_effective_value(base: &mut Pool, bonus: i32, requested: i64) -> EffectivePool {
    let current = EffectivePool::of(base, bonus);
    let effective = requested.clamp(0, i64::from(current.max));
    base.set_value(effective - i64::from(bonus));
    EffectivePool::of(base, bonus)
}

/// Heals (positive) or damages (negative) in effective space.
pub fn apply_effective_delta(base: &mut Pool, bonus: i32, delta: i64) -> EffectivePool {
    let current = EffectivePool::of(base, bonus);
    set_effective_value(base, bonus, i64::from(current.value) + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_raises_effective_value_and_max() {
        let eff = EffectivePool::of(&Pool::new(8, 10), 3);
        assert_eq!((eff.value, eff.max), (11, 13));
    }

    #[test]
    fn negative_bonus_never_goes_below_zero() {
        let eff = EffectivePool::of(&Pool::new(2, 4), -6);
        assert_eq!((eff.value, eff.max), (0, 0));
    }

    #[test]
    fn damage_in_effective_space_writes_base_back() {
        let mut pv = Pool::new(10, 10);
        let eff = apply_effective_delta(&mut pv, 2, -5);
        assert_eq!(eff.value, 7);
        assert_eq!(pv.value(), 5);
    }

    #[test]
    fn heal_is_capped_by_effective_and_base_max() {
        let mut pv = Pool::new(4, 10);
        let eff = apply_effective_delta(&mut pv, 2, 50);
        assert_eq!(eff.value, 12);
        assert_eq!(pv.value(), 10);
    }

    #[test]
    fn lethal_damage_clamps_at_zero() {
        let mut pv = Pool::new(3, 10);
        let eff = apply_effective_delta(&mut pv, 0, -9);
        assert_eq!(eff.value, 0);
        assert!(pv.is_empty());
    }
}
