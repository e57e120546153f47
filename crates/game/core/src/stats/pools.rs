//! Resource pools: hit points, movement, spell points and karma.
//!
//! A [`Pool`] can only be built or changed through clamping methods, so
//! `0 <= value <= max` holds after every mutation. Untrusted input (sheet
//! edits, host documents) is normalized rather than rejected.

use strum::EnumIter;

/// Identifies one of the four pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolKind {
    /// Hit points.
    Pv,
    /// Movement points.
    Pm,
    /// Spell points.
    Ps,
    /// Karma.
    Pk,
}

impl PoolKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pv => "PV",
            Self::Pm => "PM",
            Self::Ps => "PS",
            Self::Pk => "PK",
        }
    }
}

/// Pool maxima that effects and passive tags may raise or lower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolBonusKey {
    PvMax,
    PkMax,
    PsMax,
}

impl PoolBonusKey {
    pub const fn key(self) -> &'static str {
        match self {
            Self::PvMax => "pv.max",
            Self::PkMax => "pk.max",
            Self::PsMax => "ps.max",
        }
    }

    pub const fn pool(self) -> PoolKind {
        match self {
            Self::PvMax => PoolKind::Pv,
            Self::PkMax => PoolKind::Pk,
            Self::PsMax => PoolKind::Ps,
        }
    }

    /// Matches `pv.max`, `pv max` or a bare `pv` (already folded).
    pub fn from_folded(label: &str) -> Option<Self> {
        let mut words = label.split(['.', ' ']).filter(|w| !w.is_empty());
        let pool = words.next()?;
        match words.next() {
            None | Some("max") => {}
            Some(_) => return None,
        }
        if words.next().is_some() {
            return None;
        }
        match pool {
            "pv" => Some(Self::PvMax),
            "pk" => Some(Self::PkMax),
            "ps" => Some(Self::PsMax),
            _ => None,
        }
    }
}

/// A clamped numeric resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawPool")
)]
pub struct Pool {
    value: u32,
    max: u32,
}

impl Pool {
    /// Builds a pool from untrusted numbers, clamping both.
    pub fn new(value: i64, max: i64) -> Self {
        let max = clamp_to_u32(max);
        let pool = Self {
            value: clamp_to_u32(value).min(max),
            max,
        };
        pool.debug_check();
        pool
    }

    pub const fn full(max: u32) -> Self {
        Self { value: max, max }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Sets the current value, clamped to `[0, max]`. Returns the stored value.
    pub fn set_value(&mut self, value: i64) -> u32 {
        self.value = clamp_to_u32(value).min(self.max);
        self.debug_check();
        self.value
    }

    /// Sets the maximum (negative becomes 0) and re-clamps the value.
    pub fn set_max(&mut self, max: i64) {
        self.max = clamp_to_u32(max);
        self.value = self.value.min(self.max);
        self.debug_check();
    }

    /// Adds a signed delta, clamped. Returns the change actually applied.
    pub fn adjust(&mut self, delta: i64) -> i64 {
        let before = i64::from(self.value);
        self.set_value(before + delta);
        i64::from(self.value) - before
    }

    /// Removes `amount` if available. Leaves the pool untouched otherwise.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        if amount > self.value {
            return false;
        }
        self.value -= amount;
        self.debug_check();
        true
    }

    pub fn refill(&mut self) {
        self.value = self.max;
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(
            self.value <= self.max,
            "pool invariant violated: {} > {}",
            self.value,
            self.max
        );
    }
}

fn clamp_to_u32(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Wire shape of a pool before normalization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPool {
    #[serde(default)]
    value: i64,
    #[serde(default)]
    max: i64,
}

#[cfg(feature = "serde")]
impl From<RawPool> for Pool {
    fn from(raw: RawPool) -> Self {
        Pool::new(raw.value, raw.max)
    }
}

/// The four pools of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Pools {
    pub pv: Pool,
    pub pm: Pool,
    pub ps: Pool,
    pub pk: Pool,
}

impl Pools {
    pub fn get(&self, kind: PoolKind) -> &Pool {
        match kind {
            PoolKind::Pv => &self.pv,
            PoolKind::Pm => &self.pm,
            PoolKind::Ps => &self.ps,
            PoolKind::Pk => &self.pk,
        }
    }

    pub fn get_mut(&mut self, kind: PoolKind) -> &mut Pool {
        match kind {
            PoolKind::Pv => &mut self.pv,
            PoolKind::Pm => &mut self.pm,
            PoolKind::Ps => &mut self.ps,
            PoolKind::Pk => &mut self.pk,
        }
    }
}
