//! Damage specification and absorption.

use core::fmt;
use core::str::FromStr;

/// Damage dealt by a winning attack.
///
/// Written either as a literal (`"3"`) or as `"max N"`, meaning the attack
/// total capped at N.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSpec {
    Flat(u32),
    CappedByRoll(u32),
}

impl Default for DamageSpec {
    fn default() -> Self {
        Self::Flat(0)
    }
}

impl DamageSpec {
    /// Parses leniently: unreadable text deals no damage.
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!("unreadable damage spec {:?}, dealing 0", raw);
            Self::default()
        })
    }

    pub fn raw_damage(self, attack_total: i32) -> u32 {
        match self {
            Self::Flat(amount) => amount,
            Self::CappedByRoll(cap) => (attack_total.max(0) as u32).min(cap),
        }
    }
}

impl FromStr for DamageSpec {
    type Err = core::num::ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim().to_ascii_lowercase();
        match text.strip_prefix("max") {
            Some(cap) => cap.trim().parse().map(Self::CappedByRoll),
            None => text.parse().map(Self::Flat),
        }
    }
}

impl fmt::Display for DamageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(amount) => write!(f, "{amount}"),
            Self::CappedByRoll(cap) => write!(f, "max {cap}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DamageSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DamageSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SpecVisitor;

        impl serde::de::Visitor<'_> for SpecVisitor {
            type Value = DamageSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a damage amount or \"max N\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<DamageSpec, E> {
                Ok(DamageSpec::normalize(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<DamageSpec, E> {
                Ok(DamageSpec::Flat(u32::try_from(v).unwrap_or(u32::MAX)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<DamageSpec, E> {
                Ok(DamageSpec::Flat(u32::try_from(v.max(0)).unwrap_or(u32::MAX)))
            }
        }

        deserializer.deserialize_any(SpecVisitor)
    }
}

/// Damage after equipment absorption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Absorbed {
    pub raw: u32,
    pub absorbed: u32,
    pub dealt: u32,
}

impl Absorbed {
    pub const fn fully_absorbed(&self) -> bool {
        self.raw > 0 && self.dealt == 0
    }
}

/// Absorption is capped at the raw damage.
pub fn absorb(raw: u32, absorption: u32) -> Absorbed {
    let absorbed = absorption.min(raw);
    Absorbed {
        raw,
        absorbed,
        dealt: raw - absorbed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_and_capped_specs() {
        assert_eq!("3".parse(), Ok(DamageSpec::Flat(3)));
        assert_eq!("max 4".parse(), Ok(DamageSpec::CappedByRoll(4)));
        assert_eq!("MAX4".parse(), Ok(DamageSpec::CappedByRoll(4)));
        assert_eq!(DamageSpec::normalize("beaucoup"), DamageSpec::Flat(0));
    }

    #[test]
    fn capped_spec_limits_by_attack_total() {
        assert_eq!(DamageSpec::CappedByRoll(4).raw_damage(7), 4);
        assert_eq!(DamageSpec::CappedByRoll(4).raw_damage(3), 3);
        assert_eq!(DamageSpec::CappedByRoll(4).raw_damage(-1), 0);
        assert_eq!(DamageSpec::Flat(2).raw_damage(9), 2);
    }

    #[test]
    fn absorption_reduces_and_caps() {
        assert_eq!(absorb(5, 2).dealt, 3);
        let blocked = absorb(5, 6);
        assert_eq!((blocked.absorbed, blocked.dealt), (5, 0));
        assert!(blocked.fully_absorbed());
        assert!(!absorb(0, 3).fully_absorbed());
    }
}
