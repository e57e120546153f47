//! One-shot defensive stances.

use crate::state::{ActorId, AttackType};
use crate::stats::Characteristic;
use crate::text::fold;

use super::mode::RollMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StanceKind {
    /// Braces against melee and ranged attacks with puissance.
    Physical,
    /// Braces against spells with pouvoir.
    Mental,
}

impl StanceKind {
    pub const fn defense_carac(self) -> Characteristic {
        match self {
            Self::Physical => Characteristic::Puissance,
            Self::Mental => Characteristic::Pouvoir,
        }
    }

    pub const fn covers(self, attack: AttackType) -> bool {
        match self {
            Self::Physical => matches!(attack, AttackType::Melee | AttackType::Ranged),
            Self::Mental => matches!(attack, AttackType::Spell),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Physical => "physique",
            Self::Mental => "mentale",
        }
    }

    /// Defensive skills are recognized by name: "Résistance physique" and
    /// "Résistance mentale".
    pub fn from_skill_name(name: &str) -> Option<Self> {
        let folded = fold(name);
        if !folded.contains("resistance") {
            return None;
        }
        if folded.contains("physique") {
            Some(Self::Physical)
        } else if folded.contains("mentale") {
            Some(Self::Mental)
        } else {
            None
        }
    }
}

/// Stance armed by a defensive skill, consumed by the next matching check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseStance {
    pub kind: StanceKind,
    pub mode: RollMode,
    pub uses_remaining: u32,
    pub restricted_to: Option<ActorId>,
}

impl DefenseStance {
    pub fn new(kind: StanceKind) -> Self {
        Self {
            kind,
            mode: RollMode::Advantage,
            uses_remaining: 1,
            restricted_to: None,
        }
    }

    #[must_use]
    pub fn against(mut self, attacker: ActorId) -> Self {
        self.restricted_to = Some(attacker);
        self
    }

    pub fn matches(&self, attack: AttackType, attacker: ActorId) -> bool {
        self.uses_remaining > 0
            && self.kind.covers(attack)
            && self.restricted_to.is_none_or(|id| id == attacker)
    }
}

/// Consumes one use of the stance if it matches. Clears the slot when the
/// last use is spent.
pub fn consume_stance(
    slot: &mut Option<DefenseStance>,
    attack: AttackType,
    attacker: ActorId,
) -> Option<DefenseStance> {
    let stance = slot.as_mut().filter(|stance| stance.matches(attack, attacker))?;
    stance.uses_remaining -= 1;
    let used = *stance;
    if used.uses_remaining == 0 {
        *slot = None;
    }
    Some(used)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_defensive_skills() {
        assert_eq!(
            StanceKind::from_skill_name("Résistance physique"),
            Some(StanceKind::Physical)
        );
        assert_eq!(
            StanceKind::from_skill_name("RESISTANCE MENTALE"),
            Some(StanceKind::Mental)
        );
        assert_eq!(StanceKind::from_skill_name("Escalade"), None);
    }

    #[test]
    fn matching_respects_attack_type_and_attacker() {
        let stance = DefenseStance::new(StanceKind::Physical).against(ActorId(2));
        assert!(stance.matches(AttackType::Melee, ActorId(2)));
        assert!(stance.matches(AttackType::Ranged, ActorId(2)));
        assert!(!stance.matches(AttackType::Spell, ActorId(2)));
        assert!(!stance.matches(AttackType::Melee, ActorId(3)));
    }

    #[test]
    fn single_use_stance_is_removed_after_consumption() {
        let mut slot = Some(DefenseStance::new(StanceKind::Mental));
        assert!(consume_stance(&mut slot, AttackType::Melee, ActorId(1)).is_none());
        assert!(slot.is_some());
        let used = consume_stance(&mut slot, AttackType::Spell, ActorId(1));
        assert_eq!(used.map(|s| s.kind), Some(StanceKind::Mental));
        assert!(slot.is_none());
    }
}
