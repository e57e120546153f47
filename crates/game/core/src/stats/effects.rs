//! Timed buffs and debuffs recorded on a character sheet.

use super::characteristic::Characteristic;
use super::pools::PoolBonusKey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    #[default]
    Buff,
    Debuff,
}

/// What an effect's value modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    Carac(Characteristic),
    Pool(PoolBonusKey),
}

/// A buff or debuff.
///
/// `remaining_turns` is `0` for permanent effects and negative for disabled
/// ones. An effect without a target or with a zero value is narrative only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Effect {
    pub label: String,
    pub kind: EffectKind,
    pub remaining_turns: i32,
    pub target: Option<EffectTarget>,
    pub value: i32,
    pub description: String,
    /// Deleted when a tick brings it to zero instead of becoming permanent.
    pub one_shot: bool,
}

impl Effect {
    pub fn new(label: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            label: label.into(),
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: EffectTarget, value: i32) -> Self {
        self.target = Some(target);
        self.value = value;
        self
    }

    #[must_use]
    pub fn lasting(mut self, turns: i32) -> Self {
        self.remaining_turns = turns;
        self
    }

    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub const fn is_disabled(&self) -> bool {
        self.remaining_turns < 0
    }

    pub const fn is_permanent(&self) -> bool {
        self.remaining_turns == 0
    }

    /// The modifier this effect contributes, if any.
    pub fn contribution(&self) -> Option<(EffectTarget, i32)> {
        if self.is_disabled() || self.value == 0 {
            return None;
        }
        self.target.map(|target| (target, self.value))
    }

    pub fn duration_label(&self) -> String {
        match self.remaining_turns {
            turns if turns < 0 => "Désactivé".to_string(),
            0 => "Permanent".to_string(),
            1 => "1 tour".to_string(),
            turns => format!("{turns} tours"),
        }
    }
}

/// Result of ticking one effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Permanent or disabled effects do not count down.
    Unchanged,
    Decremented { remaining: i32 },
    /// A one-shot effect reached zero and was removed.
    Expired(Effect),
}

/// Counts one turn down on `effects[index]`.
///
/// Returns `None` when the index is out of range.
pub fn tick_effect(effects: &mut Vec<Effect>, index: usize) -> Option<TickOutcome> {
    let effect = effects.get_mut(index)?;
    if effect.remaining_turns <= 0 {
        return Some(TickOutcome::Unchanged);
    }
    effect.remaining_turns -= 1;
    if effect.remaining_turns == 0 && effect.one_shot {
        return Some(TickOutcome::Expired(effects.remove(index)));
    }
    Some(TickOutcome::Decremented {
        remaining: effect.remaining_turns,
    })
}
