use crate::config::RulesConfig;
use crate::state::Character;

/// Outcome of [`spend_actions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionSpend {
    /// Not the actor's turn: nothing was spent.
    Free { available: u32 },
    Spent { remaining: u32 },
    /// On turn with fewer actions than requested. Nothing was spent.
    Insufficient { left: u32, needed: u32 },
}

impl ActionSpend {
    /// Actions still available after the call.
    pub const fn available(self) -> u32 {
        match self {
            Self::Free { available } => available,
            Self::Spent { remaining } => remaining,
            Self::Insufficient { left, .. } => left,
        }
    }
}

/// Actions this character receives per turn.
pub fn actions_total(character: &Character, config: &RulesConfig) -> u32 {
    character
        .actions_total
        .unwrap_or_else(|| config.actions_per_turn())
}

/// Spends `cost` actions. Off turn the full total is reported and nothing
/// changes.
pub fn spend_actions(
    character: &mut Character,
    config: &RulesConfig,
    cost: u32,
    on_turn: bool,
) -> ActionSpend {
    let total = actions_total(character, config);
    if !on_turn {
        return ActionSpend::Free { available: total };
    }
    let left = character.actions_left.min(total);
    if cost > left {
        return ActionSpend::Insufficient { left, needed: cost };
    }
    character.actions_left = left - cost;
    ActionSpend::Spent {
        remaining: character.actions_left,
    }
}

/// Restores actions and movement at the start of the character's turn.
pub fn reset_turn(character: &mut Character, config: &RulesConfig) {
    character.actions_left = actions_total(character, config);
    character.pools.pm.refill();
}
