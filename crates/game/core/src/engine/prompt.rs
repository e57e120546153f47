//! User choices requested before dice are rolled.
//!
//! Returning `None` from any method cancels the operation. Prompts are only
//! asked after validation and before any state change.

use crate::combat::RollMode;
use crate::state::ActorId;
use crate::stats::Characteristic;

/// What the attacker is about to do, with engine defaults filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackRequest {
    pub attacker: ActorId,
    pub defender: ActorId,
    pub item: String,
    pub attack_carac: Characteristic,
    pub defense_carac: Characteristic,
    pub attack_mode: RollMode,
    pub defense_mode: RollMode,
    /// Karma each side may spend. Zero for the attacker unless the attack
    /// allows it.
    pub attacker_karma_available: u32,
    pub defender_karma_available: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackChoice {
    pub attack_mode: RollMode,
    pub defense_mode: RollMode,
    /// Explicit defense characteristic, overriding the suggested one.
    pub defense_carac: Option<Characteristic>,
    pub attacker_karma: u32,
    pub defender_karma: u32,
}

impl AttackChoice {
    /// Accepts every default and spends no karma.
    pub fn defaults(request: &AttackRequest) -> Self {
        Self {
            attack_mode: request.attack_mode,
            defense_mode: request.defense_mode,
            defense_carac: None,
            attacker_karma: 0,
            defender_karma: 0,
        }
    }
}

pub trait Prompt {
    fn attack(&mut self, request: &AttackRequest) -> Option<AttackChoice>;

    /// Mode of a single check, `default` being the trait-derived one.
    fn check_mode(&mut self, label: &str, default: RollMode) -> Option<RollMode>;
}

/// Accepts every default without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoPrompt;

impl Prompt for AutoPrompt {
    fn attack(&mut self, request: &AttackRequest) -> Option<AttackChoice> {
        Some(AttackChoice::defaults(request))
    }

    fn check_mode(&mut self, _label: &str, default: RollMode) -> Option<RollMode> {
        Some(default)
    }
}

/// Dismisses every prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct CancelPrompt;

impl Prompt for CancelPrompt {
    fn attack(&mut self, _request: &AttackRequest) -> Option<AttackChoice> {
        None
    }

    fn check_mode(&mut self, _label: &str, _default: RollMode) -> Option<RollMode> {
        None
    }
}
