//! Answers given up front to the questions the engine asks before rolling.
//!
//! The runtime has no dialog to open, so a command carries its answers
//! with it. Anything left unset accepts the engine's default.

use serde::{Deserialize, Serialize};

use unicreon_core::{AttackChoice, AttackRequest, Characteristic, Prompt, RollMode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptAnswers {
    pub attack_mode: Option<RollMode>,
    pub defense_mode: Option<RollMode>,
    pub defense_carac: Option<Characteristic>,
    /// Karma requested. The engine caps it at what each side may spend.
    pub attacker_karma: u32,
    pub defender_karma: u32,
    pub check_mode: Option<RollMode>,
    /// Dismisses the dialog.
    pub cancel: bool,
}

impl PromptAnswers {
    pub fn cancelled() -> Self {
        Self {
            cancel: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_karma(mut self, attacker: u32, defender: u32) -> Self {
        self.attacker_karma = attacker;
        self.defender_karma = defender;
        self
    }
}

impl Prompt for PromptAnswers {
    fn attack(&mut self, request: &AttackRequest) -> Option<AttackChoice> {
        if self.cancel {
            return None;
        }
        Some(AttackChoice {
            attack_mode: self.attack_mode.unwrap_or(request.attack_mode),
            defense_mode: self.defense_mode.unwrap_or(request.defense_mode),
            defense_carac: self.defense_carac,
            attacker_karma: self.attacker_karma,
            defender_karma: self.defender_karma,
        })
    }

    fn check_mode(&mut self, _label: &str, default: RollMode) -> Option<RollMode> {
        (!self.cancel).then(|| self.check_mode.unwrap_or(default))
    }
}
