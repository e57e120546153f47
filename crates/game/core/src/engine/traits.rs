//! Negative trait assignment and addiction bookkeeping.

use chrono::{DateTime, Utc};

use crate::dice::DiceRoller;
use crate::negative::{AddictionState, Substance, TraitProgress};
use crate::state::{ActorId, ActorKind, Character};

use super::{ActionError, Notice, RulesEngine};

/// A withdrawal flag flipped by [`RulesEngine::refresh_withdrawal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawalChange {
    pub actor: ActorId,
    pub withdrawal: bool,
    pub notice: Notice,
}

impl RulesEngine {
    /// Gives a character a catalog trait, restarting its progress.
    pub fn assign_trait(&self, character: &mut Character, key: &str) -> Result<(), ActionError> {
        let def = self
            .catalog()
            .get(key)
            .ok_or_else(|| ActionError::UnknownTrait(key.to_string()))?;
        character.negative_trait = TraitProgress::assign(def);
        if !def.mechanics.addiction {
            character.addiction = AddictionState::default();
        }
        tracing::debug!(actor = %character.id, key, "negative trait assigned");
        Ok(())
    }

    /// Picks a trait uniformly, never `none`. Returns the chosen key.
    pub fn assign_random_trait(
        &self,
        character: &mut Character,
        roller: &mut dyn DiceRoller,
    ) -> Option<String> {
        let key = self.catalog().random_pick(roller)?.key.clone();
        self.assign_trait(character, &key).ok()?;
        Some(key)
    }

    /// Chooses the substance an addicted character depends on. Picking one
    /// starts the clock at `now`.
    pub fn set_addiction(
        &self,
        character: &mut Character,
        substance: Option<Substance>,
        now: DateTime<Utc>,
    ) {
        character.addiction.set_substance(substance, now);
    }

    /// Records a dose taken outside any item, of `substance` or of the
    /// character's own substance.
    pub fn consume_dose(
        &self,
        character: &mut Character,
        substance: Option<Substance>,
        now: DateTime<Utc>,
    ) -> Result<Notice, ActionError> {
        let substance = substance
            .or(character.addiction.substance)
            .ok_or(ActionError::NoSubstance)?;
        Ok(self.record_dose(character, substance, now))
    }

    pub(super) fn record_dose(
        &self,
        character: &mut Character,
        substance: Substance,
        now: DateTime<Utc>,
    ) -> Notice {
        if character.addiction.substance.is_none() {
            character.addiction.substance = Some(substance);
        }
        character.addiction.record_dose(now);
        character.addiction.withdrawal = false;
        tracing::debug!(actor = %character.id, substance = substance.label(), "dose recorded");
        Notice::info(format!(
            "{} consomme sa dose ({}). Le manque est temporairement apaisé.",
            character.name,
            substance.label()
        ))
    }

    /// Recomputes the stored withdrawal flag.
    ///
    /// Only addicted player characters with a substance are tracked; anyone
    /// else has the flag cleared without a notice.
    pub fn refresh_withdrawal(
        &self,
        character: &mut Character,
        now: DateTime<Utc>,
    ) -> Option<WithdrawalChange> {
        let tracked = character.kind == ActorKind::Personnage
            && self.trait_of(character).mechanics.addiction;
        let Some(substance) = character.addiction.substance.filter(|_| tracked) else {
            character.addiction.withdrawal = false;
            return None;
        };

        let withdrawal = character
            .addiction
            .refresh(now, self.config().withdrawal_threshold())?;
        let text = if withdrawal {
            format!(
                "{} est maintenant en manque de {} (désavantage global).",
                character.name,
                substance.label()
            )
        } else {
            format!("{} n'est plus en manque de {}.", character.name, substance.label())
        };
        tracing::debug!(actor = %character.id, withdrawal, "withdrawal flag flipped");
        Some(WithdrawalChange {
            actor: character.id,
            withdrawal,
            notice: if withdrawal { Notice::warn(text) } else { Notice::info(text) },
        })
    }
}
