use crate::state::Character;
use crate::stats::{Effect, TickOutcome, tick_effect};

use super::{ActionError, RulesEngine};

impl RulesEngine {
    /// Adds an effect. A label is required, the rest is taken as is.
    pub fn add_effect(&self, character: &mut Character, effect: Effect) -> Result<usize, ActionError> {
        let label = effect.label.trim();
        if label.is_empty() {
            return Err(ActionError::EmptyEffectLabel);
        }
        let effect = Effect {
            label: label.to_string(),
            ..effect
        };
        character.effects.push(effect);
        Ok(character.effects.len() - 1)
    }

    pub fn delete_effect(&self, character: &mut Character, index: usize) -> Result<Effect, ActionError> {
        let len = character.effects.len();
        if index >= len {
            return Err(ActionError::EffectIndexOutOfRange { index, len });
        }
        Ok(character.effects.remove(index))
    }

    /// Counts one turn down on an effect.
    pub fn tick_effect(&self, character: &mut Character, index: usize) -> Result<TickOutcome, ActionError> {
        let len = character.effects.len();
        tick_effect(&mut character.effects, index)
            .ok_or(ActionError::EffectIndexOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{character, engine};
    use crate::stats::EffectKind;

    #[test]
    fn label_is_required() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let err = engine
            .add_effect(&mut hero, Effect::new("  ", EffectKind::Debuff))
            .unwrap_err();
        assert_eq!(err, ActionError::EmptyEffectLabel);
        assert!(hero.effects.is_empty());
    }

    #[test]
    fn add_tick_and_delete() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let index = engine
            .add_effect(&mut hero, Effect::new(" Poison ", EffectKind::Debuff).lasting(2))
            .unwrap();
        assert_eq!(hero.effects[index].label, "Poison");
        assert_eq!(
            engine.tick_effect(&mut hero, index).unwrap(),
            TickOutcome::Decremented { remaining: 1 }
        );
        assert!(engine.tick_effect(&mut hero, 4).is_err());
        assert_eq!(engine.delete_effect(&mut hero, index).unwrap().label, "Poison");
        assert_eq!(
            engine.delete_effect(&mut hero, 0).unwrap_err(),
            ActionError::EffectIndexOutOfRange { index: 0, len: 0 }
        );
    }
}
