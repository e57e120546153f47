use crate::ledger::{ActionSpend, GridPosition, MoveVerdict, reset_turn, spend_actions, validate_move};
use crate::state::Character;

use super::{Notice, RulesEngine};

impl RulesEngine {
    /// Refills actions and movement when the combat turn reaches `character`.
    pub fn start_turn(&self, character: &mut Character) {
        reset_turn(character, self.config());
        tracing::debug!(
            actor = %character.id,
            actions = character.actions_left,
            pm = character.pools.pm.value(),
            "turn started"
        );
    }

    pub fn spend_actions(&self, character: &mut Character, cost: u32, on_turn: bool) -> ActionSpend {
        spend_actions(character, self.config(), cost, on_turn)
    }

    /// Validates a token move against the character's load and movement.
    pub fn move_character(
        &self,
        character: &mut Character,
        from: GridPosition,
        to: GridPosition,
        on_turn: bool,
    ) -> MoveVerdict {
        let load = self.carry_load(character);
        let verdict = validate_move(character, &load, from, to, on_turn);
        if !verdict.is_allowed() {
            tracing::debug!(actor = %character.id, ?verdict, "move vetoed");
        }
        verdict
    }

    /// Warning for a vetoed move.
    pub fn move_refusal(&self, character: &Character, verdict: MoveVerdict) -> Option<Notice> {
        match verdict {
            MoveVerdict::Free | MoveVerdict::Allowed { .. } => None,
            MoveVerdict::TooFar { cost, left } => Some(Notice::warn(format!(
                "{} n'a plus assez de PM ({left} restant(s), {cost} requis).",
                character.name
            ))),
            MoveVerdict::Overloaded { used, max } => Some(Notice::warn(format!(
                "{} est surchargé ({used} / {max} PE) et ne peut pas se déplacer.",
                character.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{character, engine};
    use crate::state::{Item, ItemId, ItemKind};

    #[test]
    fn start_turn_refills_actions_and_movement() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.actions_left = 0;
        hero.pools.pm.set_value(1);
        engine.start_turn(&mut hero);
        assert_eq!(hero.actions_left, 2);
        assert_eq!(hero.pools.pm.value(), 6);
    }

    #[test]
    fn moves_spend_movement_on_turn_only() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let from = GridPosition::new(0, 0);
        let to = GridPosition::new(3, 4);
        assert_eq!(engine.move_character(&mut hero, from, to, false), MoveVerdict::Free);
        assert_eq!(
            engine.move_character(&mut hero, from, to, true),
            MoveVerdict::Allowed { cost: 5, remaining: 1 }
        );
        assert_eq!(
            engine.move_character(&mut hero, from, to, true),
            MoveVerdict::TooFar { cost: 5, left: 1 }
        );
    }

    #[test]
    fn overloaded_character_cannot_move() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let mut anvil = Item::new(ItemId(0), "Enclume", ItemKind::Consumable);
        anvil.encumbrance = 40;
        hero.add_item(anvil);
        let verdict = engine.move_character(
            &mut hero,
            GridPosition::new(0, 0),
            GridPosition::new(1, 0),
            false,
        );
        assert_eq!(verdict, MoveVerdict::Overloaded { used: 40, max: 10 });
        assert_eq!(
            engine.move_refusal(&hero, verdict).unwrap().text,
            "Aube est surchargé (40 / 10 PE) et ne peut pas se déplacer."
        );
        assert!(engine.move_refusal(&hero, MoveVerdict::Free).is_none());
    }
}
