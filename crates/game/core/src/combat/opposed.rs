//! Opposed checks: attacker and defender roll against their own difficulty.

use crate::dice::{DiceFormula, DiceRoller, Roll};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    Attacker,
    Defender,
    /// Both sides failed.
    Inconclusive,
}

/// One side of an opposed check before rolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckSide {
    pub formula: DiceFormula,
    pub difficulty: u32,
}

/// A rolled side.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideResult {
    pub roll: Roll,
    pub difficulty: u32,
    pub success: bool,
}

impl SideResult {
    pub fn total(&self) -> i32 {
        self.roll.total
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpposedOutcome {
    pub attack: SideResult,
    pub defense: SideResult,
    pub winner: Winner,
}

/// Lowers a difficulty by the karma spent, never below `floor`.
///
/// A difficulty already under the floor is left as is.
pub fn apply_karma(difficulty: u32, karma: u32, floor: u32) -> u32 {
    if difficulty <= floor {
        return difficulty;
    }
    difficulty.saturating_sub(karma).max(floor)
}

/// Attacker wins alone or on a tie when both succeed.
pub fn decide_winner(attack: &SideResult, defense: &SideResult) -> Winner {
    match (attack.success, defense.success) {
        (true, false) => Winner::Attacker,
        (false, true) => Winner::Defender,
        (true, true) if attack.total() >= defense.total() => Winner::Attacker,
        (true, true) => Winner::Defender,
        (false, false) => Winner::Inconclusive,
    }
}

/// Rolls the attacker first, then the defender.
pub fn resolve_opposed(
    attack: CheckSide,
    defense: CheckSide,
    roller: &mut dyn DiceRoller,
) -> OpposedOutcome {
    let attack = roll_side(attack, roller);
    let defense = roll_side(defense, roller);
    let winner = decide_winner(&attack, &defense);
    OpposedOutcome {
        attack,
        defense,
        winner,
    }
}

fn roll_side(side: CheckSide, roller: &mut dyn DiceRoller) -> SideResult {
    let roll = side.formula.roll(roller);
    let success = roll.total >= side.difficulty as i32;
    SideResult {
        roll,
        difficulty: side.difficulty,
        success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::RollMode;
    use crate::dice::ScriptedDice;
    use crate::stats::DieCode;

    fn side(mode: RollMode, die: DieCode, bonus: i32, difficulty: u32) -> CheckSide {
        CheckSide {
            formula: mode.formula(die, bonus),
            difficulty,
        }
    }

    #[test]
    fn advantaged_attacker_beats_failing_defender() {
        let mut dice = ScriptedDice::new([7, 2, 3]);
        let outcome = resolve_opposed(
            side(RollMode::Advantage, DieCode::D8, 1, 4),
            side(RollMode::Normal, DieCode::D6, 0, 4),
            &mut dice,
        );
        assert_eq!(outcome.attack.total(), 8);
        assert!(outcome.attack.success);
        assert_eq!(outcome.defense.total(), 3);
        assert!(!outcome.defense.success);
        assert_eq!(outcome.winner, Winner::Attacker);
    }

    #[test]
    fn both_succeed_higher_total_wins_tie_to_attacker() {
        let mut dice = ScriptedDice::new([5, 6]);
        let outcome = resolve_opposed(
            side(RollMode::Normal, DieCode::D6, 0, 4),
            side(RollMode::Normal, DieCode::D6, 0, 4),
            &mut dice,
        );
        assert_eq!(outcome.winner, Winner::Defender);

        let mut dice = ScriptedDice::new([5, 5]);
        let outcome = resolve_opposed(
            side(RollMode::Normal, DieCode::D6, 0, 4),
            side(RollMode::Normal, DieCode::D6, 0, 4),
            &mut dice,
        );
        assert_eq!(outcome.winner, Winner::Attacker);
    }

    #[test]
    fn both_fail_is_inconclusive() {
        let mut dice = ScriptedDice::new([1, 2]);
        let outcome = resolve_opposed(
            side(RollMode::Normal, DieCode::D6, 0, 4),
            side(RollMode::Normal, DieCode::D6, 0, 4),
            &mut dice,
        );
        assert_eq!(outcome.winner, Winner::Inconclusive);
    }

    #[test]
    fn karma_lowers_difficulty_down_to_floor() {
        assert_eq!(apply_karma(5, 1, 2), 4);
        assert_eq!(apply_karma(5, 10, 2), 2);
        assert_eq!(apply_karma(1, 3, 2), 1);
        assert_eq!(apply_karma(4, 0, 2), 4);
    }
}
