//! Evaluation of a [`DiceFormula`] against a [`DiceRoller`].

use arrayvec::ArrayVec;

use crate::config::RulesConfig;

use super::formula::{DiceFormula, Keep};
use super::rng::DiceRoller;

pub type DiceBuffer = ArrayVec<u32, { RulesConfig::MAX_DICE_PER_ROLL }>;

/// Individual die results and total of one evaluated formula.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roll {
    pub formula: DiceFormula,
    /// Every die rolled, in roll order.
    pub dice: DiceBuffer,
    /// Dice retained by the keep rule.
    pub kept: DiceBuffer,
    pub total: i32,
}

impl Roll {
    /// Sum of the kept dice without the flat bonus.
    pub fn natural(&self) -> i32 {
        sum_dice(&self.kept)
    }
}

fn sum_dice(dice: &DiceBuffer) -> i32 {
    let sum: i64 = dice.iter().map(|&d| i64::from(d)).sum();
    i32::try_from(sum).unwrap_or(i32::MAX)
}

impl DiceFormula {
    pub fn roll(&self, roller: &mut dyn DiceRoller) -> Roll {
        let mut dice = DiceBuffer::new();
        // `DiceFormula::new` bounds `count` by the buffer capacity.
        for _ in 0..(self.count as usize).min(RulesConfig::MAX_DICE_PER_ROLL) {
            dice.push(roller.roll_die(self.faces));
        }

        let mut sorted = dice.clone();
        sorted.sort_unstable();
        let kept: DiceBuffer = match self.keep {
            Some(Keep::Highest(k)) => sorted.iter().rev().take(k as usize).copied().collect(),
            Some(Keep::Lowest(k)) => sorted.iter().take(k as usize).copied().collect(),
            None => dice.clone(),
        };

        // Bonuses come from sheet data and are only bounded by `i32`.
        let total = sum_dice(&kept).saturating_add(self.bonus);
        Roll {
            formula: *self,
            dice,
            kept,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn advantage_keeps_highest() {
        let formula: DiceFormula = "2d8kh1+1".parse().unwrap();
        let roll = formula.roll(&mut ScriptedDice::new([7, 2]));
        assert_eq!(roll.dice.as_slice(), &[7, 2]);
        assert_eq!(roll.kept.as_slice(), &[7]);
        assert_eq!(roll.total, 8);
    }

    #[test]
    fn disadvantage_keeps_lowest() {
        let formula: DiceFormula = "2d6kl1".parse().unwrap();
        let roll = formula.roll(&mut ScriptedDice::new([5, 3]));
        assert_eq!(roll.total, 3);
        assert_eq!(roll.natural(), 3);
    }

    #[test]
    fn plain_roll_sums_all_dice() {
        let formula: DiceFormula = "3d6-2".parse().unwrap();
        let roll = formula.roll(&mut ScriptedDice::new([1, 2, 3]));
        assert_eq!(roll.total, 4);
    }

    #[test]
    fn extreme_bonus_saturates() {
        let roll = DiceFormula::single(6, i32::MAX).roll(&mut ScriptedDice::new([6]));
        assert_eq!(roll.total, i32::MAX);
        let roll = DiceFormula::single(6, i32::MIN).roll(&mut ScriptedDice::new([1]));
        assert_eq!(roll.total, i32::MIN + 1);
    }
}
