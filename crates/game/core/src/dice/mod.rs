//! Dice formulas, rolls and injectable random sources.

pub mod formula;
pub mod rng;
pub mod roll;

pub use formula::{DiceFormula, FormulaError, Keep};
pub use rng::{DiceRoller, PcgDice, ScriptedDice};
pub use roll::{DiceBuffer, Roll};
