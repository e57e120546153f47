use crate::dice::{DiceFormula, Keep};
use crate::stats::DieCode;

/// Advantage state of a check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advantage => "avantage",
            Self::Disadvantage => "désavantage",
        }
    }

    /// `1dY`, `2dYkh1` or `2dYkl1`, plus the flat bonus.
    pub fn formula(self, die: DieCode, bonus: i32) -> DiceFormula {
        let faces = die.faces();
        let (count, keep) = match self {
            Self::Normal => (1, None),
            Self::Advantage => (2, Some(Keep::Highest(1))),
            Self::Disadvantage => (2, Some(Keep::Lowest(1))),
        };
        DiceFormula {
            count,
            faces,
            keep,
            bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_mode_formulas() {
        assert_eq!(RollMode::Normal.formula(DieCode::D6, 0).to_string(), "1d6");
        assert_eq!(RollMode::Advantage.formula(DieCode::D8, 1).to_string(), "2d8kh1+1");
        assert_eq!(RollMode::Disadvantage.formula(DieCode::D10, -2).to_string(), "2d10kl1-2");
    }
}
