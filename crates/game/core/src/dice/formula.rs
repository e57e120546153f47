//! Dice formulas of the shape `NdM[khK|klK][±B]`.

use core::fmt;
use core::str::FromStr;

use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};

/// Keep rule applied to the rolled dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Keep {
    Highest(u32),
    Lowest(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceFormula {
    pub count: u32,
    pub faces: u32,
    pub keep: Option<Keep>,
    pub bonus: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("dice formula {0:?} is not of the form NdM[khK|klK][+B]")]
    Syntax(String),

    #[error("dice formula needs at least one die with two faces")]
    Degenerate,

    #[error("cannot keep {keep} of {count} dice")]
    KeepTooMany { keep: u32, count: u32 },

    #[error("at most {max} dice per roll, got {count}")]
    TooManyDice { count: u32, max: usize },
}

impl RulesError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "FORMULA_SYNTAX",
            Self::Degenerate => "FORMULA_DEGENERATE",
            Self::KeepTooMany { .. } => "FORMULA_KEEP_TOO_MANY",
            Self::TooManyDice { .. } => "FORMULA_TOO_MANY_DICE",
        }
    }
}

impl DiceFormula {
    pub fn new(count: u32, faces: u32, keep: Option<Keep>, bonus: i32) -> Result<Self, FormulaError> {
        if count == 0 || faces < 2 {
            return Err(FormulaError::Degenerate);
        }
        if count as usize > RulesConfig::MAX_DICE_PER_ROLL {
            return Err(FormulaError::TooManyDice {
                count,
                max: RulesConfig::MAX_DICE_PER_ROLL,
            });
        }
        if let Some(Keep::Highest(keep) | Keep::Lowest(keep)) = keep
            && (keep == 0 || keep > count)
        {
            return Err(FormulaError::KeepTooMany { keep, count });
        }
        Ok(Self {
            count,
            faces,
            keep,
            bonus,
        })
    }

    /// A single die plus a flat bonus.
    pub fn single(faces: u32, bonus: i32) -> Self {
        Self {
            count: 1,
            faces: faces.max(2),
            keep: None,
            bonus,
        }
    }

    /// Lowest and highest possible totals.
    pub fn range(&self) -> (i32, i32) {
        let kept = i64::from(match self.keep {
            Some(Keep::Highest(k) | Keep::Lowest(k)) => k,
            None => self.count,
        });
        let bonus = i64::from(self.bonus);
        let clamp = |v: i64| i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX });
        (clamp(kept + bonus), clamp(kept * i64::from(self.faces) + bonus))
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        match self.keep {
            Some(Keep::Highest(k)) => write!(f, "kh{k}")?,
            Some(Keep::Lowest(k)) => write!(f, "kl{k}")?,
            None => {}
        }
        match self.bonus {
            0 => Ok(()),
            bonus => write!(f, "{bonus:+}"),
        }
    }
}

impl FromStr for DiceFormula {
    type Err = FormulaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let syntax = || FormulaError::Syntax(raw.to_string());
        let text: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let (count, rest) = text.split_once('d').ok_or_else(syntax)?;
        let count = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| syntax())?
        };

        let (faces, rest) = split_digits(rest);
        let faces: u32 = faces.parse().map_err(|_| syntax())?;

        let (keep, rest) = if let Some(after) = rest.strip_prefix("kh") {
            let (k, rest) = split_digits(after);
            (Some(Keep::Highest(k.parse().map_err(|_| syntax())?)), rest)
        } else if let Some(after) = rest.strip_prefix("kl") {
            let (k, rest) = split_digits(after);
            (Some(Keep::Lowest(k.parse().map_err(|_| syntax())?)), rest)
        } else {
            (None, rest)
        };

        let bonus = match rest {
            "" => 0,
            signed if signed.starts_with(['+', '-']) && signed.len() > 1 => {
                signed.parse::<i32>().map_err(|_| syntax())?
            }
            _ => return Err(syntax()),
        };

        Self::new(count, faces, keep, bonus)
    }
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}
