//! Passive and active tag grammars.
//!
//! ```text
//! passive := "[" label signed "]" | "[" signed label "]"
//! active  := "[" signed "pv" "/" text "]"     heal over time
//!          | "[" signed "pv" "]"              instant heal or damage
//!          | "[" carac number "]"             stat check
//!          | anything else                    note
//! ```
//!
//! Alternatives are tried top to bottom, so heal-over-time wins over the
//! plain heal it extends.

use crate::stats::{Characteristic, PoolBonusKey};

use super::lexer::{Token, TokenKind, bracket_body, tokenize};

/// Modifier applied while an item is worn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveDirective {
    Carac { carac: Characteristic, value: i32 },
    Pool { key: PoolBonusKey, value: i32 },
}

/// Effect triggered when an item is used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveDirective {
    /// Positive heals, negative damages.
    Heal { pv: i32 },
    /// Narrative only. Nothing is applied over time.
    HealOverTime { pv: i32, period: String },
    StatCheck { carac: Characteristic, difficulty: u32 },
    Note(String),
}

/// Parses an equipment tag such as `[agilite +1]` or `[+2 pv.max]`.
///
/// Returns `None` for unknown labels, malformed text and zero values.
pub fn parse_passive_tag(tag: &str) -> Option<PassiveDirective> {
    let tokens = tokenize(bracket_body(tag)?);
    let (value, label) = match tokens.split_first()? {
        (first, rest) if number(first).is_some() => (number(first)?, words(rest)?),
        _ => {
            let (last, rest) = tokens.split_last()?;
            (number(last)?, words(rest)?)
        }
    };
    if value == 0 {
        return None;
    }

    if let Some(carac) = Characteristic::from_label(&label) {
        return Some(PassiveDirective::Carac { carac, value });
    }
    PoolBonusKey::from_folded(&label).map(|key| PassiveDirective::Pool { key, value })
}

/// Parses a use-triggered tag. Only blank text yields `None`; anything that
/// is not a recognized directive is kept verbatim as a note.
pub fn parse_active_tag(tag: &str) -> Option<ActiveDirective> {
    let text = tag.trim();
    if text.is_empty() {
        return None;
    }
    let note = || Some(ActiveDirective::Note(text.to_string()));
    let Some(body) = bracket_body(text) else {
        return note();
    };
    let tokens = tokenize(body);

    match tokens.as_slice() {
        [amount, unit, slash, ..] if is_pv(unit) && slash.kind == TokenKind::Slash => {
            let period = body[slash.end..].trim();
            match number(amount) {
                Some(pv) if !period.is_empty() => Some(ActiveDirective::HealOverTime {
                    pv,
                    period: period.to_string(),
                }),
                _ => note(),
            }
        }
        [amount, unit] if is_pv(unit) => match number(amount) {
            Some(pv) => Some(ActiveDirective::Heal { pv }),
            None => note(),
        },
        [
            Token {
                kind: TokenKind::Word(label),
                ..
            },
            Token {
                kind: TokenKind::Number { value, signed: false },
                ..
            },
        ] => match Characteristic::from_label(label) {
            Some(carac) => Some(ActiveDirective::StatCheck {
                carac,
                difficulty: (*value).max(0) as u32,
            }),
            None => note(),
        },
        _ => note(),
    }
}

fn number(token: &Token) -> Option<i32> {
    match token.kind {
        TokenKind::Number { value, .. } => Some(value),
        _ => None,
    }
}

fn is_pv(token: &Token) -> bool {
    matches!(&token.kind, TokenKind::Word(word) if word == "pv")
}

/// Joins a run of word tokens with single spaces. Fails on anything else.
fn words(tokens: &[Token]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let parts = tokens
        .iter()
        .map(|token| match &token.kind {
            TokenKind::Word(word) => Some(word.as_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(" "))
}
