//! Tag language for item effects.
//!
//! Content authors write numeric effects in free text fields, e.g.
//! `[+1 agilite]` on a ring or `[3 PV]` on a potion. [`parse_passive_tag`]
//! reads equipment modifiers, [`parse_active_tag`] reads use effects.

pub mod lexer;
pub mod parser;

pub use parser::{ActiveDirective, PassiveDirective, parse_active_tag, parse_passive_tag};
