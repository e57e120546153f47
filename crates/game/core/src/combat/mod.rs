//! Opposed check and combat resolution primitives.
//!
//! These functions are pure given dice results. The full attack pipeline
//! (validation, stance, karma, damage, action cost) is assembled by
//! [`crate::engine::RulesEngine::resolve_attack`].

pub mod damage;
pub mod mode;
pub mod opposed;
pub mod stance;

pub use damage::{Absorbed, DamageSpec, absorb};
pub use mode::RollMode;
pub use opposed::{
    CheckSide, OpposedOutcome, SideResult, Winner, apply_karma, decide_winner, resolve_opposed,
};
pub use stance::{DefenseStance, StanceKind, consume_stance};
