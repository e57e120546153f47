//! Character statistics: characteristics, pools, effects and the values
//! derived from them.
//!
//! Stored quantities (die codes, base pools, effect list) live on the
//! character. Derived quantities ([`DerivedBonuses`], [`CarryLoad`],
//! [`EffectivePool`]) are recomputed from scratch on demand and never stored.

pub mod bonus;
pub mod carry;
pub mod characteristic;
pub mod effective;
pub mod effects;
pub mod pools;

pub use bonus::{DerivedBonuses, signed};
pub use carry::CarryLoad;
pub use characteristic::{Attributes, CaracSet, Characteristic, DieCode};
pub use effective::{EffectivePool, apply_effective_delta, set_effective_value};
pub use effects::{Effect, EffectKind, EffectTarget, TickOutcome, tick_effect};
pub use pools::{Pool, PoolBonusKey, PoolKind, Pools};
