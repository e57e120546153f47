//! Character sheets, owned items and the patches written back to the host.
//!
//! Engine operations mutate a working copy of a [`Character`] and report the
//! difference as an [`ActorPatch`].
mod character;
mod ids;
mod item;
mod patch;

pub use character::{ActorKind, Character, Progression};
pub use ids::{ActorId, ItemId};
pub use item::{
    AttackConfig, AttackType, DefenseConfig, GrantSpec, Item, ItemKind, SpellSchool,
};
pub use patch::{ActorPatch, Change, PatchValue};
