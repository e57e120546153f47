//! Host document boundary.
//!
//! The tabletop host stores actors and items as loosely typed JSON. This
//! module reads them into core types, normalizing whatever it can, and
//! writes [`unicreon_core::ActorPatch`] changes back in host shape.

mod actor;
mod item;
pub mod value;

pub use actor::{ActorDocument, effect_from_host, effect_to_host};
pub use item::{ItemDocument, item_from_document, item_to_document, kind_from_host, kind_to_host};
