//! Negative traits, secret revelation and addiction.

pub mod addiction;
pub mod catalog;
pub mod progress;

pub use addiction::{AddictionState, Substance};
pub use catalog::{NegativeTrait, SecretTrigger, TraitCatalog, TraitMechanics};
pub use progress::{Revelation, TraitProgress, TraitState};

use crate::combat::RollMode;
use crate::stats::Characteristic;

/// Default mode of a check given the roller's negative trait.
///
/// Disadvantage applies when the trait is active and either withdrawal is
/// ongoing for an addiction trait, the characteristic is penalized, or the
/// check is magical and the trait penalizes magic.
pub fn default_mode(
    def: &NegativeTrait,
    progress: &TraitProgress,
    withdrawal_active: bool,
    carac: Option<Characteristic>,
    magic: bool,
) -> RollMode {
    if !progress.is_active(def) {
        return RollMode::Normal;
    }
    let mechanics = &def.mechanics;
    let penalized = (mechanics.addiction && withdrawal_active)
        || carac.is_some_and(|c| mechanics.carac_disadvantage.has(c))
        || (magic && mechanics.magic_disadvantage);
    if penalized {
        RollMode::Disadvantage
    } else {
        RollMode::Normal
    }
}
