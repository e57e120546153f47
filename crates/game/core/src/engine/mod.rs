//! The rules engine.
//!
//! [`RulesEngine`] is built once from a [`RulesConfig`] and a
//! [`TraitCatalog`] and exposes every rules operation as a method. Operations
//! take the characters they read or change by reference and validate before
//! mutating: an `Err` means nothing changed. Callers that persist state diff
//! the characters afterwards with [`crate::state::ActorPatch::from_states`].

mod attack;
mod checks;
mod effects;
mod errors;
mod grants;
mod items;
mod notice;
mod pools;
mod prompt;
mod sheet;
mod traits;
mod turn;

pub use attack::AttackResolution;
pub use checks::{CheckResult, CompetenceResult};
pub use errors::ActionError;
pub use grants::EquipOutcome;
pub use items::{ItemUse, Usage, UsageKind, UseEffect};
pub use notice::{Notice, NoticeLevel};
pub use prompt::{AttackChoice, AttackRequest, AutoPrompt, CancelPrompt, Prompt};
pub use sheet::{SheetSummary, TraitInfo};
pub use traits::WithdrawalChange;

use chrono::{DateTime, Utc};

use crate::combat::RollMode;
use crate::config::RulesConfig;
use crate::negative::{NegativeTrait, TraitCatalog, default_mode};
use crate::state::Character;
use crate::stats::Characteristic;

/// Where an operation happens: on the acting character's combat turn or
/// not, and at what wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionContext {
    pub on_turn: bool,
    pub now: DateTime<Utc>,
}

impl ActionContext {
    pub fn off_turn(now: DateTime<Utc>) -> Self {
        Self { on_turn: false, now }
    }

    pub fn on_turn(now: DateTime<Utc>) -> Self {
        Self { on_turn: true, now }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RulesEngine {
    config: RulesConfig,
    catalog: TraitCatalog,
}

impl RulesEngine {
    pub fn new(config: RulesConfig, catalog: TraitCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    /// Catalog entry of the character's trait, `none` when unknown.
    pub fn trait_of(&self, character: &Character) -> &NegativeTrait {
        self.catalog.resolve(&character.negative_trait.key)
    }

    /// Whether an addicted character is currently in withdrawal.
    ///
    /// Only characters whose trait carries the addiction mechanic and who
    /// picked a substance can be in withdrawal. Never dosed counts as due.
    pub fn withdrawal_active(&self, character: &Character, now: DateTime<Utc>) -> bool {
        self.trait_of(character).mechanics.addiction
            && character.addiction.substance.is_some()
            && character
                .addiction
                .withdrawal_due(now, self.config.withdrawal_threshold())
    }

    /// Trait-derived mode of a check on `carac`.
    pub fn default_mode(
        &self,
        character: &Character,
        carac: Option<Characteristic>,
        magic: bool,
        now: DateTime<Utc>,
    ) -> RollMode {
        default_mode(
            self.trait_of(character),
            &character.negative_trait,
            self.withdrawal_active(character, now),
            carac,
            magic,
        )
    }

    /// Feeds a check total to the character's trait progress and returns the
    /// revelation notice when the trait surfaces.
    pub fn record_trait_roll(
        &self,
        character: &mut Character,
        carac: Characteristic,
        total: i32,
    ) -> Option<Notice> {
        let def = self.catalog.resolve(&character.negative_trait.key);
        let revelation = character.negative_trait.record_roll(def, carac, total)?;
        tracing::debug!(actor = %character.id, key = %revelation.key, "negative trait revealed");
        Some(Notice::info(format!(
            "{} révèle enfin son véritable défaut : « {} ».",
            character.name, revelation.label
        )))
    }
}
