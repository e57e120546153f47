//! Rules engine of the Unicreon tabletop system.
//!
//! `unicreon-core` holds the canonical rules (dice, tags, derived stats,
//! opposed checks, the per-turn ledger and negative traits) as pure APIs with
//! no I/O. Every rules operation is a method of [`engine::RulesEngine`];
//! the content and runtime crates depend on the types re-exported here.
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod ledger;
pub mod negative;
pub mod state;
pub mod stats;
pub mod tags;
pub mod text;

pub use combat::{DamageSpec, DefenseStance, RollMode, StanceKind, Winner};
pub use config::RulesConfig;
pub use dice::{DiceFormula, DiceRoller, FormulaError, PcgDice, Roll, ScriptedDice};
pub use engine::{
    ActionContext, ActionError, AttackChoice, AttackRequest, AttackResolution, AutoPrompt,
    CancelPrompt, CheckResult, CompetenceResult, EquipOutcome, ItemUse, Notice, NoticeLevel,
    Prompt, RulesEngine, SheetSummary, TraitInfo, Usage, UsageKind, UseEffect, WithdrawalChange,
};
pub use env::{CompendiumEntry, CompendiumSnapshot, ItemSource};
pub use error::{ErrorSeverity, RulesError};
pub use ledger::{
    ActionSpend, CombatTracker, GridPosition, MoveVerdict, TurnAdvance, movement_cost,
};
pub use negative::{
    AddictionState, NegativeTrait, Substance, TraitCatalog, TraitProgress, TraitState,
};
pub use state::{
    ActorId, ActorKind, ActorPatch, AttackConfig, AttackType, Change, Character, DefenseConfig,
    GrantSpec, Item, ItemId, ItemKind, PatchValue, Progression, SpellSchool,
};
pub use stats::{
    Attributes, CarryLoad, Characteristic, DerivedBonuses, DieCode, Effect, EffectKind,
    EffectTarget, EffectivePool, Pool, PoolKind, Pools, TickOutcome,
};
pub use tags::{ActiveDirective, PassiveDirective, parse_active_tag, parse_passive_tag};
