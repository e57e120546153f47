//! Event types for different topics.

use serde::{Deserialize, Serialize};

use unicreon_core::{
    ActionError, ActorId, ActorPatch, AttackResolution, CheckResult, CompetenceResult,
    EquipOutcome, GridPosition, ItemUse, MoveVerdict, Notice, TurnAdvance,
};

/// A message for the table, optionally about one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeEvent {
    pub actor: Option<ActorId>,
    pub notice: Notice,
}

/// Full results of rules operations, for chat cards and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionEvent {
    Attack(Box<AttackResolution>),
    ItemUsed(ItemUse),
    Competence {
        actor: ActorId,
        result: CompetenceResult,
    },
    Check {
        actor: ActorId,
        result: CheckResult,
    },
    Equip {
        actor: ActorId,
        outcome: EquipOutcome,
    },
    Move {
        actor: ActorId,
        from: GridPosition,
        to: GridPosition,
        verdict: MoveVerdict,
    },
    /// The engine refused a request. Nothing changed.
    Rejected { actor: ActorId, error: ActionError },
}

/// Combat tracker changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    Started(TurnAdvance),
    Advanced(TurnAdvance),
    Ended,
}
