//! Session worker that owns the authoritative [`Session`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them one at a time
//! and replies through oneshot channels. Events are published by the session
//! itself.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use unicreon_core::{
    ActorId, AttackResolution, Character, Characteristic, CheckResult, CombatTracker, Effect,
    EquipOutcome, GridPosition, ItemId, MoveVerdict, Notice, PoolKind, Roll, SheetSummary,
    Substance, TickOutcome, TurnAdvance, Usage, WithdrawalChange,
};

use crate::api::{PromptAnswers, Result};
use crate::session::{ItemRef, Session};

/// Commands that can be sent to the session worker
pub enum Command {
    StartCombat {
        order: Vec<ActorId>,
        reply: oneshot::Sender<Result<TurnAdvance>>,
    },
    EndTurn {
        reply: oneshot::Sender<Result<TurnAdvance>>,
    },
    EndCombat {
        reply: oneshot::Sender<()>,
    },
    RollInitiative {
        actors: Vec<ActorId>,
        reply: oneshot::Sender<Result<Vec<(ActorId, Roll)>>>,
    },
    Attack {
        attacker: ActorId,
        item: ItemRef,
        defender: Option<ActorId>,
        answers: PromptAnswers,
        reply: oneshot::Sender<Result<AttackResolution>>,
    },
    UseItem {
        owner: ActorId,
        item: ItemRef,
        target: Option<ActorId>,
        answers: PromptAnswers,
        reply: oneshot::Sender<Result<Usage>>,
    },
    Equip {
        actor: ActorId,
        item: ItemRef,
        equipped: bool,
        reply: oneshot::Sender<Result<EquipOutcome>>,
    },
    DeleteItem {
        actor: ActorId,
        item: ItemRef,
        reply: oneshot::Sender<Result<Vec<ItemId>>>,
    },
    QuickTest {
        actor: ActorId,
        carac: Characteristic,
        reply: oneshot::Sender<Result<CheckResult>>,
    },
    Move {
        actor: ActorId,
        from: GridPosition,
        to: GridPosition,
        reply: oneshot::Sender<Result<MoveVerdict>>,
    },
    SetPoolValue {
        actor: ActorId,
        pool: PoolKind,
        value: i64,
        reply: oneshot::Sender<Result<u32>>,
    },
    SetPoolMax {
        actor: ActorId,
        pool: PoolKind,
        max: i64,
        reply: oneshot::Sender<Result<u32>>,
    },
    AddEffect {
        actor: ActorId,
        effect: Effect,
        reply: oneshot::Sender<Result<usize>>,
    },
    DeleteEffect {
        actor: ActorId,
        index: usize,
        reply: oneshot::Sender<Result<Effect>>,
    },
    TickEffect {
        actor: ActorId,
        index: usize,
        reply: oneshot::Sender<Result<TickOutcome>>,
    },
    AssignTrait {
        actor: ActorId,
        key: String,
        reply: oneshot::Sender<Result<()>>,
    },
    AssignRandomTrait {
        actor: ActorId,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
    SetAddiction {
        actor: ActorId,
        substance: Option<Substance>,
        reply: oneshot::Sender<Result<()>>,
    },
    ConsumeDose {
        actor: ActorId,
        substance: Option<Substance>,
        reply: oneshot::Sender<Result<Notice>>,
    },
    /// Recomputes withdrawal flags. Sent by the sweep worker.
    SweepWithdrawal {
        reply: oneshot::Sender<Vec<WithdrawalChange>>,
    },
    AdvanceTime {
        by: TimeDelta,
        reply: oneshot::Sender<DateTime<Utc>>,
    },
    QueryActor {
        actor: ActorId,
        reply: oneshot::Sender<Result<Character>>,
    },
    QueryRoster {
        reply: oneshot::Sender<Vec<Character>>,
    },
    QuerySheet {
        actor: ActorId,
        reply: oneshot::Sender<Result<SheetSummary>>,
    },
    QueryCombat {
        reply: oneshot::Sender<CombatTracker>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::StartCombat { .. } => "StartCombat",
            Command::EndTurn { .. } => "EndTurn",
            Command::EndCombat { .. } => "EndCombat",
            Command::RollInitiative { .. } => "RollInitiative",
            Command::Attack { .. } => "Attack",
            Command::UseItem { .. } => "UseItem",
            Command::Equip { .. } => "Equip",
            Command::DeleteItem { .. } => "DeleteItem",
            Command::QuickTest { .. } => "QuickTest",
            Command::Move { .. } => "Move",
            Command::SetPoolValue { .. } => "SetPoolValue",
            Command::SetPoolMax { .. } => "SetPoolMax",
            Command::AddEffect { .. } => "AddEffect",
            Command::DeleteEffect { .. } => "DeleteEffect",
            Command::TickEffect { .. } => "TickEffect",
            Command::AssignTrait { .. } => "AssignTrait",
            Command::AssignRandomTrait { .. } => "AssignRandomTrait",
            Command::SetAddiction { .. } => "SetAddiction",
            Command::ConsumeDose { .. } => "ConsumeDose",
            Command::SweepWithdrawal { .. } => "SweepWithdrawal",
            Command::AdvanceTime { .. } => "AdvanceTime",
            Command::QueryActor { .. } => "QueryActor",
            Command::QueryRoster { .. } => "QueryRoster",
            Command::QuerySheet { .. } => "QuerySheet",
            Command::QueryCombat { .. } => "QueryCombat",
        }
    }
}

/// Background task that processes session commands.
pub struct SessionWorker {
    session: Session,
    command_rx: mpsc::Receiver<Command>,
}

impl SessionWorker {
    pub fn new(session: Session, command_rx: mpsc::Receiver<Command>) -> Self {
        Self {
            session,
            command_rx,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("SessionWorker started");
        while let Some(cmd) = self.command_rx.recv().await {
            let name = cmd.name();
            if !self.handle_command(cmd) {
                debug!("{name} reply channel closed (caller dropped)");
            }
        }
        tracing::info!("SessionWorker stopped");
    }

    /// Returns false when the caller stopped waiting for the reply.
    fn handle_command(&mut self, cmd: Command) -> bool {
        let session = &mut self.session;
        match cmd {
            Command::StartCombat { order, reply } => reply.send(session.start_combat(&order)).is_ok(),
            Command::EndTurn { reply } => reply.send(session.end_turn()).is_ok(),
            Command::EndCombat { reply } => {
                session.end_combat();
                reply.send(()).is_ok()
            }
            Command::RollInitiative { actors, reply } => {
                reply.send(session.roll_initiative(&actors)).is_ok()
            }
            Command::Attack {
                attacker,
                item,
                defender,
                answers,
                reply,
            } => reply
                .send(session.attack(attacker, &item, defender, answers))
                .is_ok(),
            Command::UseItem {
                owner,
                item,
                target,
                answers,
                reply,
            } => reply
                .send(session.use_item(owner, &item, target, answers))
                .is_ok(),
            Command::Equip {
                actor,
                item,
                equipped,
                reply,
            } => reply.send(session.equip(actor, &item, equipped)).is_ok(),
            Command::DeleteItem { actor, item, reply } => {
                reply.send(session.delete_item(actor, &item)).is_ok()
            }
            Command::QuickTest { actor, carac, reply } => {
                reply.send(session.quick_test(actor, carac)).is_ok()
            }
            Command::Move {
                actor,
                from,
                to,
                reply,
            } => reply.send(session.move_actor(actor, from, to)).is_ok(),
            Command::SetPoolValue {
                actor,
                pool,
                value,
                reply,
            } => reply.send(session.set_pool_value(actor, pool, value)).is_ok(),
            Command::SetPoolMax {
                actor,
                pool,
                max,
                reply,
            } => reply.send(session.set_pool_max(actor, pool, max)).is_ok(),
            Command::AddEffect {
                actor,
                effect,
                reply,
            } => reply.send(session.add_effect(actor, effect)).is_ok(),
            Command::DeleteEffect {
                actor,
                index,
                reply,
            } => reply.send(session.delete_effect(actor, index)).is_ok(),
            Command::TickEffect {
                actor,
                index,
                reply,
            } => reply.send(session.tick_effect(actor, index)).is_ok(),
            Command::AssignTrait { actor, key, reply } => {
                reply.send(session.assign_trait(actor, &key)).is_ok()
            }
            Command::AssignRandomTrait { actor, reply } => {
                reply.send(session.assign_random_trait(actor)).is_ok()
            }
            Command::SetAddiction {
                actor,
                substance,
                reply,
            } => reply.send(session.set_addiction(actor, substance)).is_ok(),
            Command::ConsumeDose {
                actor,
                substance,
                reply,
            } => reply.send(session.consume_dose(actor, substance)).is_ok(),
            Command::SweepWithdrawal { reply } => reply.send(session.sweep_withdrawal()).is_ok(),
            Command::AdvanceTime { by, reply } => reply.send(session.advance_time(by)).is_ok(),
            Command::QueryActor { actor, reply } => {
                reply.send(session.actor(actor).cloned()).is_ok()
            }
            Command::QueryRoster { reply } => {
                reply.send(session.roster().cloned().collect()).is_ok()
            }
            Command::QuerySheet { actor, reply } => reply.send(session.sheet(actor)).is_ok(),
            Command::QueryCombat { reply } => reply.send(session.tracker().clone()).is_ok(),
        }
    }
}
