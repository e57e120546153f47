//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! every session operation, plus topic subscriptions on the event bus.
use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{broadcast, mpsc, oneshot};

use unicreon_core::{
    ActorId, AttackResolution, Character, Characteristic, CheckResult, CombatTracker, Effect,
    EquipOutcome, GridPosition, ItemId, MoveVerdict, Notice, PoolKind, Roll, SheetSummary,
    Substance, TickOutcome, TurnAdvance, Usage, WithdrawalChange,
};

use super::errors::{Result, RuntimeError};
use super::prompt::PromptAnswers;
use crate::events::{Event, EventBus, Topic};
use crate::session::ItemRef;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the worker's answer.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Starts a combat; the first actor in `order` acts first.
    pub async fn start_combat(&self, order: Vec<ActorId>) -> Result<TurnAdvance> {
        self.request(|reply| Command::StartCombat { order, reply })
            .await?
    }

    pub async fn end_turn(&self) -> Result<TurnAdvance> {
        self.request(|reply| Command::EndTurn { reply }).await?
    }

    pub async fn end_combat(&self) -> Result<()> {
        self.request(|reply| Command::EndCombat { reply }).await
    }

    /// Initiative rolls, best first.
    pub async fn roll_initiative(&self, actors: Vec<ActorId>) -> Result<Vec<(ActorId, Roll)>> {
        self.request(|reply| Command::RollInitiative { actors, reply })
            .await?
    }

    pub async fn attack(
        &self,
        attacker: ActorId,
        item: impl Into<ItemRef>,
        defender: Option<ActorId>,
        answers: PromptAnswers,
    ) -> Result<AttackResolution> {
        let item = item.into();
        self.request(|reply| Command::Attack {
            attacker,
            item,
            defender,
            answers,
            reply,
        })
        .await?
    }

    /// Uses an item the way a click on it would.
    pub async fn use_item(
        &self,
        owner: ActorId,
        item: impl Into<ItemRef>,
        target: Option<ActorId>,
        answers: PromptAnswers,
    ) -> Result<Usage> {
        let item = item.into();
        self.request(|reply| Command::UseItem {
            owner,
            item,
            target,
            answers,
            reply,
        })
        .await?
    }

    pub async fn equip(
        &self,
        actor: ActorId,
        item: impl Into<ItemRef>,
        equipped: bool,
    ) -> Result<EquipOutcome> {
        let item = item.into();
        self.request(|reply| Command::Equip {
            actor,
            item,
            equipped,
            reply,
        })
        .await?
    }

    pub async fn delete_item(&self, actor: ActorId, item: impl Into<ItemRef>) -> Result<Vec<ItemId>> {
        let item = item.into();
        self.request(|reply| Command::DeleteItem { actor, item, reply })
            .await?
    }

    pub async fn quick_test(&self, actor: ActorId, carac: Characteristic) -> Result<CheckResult> {
        self.request(|reply| Command::QuickTest { actor, carac, reply })
            .await?
    }

    pub async fn move_actor(
        &self,
        actor: ActorId,
        from: GridPosition,
        to: GridPosition,
    ) -> Result<MoveVerdict> {
        self.request(|reply| Command::Move {
            actor,
            from,
            to,
            reply,
        })
        .await?
    }

    pub async fn set_pool_value(&self, actor: ActorId, pool: PoolKind, value: i64) -> Result<u32> {
        self.request(|reply| Command::SetPoolValue {
            actor,
            pool,
            value,
            reply,
        })
        .await?
    }

    pub async fn set_pool_max(&self, actor: ActorId, pool: PoolKind, max: i64) -> Result<u32> {
        self.request(|reply| Command::SetPoolMax {
            actor,
            pool,
            max,
            reply,
        })
        .await?
    }

    pub async fn add_effect(&self, actor: ActorId, effect: Effect) -> Result<usize> {
        self.request(|reply| Command::AddEffect {
            actor,
            effect,
            reply,
        })
        .await?
    }

    pub async fn delete_effect(&self, actor: ActorId, index: usize) -> Result<Effect> {
        self.request(|reply| Command::DeleteEffect {
            actor,
            index,
            reply,
        })
        .await?
    }

    pub async fn tick_effect(&self, actor: ActorId, index: usize) -> Result<TickOutcome> {
        self.request(|reply| Command::TickEffect {
            actor,
            index,
            reply,
        })
        .await?
    }

    pub async fn assign_trait(&self, actor: ActorId, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.request(|reply| Command::AssignTrait { actor, key, reply })
            .await?
    }

    /// Returns the key of the trait drawn.
    pub async fn assign_random_trait(&self, actor: ActorId) -> Result<Option<String>> {
        self.request(|reply| Command::AssignRandomTrait { actor, reply })
            .await?
    }

    pub async fn set_addiction(&self, actor: ActorId, substance: Option<Substance>) -> Result<()> {
        self.request(|reply| Command::SetAddiction {
            actor,
            substance,
            reply,
        })
        .await?
    }

    pub async fn consume_dose(&self, actor: ActorId, substance: Option<Substance>) -> Result<Notice> {
        self.request(|reply| Command::ConsumeDose {
            actor,
            substance,
            reply,
        })
        .await?
    }

    pub async fn sweep_withdrawal(&self) -> Result<Vec<WithdrawalChange>> {
        self.request(|reply| Command::SweepWithdrawal { reply }).await
    }

    /// Skips game time ahead and returns the new session time.
    pub async fn advance_time(&self, by: TimeDelta) -> Result<DateTime<Utc>> {
        self.request(|reply| Command::AdvanceTime { by, reply }).await
    }

    pub async fn query_actor(&self, actor: ActorId) -> Result<Character> {
        self.request(|reply| Command::QueryActor { actor, reply })
            .await?
    }

    pub async fn query_roster(&self) -> Result<Vec<Character>> {
        self.request(|reply| Command::QueryRoster { reply }).await
    }

    pub async fn query_sheet(&self, actor: ActorId) -> Result<SheetSummary> {
        self.request(|reply| Command::QuerySheet { actor, reply })
            .await?
    }

    pub async fn query_combat(&self) -> Result<CombatTracker> {
        self.request(|reply| Command::QueryCombat { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Notice` - Player-facing messages
    /// - `Topic::Resolution` - Attack, check and item results
    /// - `Topic::Turn` - Combat tracker changes
    /// - `Topic::Sync` - Actor patches to persist
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use unicreon_runtime::Topic;
    ///
    /// let mut notices = handle.subscribe(Topic::Notice);
    /// while let Ok(event) = notices.recv().await {
    ///     // Render the notice
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
