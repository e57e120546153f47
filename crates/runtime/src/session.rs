//! Authoritative state of one table session.
//!
//! [`Session`] owns the characters, the combat tracker, the dice and the
//! clock. Every operation runs the engine against the stored characters,
//! then publishes the resolution, the notices and one [`ActorPatch`] per
//! changed character. Only the session worker holds a `Session`, so
//! operations never interleave.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use unicreon_core::{
    ActionContext, ActionError, ActorId, ActorPatch, AttackResolution, Character, Characteristic,
    CheckResult, CombatTracker, CompendiumSnapshot, DiceRoller, Effect, EquipOutcome,
    GridPosition, ItemId, MoveVerdict, Notice, PoolKind, Roll, RulesEngine, SheetSummary,
    Substance, TickOutcome, TurnAdvance, Usage, WithdrawalChange,
};

use crate::api::{PromptAnswers, Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{Event, EventBus, NoticeEvent, ResolutionEvent, TurnEvent};

/// An item designated by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    Id(ItemId),
    Name(String),
}

impl From<ItemId> for ItemRef {
    fn from(id: ItemId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ItemRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ItemRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Engine access handed to one operation.
struct Tools<'a> {
    engine: &'a RulesEngine,
    compendium: &'a CompendiumSnapshot,
    dice: &'a mut dyn DiceRoller,
    ctx: ActionContext,
}

pub struct Session {
    engine: RulesEngine,
    compendium: CompendiumSnapshot,
    actors: BTreeMap<ActorId, Character>,
    tracker: CombatTracker,
    dice: Box<dyn DiceRoller + Send>,
    clock: Box<dyn Clock>,
    /// Game time skipped ahead of the clock.
    skew: TimeDelta,
    events: EventBus,
}

impl Session {
    pub fn new(
        engine: RulesEngine,
        compendium: CompendiumSnapshot,
        roster: impl IntoIterator<Item = Character>,
        dice: Box<dyn DiceRoller + Send>,
        clock: Box<dyn Clock>,
        events: EventBus,
    ) -> Self {
        let actors: BTreeMap<ActorId, Character> =
            roster.into_iter().map(|ch| (ch.id, ch)).collect();
        tracing::info!(actors = actors.len(), packs = compendium.pack_names().count(), "session created");
        Self {
            engine,
            compendium,
            actors,
            tracker: CombatTracker::new(),
            dice,
            clock,
            skew: TimeDelta::zero(),
            events,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now() + self.skew
    }

    /// Moves game time forward without waiting.
    pub fn advance_time(&mut self, by: TimeDelta) -> DateTime<Utc> {
        if by > TimeDelta::zero() {
            self.skew += by;
        }
        tracing::debug!(skew_minutes = self.skew.num_minutes(), "session time advanced");
        self.now()
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    pub fn actor(&self, id: ActorId) -> Result<&Character> {
        self.actors.get(&id).ok_or(RuntimeError::UnknownActor(id))
    }

    pub fn roster(&self) -> impl Iterator<Item = &Character> {
        self.actors.values()
    }

    pub fn tracker(&self) -> &CombatTracker {
        &self.tracker
    }

    pub fn sheet(&self, id: ActorId) -> Result<SheetSummary> {
        Ok(self.engine.sheet(self.actor(id)?, self.now()))
    }

    // --- combat tracker ---------------------------------------------------

    /// Starts a combat in the given order and opens the first turn.
    pub fn start_combat(&mut self, order: &[ActorId]) -> Result<TurnAdvance> {
        if let Some(unknown) = order.iter().find(|id| !self.actors.contains_key(id)) {
            return Err(RuntimeError::UnknownActor(*unknown));
        }
        let advance = self
            .tracker
            .start(order.iter().copied())
            .ok_or(RuntimeError::NoCombatants)?;
        tracing::info!(combatants = order.len(), first = %advance.current, "combat started");
        self.open_turn(advance.current);
        self.events.publish(Event::Turn(TurnEvent::Started(advance)));
        Ok(advance)
    }

    /// Hands the turn to the next combatant.
    pub fn end_turn(&mut self) -> Result<TurnAdvance> {
        let advance = self.tracker.advance().ok_or(RuntimeError::NoCombat)?;
        tracing::debug!(round = advance.round, current = %advance.current, "turn advanced");
        self.open_turn(advance.current);
        self.events.publish(Event::Turn(TurnEvent::Advanced(advance)));
        Ok(advance)
    }

    pub fn end_combat(&mut self) {
        if !self.tracker.is_active() {
            return;
        }
        self.tracker.end();
        tracing::info!("combat ended");
        self.events.publish(Event::Turn(TurnEvent::Ended));
    }

    /// Initiative rolls of the given actors, best first.
    pub fn roll_initiative(&mut self, actors: &[ActorId]) -> Result<Vec<(ActorId, Roll)>> {
        let mut rolls = Vec::with_capacity(actors.len());
        for id in actors {
            let character = self.actors.get(id).ok_or(RuntimeError::UnknownActor(*id))?;
            rolls.push((*id, self.engine.initiative(character, &mut *self.dice)));
        }
        rolls.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        Ok(rolls)
    }

    fn open_turn(&mut self, current: ActorId) {
        let Some(character) = self.actors.get_mut(&current) else {
            return;
        };
        let before = character.clone();
        self.engine.start_turn(character);
        self.sync(&before);
    }

    // --- actions ----------------------------------------------------------

    pub fn attack(
        &mut self,
        attacker: ActorId,
        item: &ItemRef,
        defender: Option<ActorId>,
        mut answers: PromptAnswers,
    ) -> Result<AttackResolution> {
        let item = self.resolve_item(attacker, item)?;
        if defender == Some(attacker) {
            return Err(self.reject(attacker, ActionError::SelfTarget));
        }
        let resolution = self.act(attacker, defender, |tools, attacker, defender| {
            tools
                .engine
                .resolve_attack(attacker, item, defender, tools.ctx, &mut answers, tools.dice)
        })?;
        self.notify(Some(attacker), &resolution.notices);
        self.events.publish(Event::Resolution(ResolutionEvent::Attack(Box::new(
            resolution.clone(),
        ))));
        Ok(resolution)
    }

    /// Clicks an item: stance, attack, spell, competence or plain use.
    pub fn use_item(
        &mut self,
        owner: ActorId,
        item: &ItemRef,
        target: Option<ActorId>,
        mut answers: PromptAnswers,
    ) -> Result<Usage> {
        let item = self.resolve_item(owner, item)?;
        let target = target.filter(|id| *id != owner);
        let usage = self.act(owner, target, |tools, owner, target| {
            tools
                .engine
                .route_usage(owner, item, target, tools.ctx, &mut answers, tools.dice)
        })?;
        match &usage {
            Usage::Stance(notice) => self.notify(Some(owner), std::slice::from_ref(notice)),
            Usage::Attack(resolution) => {
                self.notify(Some(owner), &resolution.notices);
                self.events
                    .publish(Event::Resolution(ResolutionEvent::Attack(resolution.clone())));
            }
            Usage::Competence(result) => {
                self.notify(Some(owner), &result.notices);
                self.events.publish(Event::Resolution(ResolutionEvent::Competence {
                    actor: owner,
                    result: result.clone(),
                }));
            }
            Usage::Item(used) => {
                self.notify(Some(owner), &used.notices);
                self.events
                    .publish(Event::Resolution(ResolutionEvent::ItemUsed(used.clone())));
            }
            Usage::Inspect => {}
        }
        Ok(usage)
    }

    pub fn equip(&mut self, actor: ActorId, item: &ItemRef, equipped: bool) -> Result<EquipOutcome> {
        let item = self.resolve_item(actor, item)?;
        let outcome = self.act(actor, None, |tools, owner, _| {
            tools
                .engine
                .set_equipped(owner, item, equipped, tools.compendium)
        })?;
        self.notify(Some(actor), &outcome.notices);
        self.events.publish(Event::Resolution(ResolutionEvent::Equip {
            actor,
            outcome: outcome.clone(),
        }));
        Ok(outcome)
    }

    pub fn delete_item(&mut self, actor: ActorId, item: &ItemRef) -> Result<Vec<ItemId>> {
        let item = self.resolve_item(actor, item)?;
        self.act(actor, None, |tools, owner, _| tools.engine.delete_item(owner, item))
    }

    pub fn quick_test(&mut self, actor: ActorId, carac: Characteristic) -> Result<CheckResult> {
        let result = self.act(actor, None, |tools, character, _| {
            Ok(tools
                .engine
                .quick_test(character, carac, tools.ctx.now, tools.dice))
        })?;
        self.notify(Some(actor), &result.notices);
        self.events.publish(Event::Resolution(ResolutionEvent::Check {
            actor,
            result: result.clone(),
        }));
        Ok(result)
    }

    /// Validates a token move. A vetoed move is reported, not an error.
    pub fn move_actor(
        &mut self,
        actor: ActorId,
        from: GridPosition,
        to: GridPosition,
    ) -> Result<MoveVerdict> {
        let verdict = self.act(actor, None, |tools, character, _| {
            Ok(tools
                .engine
                .move_character(character, from, to, tools.ctx.on_turn))
        })?;
        let refusal = self.engine.move_refusal(self.actor(actor)?, verdict);
        if let Some(notice) = refusal {
            self.notify(Some(actor), &[notice]);
        }
        self.events.publish(Event::Resolution(ResolutionEvent::Move {
            actor,
            from,
            to,
            verdict,
        }));
        Ok(verdict)
    }

    // --- sheet edits ------------------------------------------------------

    pub fn set_pool_value(&mut self, actor: ActorId, pool: PoolKind, value: i64) -> Result<u32> {
        self.act(actor, None, |tools, character, _| {
            Ok(tools.engine.set_pool_value(character, pool, value))
        })
    }

    pub fn set_pool_max(&mut self, actor: ActorId, pool: PoolKind, max: i64) -> Result<u32> {
        self.act(actor, None, |tools, character, _| {
            Ok(tools.engine.set_pool_max(character, pool, max))
        })
    }

    pub fn add_effect(&mut self, actor: ActorId, effect: Effect) -> Result<usize> {
        self.act(actor, None, |tools, character, _| {
            tools.engine.add_effect(character, effect)
        })
    }

    pub fn delete_effect(&mut self, actor: ActorId, index: usize) -> Result<Effect> {
        self.act(actor, None, |tools, character, _| {
            tools.engine.delete_effect(character, index)
        })
    }

    pub fn tick_effect(&mut self, actor: ActorId, index: usize) -> Result<TickOutcome> {
        self.act(actor, None, |tools, character, _| {
            tools.engine.tick_effect(character, index)
        })
    }

    // --- negative traits --------------------------------------------------

    pub fn assign_trait(&mut self, actor: ActorId, key: &str) -> Result<()> {
        self.act(actor, None, |tools, character, _| {
            tools.engine.assign_trait(character, key)
        })
    }

    pub fn assign_random_trait(&mut self, actor: ActorId) -> Result<Option<String>> {
        self.act(actor, None, |tools, character, _| {
            Ok(tools.engine.assign_random_trait(character, tools.dice))
        })
    }

    pub fn set_addiction(&mut self, actor: ActorId, substance: Option<Substance>) -> Result<()> {
        self.act(actor, None, |tools, character, _| {
            tools.engine.set_addiction(character, substance, tools.ctx.now);
            Ok(())
        })
    }

    pub fn consume_dose(&mut self, actor: ActorId, substance: Option<Substance>) -> Result<Notice> {
        let notice = self.act(actor, None, |tools, character, _| {
            tools.engine.consume_dose(character, substance, tools.ctx.now)
        })?;
        self.notify(Some(actor), std::slice::from_ref(&notice));
        Ok(notice)
    }

    /// Recomputes every stored withdrawal flag and announces the flips.
    pub fn sweep_withdrawal(&mut self) -> Vec<WithdrawalChange> {
        let now = self.now();
        let ids: Vec<ActorId> = self.actors.keys().copied().collect();
        let mut changes = Vec::new();
        for id in ids {
            let Some(character) = self.actors.get_mut(&id) else {
                continue;
            };
            let before = character.clone();
            let change = self.engine.refresh_withdrawal(character, now);
            self.sync(&before);
            if let Some(change) = change {
                self.notify(Some(id), std::slice::from_ref(&change.notice));
                changes.push(change);
            }
        }
        tracing::debug!(flipped = changes.len(), "withdrawal sweep done");
        changes
    }

    // --- plumbing ---------------------------------------------------------

    fn resolve_item(&self, actor: ActorId, item: &ItemRef) -> Result<ItemId> {
        let character = self.actor(actor)?;
        match item {
            ItemRef::Id(id) => Ok(*id),
            ItemRef::Name(name) => character
                .item_named(name)
                .map(|found| found.id)
                .ok_or_else(|| RuntimeError::UnknownItem {
                    actor,
                    item: name.clone(),
                }),
        }
    }

    /// Runs one engine operation on `actor` and, optionally, a second
    /// character, then publishes what changed.
    fn act<T>(
        &mut self,
        actor: ActorId,
        other: Option<ActorId>,
        op: impl FnOnce(
            Tools<'_>,
            &mut Character,
            Option<&mut Character>,
        ) -> std::result::Result<T, ActionError>,
    ) -> Result<T> {
        if let Some(other) = other
            && !self.actors.contains_key(&other)
        {
            return Err(RuntimeError::UnknownActor(other));
        }
        let mut subject = self
            .actors
            .remove(&actor)
            .ok_or(RuntimeError::UnknownActor(actor))?;
        let subject_before = subject.clone();
        let other_before = other.and_then(|id| self.actors.get(&id).cloned());
        let ctx = ActionContext {
            on_turn: self.tracker.is_active_turn(actor),
            now: self.now(),
        };

        let tools = Tools {
            engine: &self.engine,
            compendium: &self.compendium,
            dice: &mut *self.dice,
            ctx,
        };
        let target = other.and_then(|id| self.actors.get_mut(&id));
        let result = op(tools, &mut subject, target);

        self.actors.insert(actor, subject);
        self.sync(&subject_before);
        if let Some(before) = other_before {
            self.sync(&before);
        }
        result.map_err(|error| self.reject(actor, error))
    }

    fn reject(&self, actor: ActorId, error: ActionError) -> RuntimeError {
        tracing::debug!(%actor, code = unicreon_core::RulesError::error_code(&error), "request refused");
        self.notify(Some(actor), &[error.notice()]);
        self.events.publish(Event::Resolution(ResolutionEvent::Rejected {
            actor,
            error: error.clone(),
        }));
        RuntimeError::Action(error)
    }

    fn sync(&self, before: &Character) {
        let Some(after) = self.actors.get(&before.id) else {
            return;
        };
        if let Some(patch) = ActorPatch::from_states(before, after) {
            tracing::trace!(actor = %patch.actor, changes = patch.changes.len(), "actor patch");
            self.events.publish(Event::Sync(patch));
        }
    }

    fn notify(&self, actor: Option<ActorId>, notices: &[Notice]) {
        for notice in notices {
            self.events.publish(Event::Notice(NoticeEvent {
                actor,
                notice: notice.clone(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::events::Topic;
    use chrono::TimeZone;
    use unicreon_core::{
        AttackConfig, AttackType, Item, ItemKind, Pool, RulesConfig, ScriptedDice, TraitCatalog,
        Winner,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn fighter(id: u32, name: &str) -> Character {
        let mut ch = Character::new(ActorId(id), name);
        ch.pools.pv = Pool::full(10);
        ch.pools.pm = Pool::full(6);
        let mut sword = Item::new(ItemId(0), "Épée", ItemKind::Weapon);
        sword.attack = Some(AttackConfig {
            carac: Some(Characteristic::Puissance),
            damage: "3".parse().unwrap(),
            kind: AttackType::Melee,
            ..AttackConfig::default()
        });
        ch.add_item(sword);
        ch
    }

    fn session(rolls: impl IntoIterator<Item = u32>) -> (Session, EventBus) {
        let events = EventBus::with_capacity(64);
        let session = Session::new(
            RulesEngine::new(RulesConfig::default(), TraitCatalog::builtin()),
            CompendiumSnapshot::new(),
            [fighter(1, "Aube"), fighter(2, "Brak")],
            Box::new(ScriptedDice::new(rolls)),
            Box::new(FixedClock(now())),
            events.clone(),
        );
        (session, events)
    }

    #[test]
    fn attack_updates_defender_and_publishes_patches() {
        let (mut session, events) = session([6, 1]);
        let mut sync = events.subscribe(Topic::Sync);
        let resolution = session
            .attack(ActorId(1), &"épée".into(), Some(ActorId(2)), PromptAnswers::default())
            .unwrap();
        assert_eq!(resolution.winner(), Winner::Attacker);
        assert_eq!(session.actor(ActorId(2)).unwrap().pools.pv.value(), 7);

        match sync.try_recv().unwrap() {
            Event::Sync(patch) => assert_eq!(patch.actor, ActorId(2)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn refusals_leave_actors_untouched_and_warn() {
        let (mut session, events) = session([]);
        let mut notices = events.subscribe(Topic::Notice);
        let before = session.actor(ActorId(1)).unwrap().clone();

        let error = session
            .attack(ActorId(1), &"Épée".into(), None, PromptAnswers::default())
            .unwrap_err();
        assert!(matches!(error, RuntimeError::Action(ActionError::NoTarget)));
        let error = session
            .attack(ActorId(1), &"Épée".into(), Some(ActorId(1)), PromptAnswers::default())
            .unwrap_err();
        assert!(matches!(error, RuntimeError::Action(ActionError::SelfTarget)));

        assert_eq!(session.actor(ActorId(1)).unwrap(), &before);
        match notices.try_recv().unwrap() {
            Event::Notice(event) => assert_eq!(event.notice.text, "Aucune cible sélectionnée."),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_actor_and_item_are_reported() {
        let (mut session, _) = session([]);
        assert!(matches!(
            session.quick_test(ActorId(9), Characteristic::Agilite),
            Err(RuntimeError::UnknownActor(ActorId(9)))
        ));
        assert!(matches!(
            session.equip(ActorId(1), &"Hache".into(), true),
            Err(RuntimeError::UnknownItem { .. })
        ));
        assert!(matches!(
            session.attack(ActorId(1), &"Épée".into(), Some(ActorId(9)), PromptAnswers::default()),
            Err(RuntimeError::UnknownActor(ActorId(9)))
        ));
    }

    #[test]
    fn turn_order_meters_actions() {
        let (mut session, _) = session([6, 1, 6, 1, 6, 1]);
        session.start_combat(&[ActorId(1), ActorId(2)]).unwrap();
        for _ in 0..2 {
            session
                .attack(ActorId(1), &"Épée".into(), Some(ActorId(2)), PromptAnswers::default())
                .unwrap();
        }
        let error = session
            .attack(ActorId(1), &"Épée".into(), Some(ActorId(2)), PromptAnswers::default())
            .unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::Action(ActionError::InsufficientActions { left: 0, needed: 1 })
        ));

        let advance = session.end_turn().unwrap();
        assert_eq!(advance.current, ActorId(2));
        assert_eq!(session.actor(ActorId(2)).unwrap().actions_left, 2);
    }

    #[test]
    fn end_turn_without_combat_fails() {
        let (mut session, _) = session([]);
        assert!(matches!(session.end_turn(), Err(RuntimeError::NoCombat)));
        assert!(matches!(session.start_combat(&[]), Err(RuntimeError::NoCombatants)));
    }

    #[test]
    fn advancing_time_triggers_withdrawal() {
        let (mut session, events) = session([]);
        let mut notices = events.subscribe(Topic::Notice);
        session.assign_trait(ActorId(2), "addicte").unwrap();
        session.set_addiction(ActorId(2), Some(Substance::Tabac)).unwrap();
        assert!(session.sweep_withdrawal().is_empty());

        session.advance_time(TimeDelta::hours(25));
        let changes = session.sweep_withdrawal();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].withdrawal);
        assert!(session.actor(ActorId(2)).unwrap().addiction.withdrawal);
        match notices.try_recv().unwrap() {
            Event::Notice(event) => assert!(event.notice.text.contains("en manque de Tabac")),
            other => panic!("unexpected event {other:?}"),
        }

        session.consume_dose(ActorId(2), None).unwrap();
        assert!(!session.actor(ActorId(2)).unwrap().addiction.withdrawal);
    }
}
