use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};

use unicreon_core::{
    ActionError, ActorId, AttackConfig, AttackType, Character, Characteristic, CompendiumSnapshot,
    Effect, EffectKind, EffectTarget, GrantSpec, Item, ItemId, ItemKind, Pool, PoolKind,
    ScriptedDice, Substance, Winner,
};
use unicreon_runtime::{
    Event, FixedClock, PromptAnswers, ResolutionEvent, Runtime, RuntimeConfig, RuntimeError,
    RuntimeHandle, Topic, TurnEvent,
};

fn addict(id: u32) -> Character {
    let mut ch = Character::new(ActorId(id), "Brak");
    ch.negative_trait.key = "addicte".into();
    ch.addiction.substance = Some(Substance::Alcool);
    ch
}

fn duelist(id: u32, name: &str) -> Character {
    let mut ch = Character::new(ActorId(id), name);
    ch.pools.pv = Pool::full(10);
    ch.pools.pk = Pool::full(2);
    let mut sword = Item::new(ItemId(0), "Épée", ItemKind::Weapon);
    sword.equippable = true;
    sword.granted_items = vec![GrantSpec {
        id: Some("parade".into()),
        ..GrantSpec::default()
    }];
    sword.attack = Some(AttackConfig {
        carac: Some(Characteristic::Puissance),
        base_difficulty: 5,
        damage: "max 4".parse().unwrap(),
        kind: AttackType::Melee,
        use_pk: true,
        ..AttackConfig::default()
    });
    ch.add_item(sword);
    ch
}

fn compendium() -> CompendiumSnapshot {
    CompendiumSnapshot::new().with_entry(
        "competences",
        "parade",
        Item::new(ItemId(0), "Parade", ItemKind::Skill),
    )
}

async fn wait_for_withdrawal(handle: &RuntimeHandle, actor: ActorId) -> bool {
    for _ in 0..50 {
        if handle.query_actor(actor).await.unwrap().addiction.withdrawal {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn game_master_runtime_sweeps_withdrawal() {
    let runtime = Runtime::builder()
        .roster(vec![addict(1)])
        .clock(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()))
        .game_master(true)
        .build()
        .await
        .unwrap();
    assert!(runtime.is_sweeping());
    let handle = runtime.handle();

    assert!(wait_for_withdrawal(&handle, ActorId(1)).await);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn player_runtime_never_sweeps() {
    let runtime = Runtime::builder()
        .roster(vec![addict(1)])
        .build()
        .await
        .unwrap();
    assert!(!runtime.is_sweeping());
    let handle = runtime.handle();

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!handle.query_actor(ActorId(1)).await.unwrap().addiction.withdrawal);

    let changes = handle.sweep_withdrawal().await.unwrap();
    assert_eq!(changes.len(), 1);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn dose_then_wait_then_sweep() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            sweep_interval: Some(Duration::from_secs(3600)),
            ..RuntimeConfig::default()
        })
        .roster(vec![addict(1)])
        .clock(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let notice = handle.consume_dose(ActorId(1), None).await.unwrap();
    assert!(notice.text.contains("Alcool"));
    assert!(handle.sweep_withdrawal().await.unwrap().is_empty());

    handle.advance_time(TimeDelta::hours(23)).await.unwrap();
    assert!(handle.sweep_withdrawal().await.unwrap().is_empty());
    handle.advance_time(TimeDelta::hours(2)).await.unwrap();
    let changes = handle.sweep_withdrawal().await.unwrap();
    assert!(changes[0].withdrawal);

    let sheet = handle.query_sheet(ActorId(1)).await.unwrap();
    assert!(sheet.negative_trait.withdrawal_active);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn combat_round_trip_through_the_handle() {
    let runtime = Runtime::builder()
        .roster(vec![duelist(1, "Aube"), duelist(2, "Brak")])
        .compendium(compendium())
        // Aube's attack then Brak's defense.
        .dice(ScriptedDice::new([4, 2]))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);
    let mut resolutions = handle.subscribe(Topic::Resolution);
    let mut sync = handle.subscribe(Topic::Sync);

    let started = handle
        .start_combat(vec![ActorId(1), ActorId(2)])
        .await
        .unwrap();
    assert_eq!(started.current, ActorId(1));
    assert!(matches!(turns.recv().await.unwrap(), Event::Turn(TurnEvent::Started(_))));

    let outcome = handle.equip(ActorId(1), "épée", true).await.unwrap();
    assert_eq!(outcome.created.len(), 1);

    // One karma lowers the difficulty from 5 to 4, so a 4 hits.
    let resolution = handle
        .attack(
            ActorId(1),
            "Épée",
            Some(ActorId(2)),
            PromptAnswers::default().with_karma(1, 0),
        )
        .await
        .unwrap();
    assert_eq!(resolution.winner(), Winner::Attacker);
    assert_eq!(resolution.damage_dealt(), 4);
    assert_eq!(resolution.actions_remaining, 1);

    let brak = handle.query_actor(ActorId(2)).await.unwrap();
    assert_eq!(brak.pools.pv.value(), 6);
    let aube = handle.query_actor(ActorId(1)).await.unwrap();
    assert_eq!(aube.pools.pk.value(), 1);

    let mut saw_attack = false;
    while let Ok(event) = resolutions.try_recv() {
        saw_attack |= matches!(event, Event::Resolution(ResolutionEvent::Attack(_)));
    }
    assert!(saw_attack);
    let mut patched = Vec::new();
    while let Ok(Event::Sync(patch)) = sync.try_recv() {
        patched.push(patch.actor);
    }
    assert!(patched.contains(&ActorId(1)));
    assert!(patched.contains(&ActorId(2)));

    let cancelled = handle
        .attack(ActorId(1), "Épée", Some(ActorId(2)), PromptAnswers::cancelled())
        .await;
    assert!(matches!(
        cancelled,
        Err(RuntimeError::Action(ActionError::Cancelled))
    ));
    assert_eq!(handle.query_actor(ActorId(2)).await.unwrap(), brak);

    let advance = handle.end_turn().await.unwrap();
    assert_eq!(advance.current, ActorId(2));
    handle.end_combat().await.unwrap();
    assert!(matches!(handle.end_turn().await, Err(RuntimeError::NoCombat)));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn sheet_edits_are_normalized() {
    let runtime = Runtime::builder()
        .roster(vec![duelist(1, "Aube")])
        .dice(ScriptedDice::new([]))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    assert_eq!(handle.set_pool_value(ActorId(1), PoolKind::Pv, 99).await.unwrap(), 10);
    assert_eq!(handle.set_pool_max(ActorId(1), PoolKind::Pv, -4).await.unwrap(), 0);

    let vigor = Effect::new("Vigueur", EffectKind::Buff)
        .with_target(EffectTarget::Carac(Characteristic::Puissance), 1)
        .lasting(2);
    assert_eq!(handle.add_effect(ActorId(1), vigor).await.unwrap(), 0);
    handle.tick_effect(ActorId(1), 0).await.unwrap();
    let removed = handle.delete_effect(ActorId(1), 0).await.unwrap();
    assert_eq!(removed.remaining_turns, 1);
    assert!(matches!(
        handle.delete_effect(ActorId(1), 0).await,
        Err(RuntimeError::Action(ActionError::EffectIndexOutOfRange { .. }))
    ));

    let usage = handle
        .use_item(ActorId(1), ItemId(1), None, PromptAnswers::default())
        .await;
    assert!(matches!(
        usage,
        Err(RuntimeError::Action(ActionError::NoTarget))
    ));
    assert!(matches!(
        handle.assign_trait(ActorId(1), "inconnu").await,
        Err(RuntimeError::Action(ActionError::UnknownTrait(_)))
    ));
    handle.assign_trait(ActorId(1), "myope").await.unwrap();
    assert_eq!(
        handle.query_actor(ActorId(1)).await.unwrap().negative_trait.key,
        "myope"
    );
    assert!(matches!(
        handle.use_item(ActorId(7), "Épée", None, PromptAnswers::default()).await,
        Err(RuntimeError::UnknownActor(ActorId(7)))
    ));

    drop(handle);
    runtime.shutdown().await.unwrap();
}
