//! Replays the shipped encounter against a runtime built from the shipped
//! content.

use chrono::{TimeZone, Utc};

use unicreon_content::ContentFactory;
use unicreon_core::{ActorId, NoticeLevel};
use unicreon_runtime::{
    Event, FixedClock, Runtime, RuntimeConfig, ScenarioRunner, StepOutcome, Topic,
};

fn factory() -> ContentFactory {
    ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data"))
}

async fn shipped_runtime(seed: u64) -> Runtime {
    let factory = factory();
    let catalog = factory.load_trait_catalog().unwrap();
    Runtime::builder()
        .config(RuntimeConfig {
            seed: Some(seed),
            ..RuntimeConfig::default()
        })
        .engine(factory.load_engine().unwrap())
        .compendium(factory.load_compendium().unwrap())
        .roster(factory.load_roster(&catalog).unwrap())
        .clock(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn embuscade_runs_to_the_end() {
    let runtime = shipped_runtime(7).await;
    let handle = runtime.handle();
    let mut notices = handle.subscribe(Topic::Notice);
    let script = factory().load_encounter("embuscade").unwrap();

    let report = ScenarioRunner::new(handle.clone()).run(&script).await.unwrap();

    assert_eq!(report.outcomes.len(), script.steps.len());
    assert!(
        report
            .outcomes
            .iter()
            .all(|(_, outcome)| *outcome == StepOutcome::Done),
        "{:?}",
        report.refused().collect::<Vec<_>>()
    );
    assert_eq!(report.final_round, 2);

    let aube = handle.query_actor(ActorId(1)).await.unwrap();
    assert!(aube.item_named("Tir précis").is_some());
    assert!(aube.item_named("Potion de soin").is_none());

    let brak = handle.query_actor(ActorId(2)).await.unwrap();
    assert!(!brak.addiction.withdrawal);
    assert!(brak.addiction.last_dose.is_some());

    let mut texts = Vec::new();
    while let Ok(Event::Notice(event)) = notices.try_recv() {
        texts.push((event.notice.level, event.notice.text));
    }
    assert!(texts.contains(&(
        NoticeLevel::Warn,
        "Brak est maintenant en manque de Tabac (désavantage global).".to_string()
    )));
    assert!(texts.iter().any(|(_, text)| text.starts_with("Brak consomme sa dose (Tabac)")));

    assert!(!handle.query_combat().await.unwrap().is_active());
    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn same_seed_same_story() {
    let mut rolls = Vec::new();
    for _ in 0..2 {
        let runtime = shipped_runtime(42).await;
        let handle = runtime.handle();
        let mut resolutions = handle.subscribe(Topic::Resolution);
        let script = factory().load_encounter("embuscade").unwrap();
        ScenarioRunner::new(handle.clone()).run(&script).await.unwrap();

        let mut totals = Vec::new();
        while let Ok(event) = resolutions.try_recv() {
            totals.push(format!("{event:?}"));
        }
        rolls.push(totals);
        drop(handle);
        runtime.shutdown().await.unwrap();
    }
    assert_eq!(rolls[0], rolls[1]);
}
