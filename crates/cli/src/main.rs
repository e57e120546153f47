//! Unicreon command-line binary.
//!
//! Composition root that assembles:
//! 1. Content (rules, traits, packs, roster) via `ContentFactory`
//! 2. Runtime (session worker, event bus, sweep) via `RuntimeBuilder`
//! 3. A scripted encounter replayed through the runtime handle
//!
//! Notices, resolutions and turn changes are printed to stdout while logs go
//! to stderr.
//!
//! # Examples
//!
//! ```bash
//! UNICREON_SEED=42 cargo run -p unicreon-cli
//! RUST_LOG=unicreon_runtime=debug UNICREON_ENCOUNTER=embuscade cargo run -p unicreon-cli
//! ```
mod config;
mod report;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{Receiver, error::RecvError};

use unicreon_content::ContentFactory;
use unicreon_runtime::{Event, Runtime, ScenarioRunner, StepOutcome, Topic};

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    run(config).await
}

async fn run(config: CliConfig) -> Result<()> {
    tracing::info!(data_dir = %config.data_dir.display(), encounter = %config.encounter, "starting");

    // 1. Content
    let factory = ContentFactory::new(&config.data_dir);
    let catalog = factory
        .load_trait_catalog()
        .context("loading negative traits")?;
    let engine = factory.load_engine().context("loading rules")?;
    let compendium = factory.load_compendium().context("loading compendium packs")?;
    let roster = factory
        .load_roster(&catalog)
        .context("loading characters")?;
    let script = factory
        .load_encounter(&config.encounter)
        .with_context(|| format!("loading encounter `{}`", config.encounter))?;
    tracing::info!(
        actors = roster.len(),
        templates = compendium.len(),
        steps = script.steps.len(),
        "content loaded"
    );

    // 2. Runtime
    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .engine(engine)
        .compendium(compendium)
        .roster(roster)
        .build()
        .await?;
    let handle = runtime.handle();
    let printer = tokio::spawn(print_events(
        handle.subscribe(Topic::Turn),
        handle.subscribe(Topic::Resolution),
        handle.subscribe(Topic::Notice),
    ));

    // 3. Encounter
    let report = ScenarioRunner::new(handle.clone()).run(&script).await?;
    let roster = handle.query_roster().await?;

    drop(handle);
    runtime.shutdown().await?;
    printer.await.context("event printer panicked")?;

    println!();
    println!("{} : {} étape(s), round final {}", report.name, report.outcomes.len(), report.final_round);
    for (step, outcome) in &report.outcomes {
        if let StepOutcome::Refused(error) = outcome {
            println!("  refusé : {step:?} ({error})");
        }
    }
    for character in &roster {
        println!(
            "  {} : {}/{} PV, {}/{} PK",
            character.name,
            character.pools.pv.value(),
            character.pools.pv.max(),
            character.pools.pk.value(),
            character.pools.pk.max()
        );
    }
    Ok(())
}

/// Prints events until every topic is closed by the runtime shutting down.
async fn print_events(
    mut turns: Receiver<Event>,
    mut resolutions: Receiver<Event>,
    mut notices: Receiver<Event>,
) {
    let mut open = [true; 3];
    while open.contains(&true) {
        let (slot, received) = tokio::select! {
            biased;
            received = turns.recv(), if open[0] => (0, received),
            received = resolutions.recv(), if open[1] => (1, received),
            received = notices.recv(), if open[2] => (2, received),
        };
        match received {
            Ok(event) => {
                for line in report::lines(&event) {
                    println!("{line}");
                }
            }
            Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "event log fell behind"),
            Err(RecvError::Closed) => open[slot] = false,
        }
    }
}
