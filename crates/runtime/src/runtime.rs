//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a session.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use unicreon_core::{Character, CompendiumSnapshot, DiceRoller, PcgDice, RulesEngine};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::{Clock, SystemClock};
use crate::events::EventBus;
use crate::session::Session;
use crate::workers::{Command, SessionWorker, SweepWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Dice seed. `None` draws one at startup.
    pub seed: Option<u64>,
    /// Only the game master's runtime sweeps withdrawal flags.
    pub game_master: bool,
    /// Overrides the sweep interval from the rules configuration.
    pub sweep_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
            game_master: false,
            sweep_interval: None,
        }
    }
}

/// Main runtime that orchestrates a table session
///
/// Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session_worker_handle: JoinHandle<()>,
    sweep: Option<SweepTask>,
}

struct SweepTask {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The session worker stops once every handle is gone, so clones handed
    /// out earlier must be dropped first.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(sweep) = self.sweep {
            // The worker may already have stopped on its own.
            let _ = sweep.shutdown_tx.send(());
            sweep.handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        drop(self.handle);

        self.session_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    engine: RulesEngine,
    compendium: CompendiumSnapshot,
    roster: Vec<Character>,
    dice: Option<Box<dyn DiceRoller + Send>>,
    clock: Option<Box<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            engine: RulesEngine::default(),
            compendium: CompendiumSnapshot::new(),
            roster: Vec::new(),
            dice: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(mut self, engine: RulesEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Template items that equipment grants are looked up in.
    pub fn compendium(mut self, compendium: CompendiumSnapshot) -> Self {
        self.compendium = compendium;
        self
    }

    pub fn roster(mut self, roster: Vec<Character>) -> Self {
        self.roster = roster;
        self
    }

    /// Replace the seeded dice, e.g. with scripted rolls in tests.
    pub fn dice(mut self, dice: impl DiceRoller + Send + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Run the withdrawal sweep from this runtime
    pub fn game_master(mut self, enable: bool) -> Self {
        self.config.game_master = enable;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let dice: Box<dyn DiceRoller + Send> = match self.dice {
            Some(dice) => dice,
            None => {
                let seed = self.config.seed.unwrap_or_else(rand::random);
                tracing::info!(seed, "dice seeded");
                Box::new(PcgDice::seeded(seed))
            }
        };
        let clock: Box<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Box::new(SystemClock),
        };
        let sweep_interval = self
            .config
            .sweep_interval
            .unwrap_or_else(|| self.engine.config().sweep_interval());

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let session = Session::new(
            self.engine,
            self.compendium,
            self.roster,
            dice,
            clock,
            event_bus,
        );
        let session_worker = SessionWorker::new(session, command_rx);
        let session_worker_handle = tokio::spawn(async move {
            session_worker.run().await;
        });

        // Create sweep worker (game master only)
        let sweep = if self.config.game_master {
            let (shutdown_tx, shutdown_rx) = oneshot::channel();
            let worker = SweepWorker::new(handle.clone(), sweep_interval, shutdown_rx);
            Some(SweepTask {
                handle: tokio::spawn(async move {
                    worker.run().await;
                }),
                shutdown_tx,
            })
        } else {
            None
        };

        Ok(Runtime {
            handle,
            session_worker_handle,
            sweep,
        })
    }
}
