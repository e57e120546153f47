//! Runtime orchestration for Unicreon table sessions.
//!
//! This crate wires the rules engine, loaded content and worker tasks into a
//! cohesive runtime API. Consumers embed [`Runtime`] to run a session,
//! subscribe to events, and act on characters through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`session`] holds the authoritative session state
//! - [`scenario`] replays scripted encounters through a handle
//! - [`clock`] abstracts wall-clock time for addiction timers
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod clock;
pub mod events;
pub mod runtime;
pub mod scenario;
pub mod session;

mod workers;

pub use api::{PromptAnswers, Result, RuntimeError, RuntimeHandle};
pub use clock::{Clock, FixedClock, SystemClock};
pub use events::{Event, EventBus, NoticeEvent, ResolutionEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{ScenarioReport, ScenarioRunner, StepOutcome};
pub use session::{ItemRef, Session};
