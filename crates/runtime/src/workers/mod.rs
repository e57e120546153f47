//! Worker tasks that back the runtime orchestration.
//!
//! The session worker executes rules commands, while the sweep worker keeps
//! time-based state (addiction withdrawal) current on the game master's side.

mod session;
mod sweep;

pub use session::{Command, SessionWorker};
pub use sweep::SweepWorker;
