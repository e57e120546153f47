//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine refusals and worker coordination failures so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use unicreon_core::{ActionError, ActorId, ErrorSeverity, Notice, RulesError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("actor {0} is not part of the session")]
    UnknownActor(ActorId),

    #[error("actor {actor} owns no item named '{item}'")]
    UnknownItem { actor: ActorId, item: String },

    #[error("no combat is running")]
    NoCombat,

    #[error("a combat needs at least one combatant")]
    NoCombatants,

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Warning to show the players, for errors caused by their request.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Action(error) => Some(error.notice()),
            Self::UnknownActor(actor) => Some(Notice::warn(format!("Acteur introuvable ({actor})."))),
            Self::UnknownItem { item, .. } => Some(Notice::warn(format!("Objet introuvable : {item}."))),
            Self::NoCombat => Some(Notice::warn("Aucun combat en cours.")),
            Self::NoCombatants => Some(Notice::warn("Aucun combattant.")),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => None,
        }
    }
}

impl RulesError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(error) => error.severity(),
            Self::UnknownActor(_) | Self::UnknownItem { .. } | Self::NoCombatants => {
                ErrorSeverity::Validation
            }
            Self::NoCombat => ErrorSeverity::Recoverable,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Action(error) => error.error_code(),
            Self::UnknownActor(_) => "RUNTIME_UNKNOWN_ACTOR",
            Self::UnknownItem { .. } => "RUNTIME_UNKNOWN_ITEM",
            Self::NoCombat => "RUNTIME_NO_COMBAT",
            Self::NoCombatants => "RUNTIME_NO_COMBATANTS",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}
