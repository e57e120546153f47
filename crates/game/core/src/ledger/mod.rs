//! Per-turn resources: actions, movement and the combat turn order.
//!
//! Outside an active combat, or off an actor's turn, nothing here ever
//! blocks: actions are treated as fully available and movement is free.
mod actions;
mod movement;
mod turn;

pub use actions::{ActionSpend, actions_total, reset_turn, spend_actions};
pub use movement::{GridPosition, MoveVerdict, movement_cost, validate_move};
pub use turn::{CombatTracker, TurnAdvance};
