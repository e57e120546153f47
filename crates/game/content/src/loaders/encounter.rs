//! Scripted encounter loader.
//!
//! An encounter lists the combatants in initiative order and a sequence of
//! steps the runtime replays against a session. Items are referenced by
//! name since their ids only exist once a roster is loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unicreon_core::{ActorId, Characteristic, GridPosition, Substance};

use crate::loaders::{LoadResult, read_file};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterScript {
    pub name: String,
    /// Combat order. Empty means the encounter runs outside combat.
    #[serde(default)]
    pub combatants: Vec<ActorId>,
    pub steps: Vec<EncounterStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterStep {
    Attack {
        attacker: ActorId,
        item: String,
        defender: ActorId,
    },
    Use {
        owner: ActorId,
        item: String,
        #[serde(default)]
        target: Option<ActorId>,
    },
    Equip {
        actor: ActorId,
        item: String,
        equipped: bool,
    },
    Check {
        actor: ActorId,
        carac: Characteristic,
    },
    Move {
        actor: ActorId,
        from: GridPosition,
        to: GridPosition,
    },
    Dose {
        actor: ActorId,
        #[serde(default)]
        substance: Option<Substance>,
    },
    /// Advances the combat turn.
    EndTurn,
    /// Moves the session clock forward, then runs the withdrawal sweep.
    Wait { hours: u32 },
}

impl EncounterStep {
    pub fn actors(&self) -> Vec<ActorId> {
        match self {
            Self::Attack {
                attacker, defender, ..
            } => vec![*attacker, *defender],
            Self::Use { owner, target, .. } => std::iter::once(*owner).chain(*target).collect(),
            Self::Equip { actor, .. }
            | Self::Check { actor, .. }
            | Self::Move { actor, .. }
            | Self::Dose { actor, .. } => vec![*actor],
            Self::EndTurn | Self::Wait { .. } => Vec::new(),
        }
    }
}

impl EncounterScript {
    /// Actors the script refers to, in first-mention order.
    pub fn actors(&self) -> Vec<ActorId> {
        let mut actors = self.combatants.clone();
        for step in &self.steps {
            for actor in step.actors() {
                if !actors.contains(&actor) {
                    actors.push(actor);
                }
            }
        }
        actors
    }
}

/// Loader for encounter scripts (`encounters/{name}.ron`).
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterScript> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterScript> {
        let script: EncounterScript = ron::from_str(content)?;
        if script.steps.is_empty() {
            tracing::warn!(name = %script.name, "encounter has no steps");
        }
        Ok(script)
    }
}
