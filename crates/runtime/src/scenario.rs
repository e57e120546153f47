//! Replays scripted encounters against a running session.
//!
//! A step the engine refuses (no actions left, no target) is recorded and
//! the script goes on, the way a table would carry on after a warning.
//! Anything else (unknown actor or item, closed channels) aborts the run.

use chrono::TimeDelta;

use unicreon_content::{EncounterScript, EncounterStep};
use unicreon_core::{ActionError, Usage};

use crate::api::{PromptAnswers, Result, RuntimeError, RuntimeHandle};

/// What one replayed step amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Refused(ActionError),
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    pub name: String,
    pub outcomes: Vec<(EncounterStep, StepOutcome)>,
    /// Combat round when the script ended, `0` outside combat.
    pub final_round: u32,
}

impl ScenarioReport {
    pub fn refused(&self) -> impl Iterator<Item = &(EncounterStep, StepOutcome)> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StepOutcome::Refused(_)))
    }
}

pub struct ScenarioRunner {
    handle: RuntimeHandle,
    answers: PromptAnswers,
}

impl ScenarioRunner {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self {
            handle,
            answers: PromptAnswers::default(),
        }
    }

    /// Answers used for every prompt of the script.
    #[must_use]
    pub fn with_answers(mut self, answers: PromptAnswers) -> Self {
        self.answers = answers;
        self
    }

    pub async fn run(&self, script: &EncounterScript) -> Result<ScenarioReport> {
        tracing::info!(name = %script.name, steps = script.steps.len(), "running encounter");
        let mut report = ScenarioReport {
            name: script.name.clone(),
            ..ScenarioReport::default()
        };
        if !script.combatants.is_empty() {
            self.handle.start_combat(script.combatants.clone()).await?;
        }

        for step in &script.steps {
            let outcome = match self.play(step).await {
                Ok(()) => StepOutcome::Done,
                Err(RuntimeError::Action(error)) => {
                    tracing::debug!(?step, %error, "step refused");
                    StepOutcome::Refused(error)
                }
                Err(error) => return Err(error),
            };
            report.outcomes.push((step.clone(), outcome));
        }

        let tracker = self.handle.query_combat().await?;
        report.final_round = tracker.round();
        if tracker.is_active() {
            self.handle.end_combat().await?;
        }
        Ok(report)
    }

    async fn play(&self, step: &EncounterStep) -> Result<()> {
        match step {
            EncounterStep::Attack {
                attacker,
                item,
                defender,
            } => {
                self.handle
                    .attack(*attacker, item.as_str(), Some(*defender), self.answers)
                    .await?;
            }
            EncounterStep::Use {
                owner,
                item,
                target,
            } => {
                let usage = self
                    .handle
                    .use_item(*owner, item.as_str(), *target, self.answers)
                    .await?;
                if usage == Usage::Inspect {
                    tracing::debug!(%owner, %item, "item has nothing to use");
                }
            }
            EncounterStep::Equip {
                actor,
                item,
                equipped,
            } => {
                self.handle.equip(*actor, item.as_str(), *equipped).await?;
            }
            EncounterStep::Check { actor, carac } => {
                self.handle.quick_test(*actor, *carac).await?;
            }
            EncounterStep::Move { actor, from, to } => {
                self.handle.move_actor(*actor, *from, *to).await?;
            }
            EncounterStep::Dose { actor, substance } => {
                self.handle.consume_dose(*actor, *substance).await?;
            }
            EncounterStep::EndTurn => {
                self.handle.end_turn().await?;
            }
            EncounterStep::Wait { hours } => {
                self.handle
                    .advance_time(TimeDelta::hours(i64::from(*hours)))
                    .await?;
                self.handle.sweep_withdrawal().await?;
            }
        }
        Ok(())
    }
}
