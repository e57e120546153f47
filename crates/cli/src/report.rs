//! Turns runtime events into lines for the terminal.

use unicreon_core::{MoveVerdict, NoticeLevel};
use unicreon_runtime::{Event, ResolutionEvent, TurnEvent};

/// One or more printable lines, or nothing for events the log skips.
pub fn lines(event: &Event) -> Vec<String> {
    match event {
        Event::Notice(event) => {
            let mark = match event.notice.level {
                NoticeLevel::Info => "·",
                NoticeLevel::Warn => "!",
            };
            vec![format!("{mark} {}", event.notice.text)]
        }
        Event::Resolution(resolution) => resolution_lines(resolution),
        Event::Turn(TurnEvent::Started(advance)) => vec![format!(
            "== Combat : round {}, {} commence ==",
            advance.round, advance.current
        )],
        Event::Turn(TurnEvent::Advanced(advance)) => {
            vec![format!("-- Round {} : tour de {} --", advance.round, advance.current)]
        }
        Event::Turn(TurnEvent::Ended) => vec!["== Fin du combat ==".to_string()],
        Event::Sync(_) => Vec::new(),
    }
}

fn resolution_lines(resolution: &ResolutionEvent) -> Vec<String> {
    match resolution {
        ResolutionEvent::Attack(attack) => attack.narrative.clone(),
        ResolutionEvent::ItemUsed(used) => vec![used.narrative.clone()],
        ResolutionEvent::Competence { actor, result } => vec![format!(
            "{actor} : {} ({}) garde {}.",
            result.skill,
            result.carac.label(),
            result.kept
        )],
        ResolutionEvent::Check { actor, result } => {
            let verdict = match result.success() {
                Some(true) => " réussi",
                Some(false) => " raté",
                None => "",
            };
            vec![format!(
                "{actor} : test de {} [{}] = {}{verdict}.",
                result.carac.label(),
                result.roll.formula,
                result.total()
            )]
        }
        ResolutionEvent::Equip { actor, outcome } => {
            let verb = if outcome.equipped { "équipe" } else { "range" };
            vec![format!(
                "{actor} {verb} l'objet {} (+{} / -{}).",
                outcome.item,
                outcome.created.len(),
                outcome.removed.len()
            )]
        }
        ResolutionEvent::Move {
            actor,
            from,
            to,
            verdict,
        } => {
            let path = format!("({}, {}) → ({}, {})", from.x, from.y, to.x, to.y);
            match verdict {
                MoveVerdict::Free => vec![format!("{actor} se déplace {path}.")],
                MoveVerdict::Allowed { cost, remaining } => vec![format!(
                    "{actor} se déplace {path} ({cost} PM, {remaining} restant(s))."
                )],
                // The refusal itself arrives as a notice.
                MoveVerdict::TooFar { .. } | MoveVerdict::Overloaded { .. } => Vec::new(),
            }
        }
        // Refusals are announced on the notice topic.
        ResolutionEvent::Rejected { .. } => Vec::new(),
    }
}
