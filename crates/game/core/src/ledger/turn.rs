use crate::state::ActorId;

/// Result of moving the tracker forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnAdvance {
    pub round: u32,
    pub current: ActorId,
    /// Set when the order wrapped around.
    pub new_round: bool,
}

/// Ordered combatants with the index of the one currently acting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatTracker {
    active: bool,
    round: u32,
    order: Vec<ActorId>,
    turn: usize,
}

impl CombatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a combat with the given order. The first combatant acts first.
    ///
    /// Duplicates are dropped. Returns `None` if nobody takes part.
    pub fn start(&mut self, order: impl IntoIterator<Item = ActorId>) -> Option<TurnAdvance> {
        let mut combatants = Vec::new();
        for id in order {
            if !combatants.contains(&id) {
                combatants.push(id);
            }
        }
        let first = *combatants.first()?;
        *self = Self {
            active: true,
            round: 1,
            order: combatants,
            turn: 0,
        };
        Some(TurnAdvance {
            round: 1,
            current: first,
            new_round: true,
        })
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[ActorId] {
        &self.order
    }

    pub fn current(&self) -> Option<ActorId> {
        if !self.active {
            return None;
        }
        self.order.get(self.turn).copied()
    }

    /// Whether `actor` holds the turn of an active combat.
    pub fn is_active_turn(&self, actor: ActorId) -> bool {
        self.current() == Some(actor)
    }

    pub fn advance(&mut self) -> Option<TurnAdvance> {
        if !self.active || self.order.is_empty() {
            return None;
        }
        self.turn += 1;
        let new_round = self.turn >= self.order.len();
        if new_round {
            self.turn = 0;
            self.round += 1;
        }
        Some(TurnAdvance {
            round: self.round,
            current: self.order[self.turn],
            new_round,
        })
    }

    /// Removes a combatant, keeping the current turn on the same actor when
    /// possible.
    pub fn remove(&mut self, actor: ActorId) {
        let Some(index) = self.order.iter().position(|id| *id == actor) else {
            return;
        };
        self.order.remove(index);
        if index < self.turn {
            self.turn -= 1;
        }
        if self.order.is_empty() {
            self.end();
        } else if self.turn >= self.order.len() {
            self.turn = 0;
            self.round += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_tracker_has_no_current_turn() {
        let tracker = CombatTracker::new();
        assert!(!tracker.is_active_turn(ActorId(1)));
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn advance_wraps_and_counts_rounds() {
        let mut tracker = CombatTracker::new();
        tracker.start([ActorId(1), ActorId(2), ActorId(1)]).unwrap();
        assert_eq!(tracker.order(), &[ActorId(1), ActorId(2)]);
        assert!(tracker.is_active_turn(ActorId(1)));

        let next = tracker.advance().unwrap();
        assert_eq!((next.current, next.round, next.new_round), (ActorId(2), 1, false));
        let next = tracker.advance().unwrap();
        assert_eq!((next.current, next.round, next.new_round), (ActorId(1), 2, true));
    }

    #[test]
    fn removing_the_last_combatant_ends_combat() {
        let mut tracker = CombatTracker::new();
        tracker.start([ActorId(1), ActorId(2)]);
        tracker.advance();
        tracker.remove(ActorId(1));
        assert_eq!(tracker.current(), Some(ActorId(2)));
        tracker.remove(ActorId(2));
        assert!(!tracker.is_active());
    }
}
