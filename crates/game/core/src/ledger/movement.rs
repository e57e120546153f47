use crate::state::{ActorKind, Character};
use crate::stats::CarryLoad;

/// Position on the square grid, in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Movement points needed between two cells: `ceil(hypot(dx, dy))`.
pub fn movement_cost(from: GridPosition, to: GridPosition) -> u32 {
    let dx = f64::from(from.x) - f64::from(to.x);
    let dy = f64::from(from.y) - f64::from(to.y);
    dx.hypot(dy).ceil() as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveVerdict {
    /// Not on turn: movement is not metered.
    Free,
    Allowed { cost: u32, remaining: u32 },
    TooFar { cost: u32, left: u32 },
    Overloaded { used: u32, max: u32 },
}

impl MoveVerdict {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Free | Self::Allowed { .. })
    }
}

/// Checks a pending move and spends the movement points when it is
/// metered and allowed.
///
/// An overloaded player character can never move.
pub fn validate_move(
    character: &mut Character,
    load: &CarryLoad,
    from: GridPosition,
    to: GridPosition,
    on_turn: bool,
) -> MoveVerdict {
    if character.kind == ActorKind::Personnage && load.overloaded {
        return MoveVerdict::Overloaded {
            used: load.used,
            max: load.max,
        };
    }
    if !on_turn {
        return MoveVerdict::Free;
    }
    let cost = movement_cost(from, to);
    let left = character.pools.pm.value();
    if cost > left {
        return MoveVerdict::TooFar { cost, left };
    }
    character.pools.pm.try_spend(cost);
    MoveVerdict::Allowed {
        cost,
        remaining: character.pools.pm.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ActorId;
    use crate::stats::Pool;

    fn runner(pm: u32) -> Character {
        let mut hero = Character::new(ActorId(1), "Aube");
        hero.pools.pm = Pool::full(pm);
        hero
    }

    fn light() -> CarryLoad {
        CarryLoad::compute(std::iter::empty(), 10)
    }

    #[test]
    fn cost_rounds_diagonal_distance_up() {
        let origin = GridPosition::new(0, 0);
        assert_eq!(movement_cost(origin, GridPosition::new(3, 0)), 3);
        assert_eq!(movement_cost(origin, GridPosition::new(1, 1)), 2);
        assert_eq!(movement_cost(origin, GridPosition::new(3, 4)), 5);
        assert_eq!(movement_cost(origin, origin), 0);
    }

    #[test]
    fn on_turn_moves_are_metered() {
        let mut hero = runner(4);
        let from = GridPosition::new(0, 0);
        let verdict = validate_move(&mut hero, &light(), from, GridPosition::new(3, 0), true);
        assert_eq!(verdict, MoveVerdict::Allowed { cost: 3, remaining: 1 });
        let verdict = validate_move(&mut hero, &light(), from, GridPosition::new(2, 0), true);
        assert_eq!(verdict, MoveVerdict::TooFar { cost: 2, left: 1 });
        assert_eq!(hero.pools.pm.value(), 1);
    }

    #[test]
    fn off_turn_moves_are_free() {
        let mut hero = runner(0);
        let verdict = validate_move(
            &mut hero,
            &light(),
            GridPosition::new(0, 0),
            GridPosition::new(10, 10),
            false,
        );
        assert!(verdict.is_allowed());
    }

    #[test]
    fn overloaded_character_cannot_move() {
        let mut hero = runner(6);
        let load = CarryLoad {
            used: 12,
            max: 10,
            overloaded: true,
            ..light()
        };
        let verdict = validate_move(
            &mut hero,
            &load,
            GridPosition::new(0, 0),
            GridPosition::new(1, 0),
            false,
        );
        assert_eq!(verdict, MoveVerdict::Overloaded { used: 12, max: 10 });
    }
}
