use std::fmt;

use serde::{Deserialize, Serialize};

pub mod generator;
pub mod map;
pub mod maze;
pub mod solver;
pub mod validate;

pub use maze::{Maze, MazeError, Terrain};
pub use solver::{Solver, solve};
pub use validate::{Validation, validate};

/// Represents a 2D grid coordinate (column `x`, row `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One of the four cardinal moves.
///
/// The declaration order doubles as the neighbor evaluation order, so any
/// tie-broken path choice downstream is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All moves, in the fixed evaluation order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Coordinate offset of this move as `(dx, dy)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Applies this move to a position.
    ///
    /// Returns `None` when the move would leave the coordinate space on the
    /// low side; the upper bounds belong to the grid and are checked there.
    pub fn apply(self, from: Position) -> Option<Position> {
        let (dx, dy) = self.delta();
        let x = from.x.checked_add_signed(dx)?;
        let y = from.y.checked_add_signed(dy)?;
        Some(Position { x, y })
    }

    /// Single-letter token for this move.
    pub fn token(self) -> char {
        match self {
            Action::Up => 'U',
            Action::Down => 'D',
            Action::Left => 'L',
            Action::Right => 'R',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Renders an action sequence as a compact token string, e.g. `"RRDD"`.
pub fn render_actions(actions: &[Action]) -> String {
    actions.iter().map(|a| a.token()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(1, 4);
        let b = Position::new(3, 1);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(b.manhattan(a), 5);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn apply_rejects_moves_off_the_low_edge() {
        let origin = Position::new(0, 0);
        assert_eq!(Action::Up.apply(origin), None);
        assert_eq!(Action::Left.apply(origin), None);
        assert_eq!(Action::Down.apply(origin), Some(Position::new(0, 1)));
        assert_eq!(Action::Right.apply(origin), Some(Position::new(1, 0)));
    }

    #[test]
    fn tokens_render_in_order() {
        assert_eq!(
            render_actions(&[Action::Up, Action::Down, Action::Left, Action::Right]),
            "UDLR"
        );
    }
}
