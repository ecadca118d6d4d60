use crate::{Action, Maze};

/// Outcome of replaying a candidate solution against a maze.
///
/// `cost` is the accumulated terrain cost of the replay, or `-1` when the
/// walk left the maze or stepped into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub is_solution: bool,
    pub cost: i64,
}

impl Validation {
    fn illegal() -> Validation {
        Validation {
            is_solution: false,
            cost: -1,
        }
    }
}

/// Replays `actions` from the maze's initial tile and judges the result.
///
/// The walk fails immediately on a wall or out-of-bounds step. Otherwise
/// every destination tile is charged via [`Maze::move_cost`] and the key
/// tile is noted when crossed. The sequence is a solution only if it ends
/// on a goal tile and the key was crossed along the way (or the maze has no
/// key). A legal walk that is not a solution still reports its cost.
pub fn validate(maze: &Maze, actions: &[Action]) -> Validation {
    let mut position = maze.initial();
    let mut cost: i64 = 0;
    let mut key_crossed = false;

    for &action in actions {
        let next = match action.apply(position) {
            Some(next) if maze.in_bounds(next) => next,
            _ => return Validation::illegal(),
        };
        if maze.is_wall(next) {
            return Validation::illegal();
        }
        if maze.is_key(next) {
            key_crossed = true;
        }
        cost += maze.move_cost(next) as i64;
        position = next;
    }

    let is_solution = maze.is_goal(position) && (key_crossed || maze.key().is_none());
    Validation { is_solution, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Maze;

    fn maze() -> Maze {
        Maze::from_rows(&["XXXXXXX", "XI..MKX", "X.....X", "X.X.XGX", "XXXXXXX"]).unwrap()
    }

    #[test]
    fn wall_step_fails_with_sentinel_cost() {
        let m = maze();
        let verdict = validate(&m, &[Action::Up]);
        assert_eq!(
            verdict,
            Validation {
                is_solution: false,
                cost: -1
            }
        );
    }

    #[test]
    fn leaving_the_grid_fails_with_sentinel_cost() {
        // The initial tile sits on the left edge of a borderless row.
        let m = Maze::from_rows(&["IKG"]).unwrap();
        assert_eq!(validate(&m, &[Action::Left]), Validation::illegal());
        assert_eq!(validate(&m, &[Action::Down]), Validation::illegal());
    }

    #[test]
    fn legal_walk_without_goal_reports_cost_only() {
        let m = maze();
        // Two open tiles right of the initial, then back: legal, no goal.
        let verdict = validate(&m, &[Action::Right, Action::Right, Action::Left]);
        assert!(!verdict.is_solution);
        assert_eq!(verdict.cost, 3);
    }

    #[test]
    fn goal_without_key_is_not_a_solution() {
        let m = maze();
        // Along the middle row to the goal column: never crosses K.
        let verdict = validate(
            &m,
            &[
                Action::Down,
                Action::Right,
                Action::Right,
                Action::Right,
                Action::Right,
                Action::Down,
            ],
        );
        assert!(!verdict.is_solution);
        assert_eq!(verdict.cost, 6);
    }

    #[test]
    fn key_then_goal_is_a_solution_with_mud_charged() {
        let m = maze();
        // Along the top through the mud to the key, then down to the goal.
        let verdict = validate(
            &m,
            &[
                Action::Right,
                Action::Right,
                Action::Right,
                Action::Right,
                Action::Down,
                Action::Down,
            ],
        );
        assert!(verdict.is_solution);
        // Three open steps, one mud step, the key, and the goal.
        assert_eq!(verdict.cost, 1 + 1 + 3 + 1 + 1 + 1);
    }

    #[test]
    fn mazes_without_keys_need_only_the_goal() {
        let m = Maze::from_rows(&["XXXX", "XIGX", "XXXX"]).unwrap();
        let verdict = validate(&m, &[Action::Right]);
        assert!(verdict.is_solution);
        assert_eq!(verdict.cost, 1);
    }

    #[test]
    fn empty_sequence_only_solves_a_start_on_goal_maze() {
        let m = maze();
        assert!(!validate(&m, &[]).is_solution);
    }
}
