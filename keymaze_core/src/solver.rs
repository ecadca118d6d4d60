use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::mem;
use std::rc::Rc;

use tracing::debug;

use crate::{Action, Maze, Position};

/// An immutable node in a search tree.
///
/// Each node records the position it stands on, the action that produced it,
/// and a shared link to its parent. Roots carry neither action nor parent.
/// Siblings share their parent, so the tree lives behind `Rc`; a node stays
/// alive exactly as long as it is reachable from the frontier or from a
/// reconstructed path.
#[derive(Debug)]
pub struct SearchNode {
    position: Position,
    action: Option<Action>,
    parent: Option<Rc<SearchNode>>,
}

impl SearchNode {
    /// A phase root: no producing action, no parent.
    pub fn root(position: Position) -> Rc<SearchNode> {
        Rc::new(SearchNode {
            position,
            action: None,
            parent: None,
        })
    }

    /// A child of `parent`, produced by taking `action` onto `position`.
    pub fn child(parent: &Rc<SearchNode>, action: Action, position: Position) -> Rc<SearchNode> {
        Rc::new(SearchNode {
            position,
            action: Some(action),
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Reconstructs the action sequence from the phase root to this node.
    pub fn path(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut node = self;
        while let (Some(action), Some(parent)) = (node.action, node.parent.as_deref()) {
            actions.push(action);
            node = parent;
        }
        actions.reverse();
        actions
    }

    /// Accumulated terrain cost from the phase root to this node.
    ///
    /// Every stepped-onto position is charged, including this node's own;
    /// the root's position is free since nothing stepped onto it.
    pub fn path_cost(&self, maze: &Maze) -> usize {
        let mut cost = 0;
        let mut node = self;
        while let Some(parent) = node.parent.as_deref() {
            cost += maze.move_cost(node.position);
            node = parent;
        }
        cost
    }

    /// The frontier ranking key: path cost plus the phase heuristic.
    pub fn total_cost(&self, maze: &Maze, key_found: bool) -> usize {
        self.path_cost(maze) + maze.heuristic(self.position, key_found)
    }
}

/// A frontier entry pairing a node with its precomputed rank.
///
/// `BinaryHeap` is a max-heap, so `Ord` is reversed to pop the lowest rank
/// first. Rank ties fall back to insertion order (`seq`), which keeps
/// expansion reproducible.
#[derive(Debug)]
struct FrontierEntry {
    rank: usize,
    seq: u64,
    node: Rc<SearchNode>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Two-phase weighted best-first search over a maze.
///
/// The search runs in up to two phases: seek the key (skipped when the maze
/// has none), then seek any goal from the key tile. Each phase builds its
/// own node tree; capturing the key discards the frontier, clears the
/// exclusion set, and re-roots at the key tile. The returned sequence is
/// the key-phase path concatenated with the goal-phase path.
///
/// Frontier order is accumulated cost plus a Manhattan estimate to the
/// current target. The estimate ignores mud, so it can undershoot true
/// cost; returned paths are best-effort, not provably optimal. Disable the
/// estimate with [`Solver::without_heuristic`] for pure cost ordering.
#[derive(Debug)]
pub struct Solver<'a> {
    maze: &'a Maze,
    use_heuristic: bool,
}

impl<'a> Solver<'a> {
    pub fn new(maze: &'a Maze) -> Solver<'a> {
        Solver {
            maze,
            use_heuristic: true,
        }
    }

    /// Ranks frontier nodes by accumulated cost alone.
    pub fn without_heuristic(mut self) -> Solver<'a> {
        self.use_heuristic = false;
        self
    }

    fn rank(&self, node: &SearchNode, key_found: bool) -> usize {
        if self.use_heuristic {
            node.total_cost(self.maze, key_found)
        } else {
            node.path_cost(self.maze)
        }
    }

    /// Runs the search to completion.
    ///
    /// Returns the action sequence reaching a goal (after the key, when one
    /// exists), or `None` once the frontier drains without reaching one.
    pub fn run(&self) -> Option<Vec<Action>> {
        let maze = self.maze;
        // Session state, fresh per run. With no key in the maze the key
        // phase is already satisfied and the search is single-phase.
        let mut key_found = maze.key().is_none();
        let mut excluded: HashSet<Position> = HashSet::new();
        let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let mut seq: u64 = 0;
        let mut prefix: Vec<Action> = Vec::new();

        let root = SearchNode::root(maze.initial());
        frontier.push(FrontierEntry {
            rank: self.rank(&root, key_found),
            seq,
            node: root,
        });
        seq += 1;

        while let Some(entry) = frontier.pop() {
            let node = entry.node;
            for (action, next) in maze.transitions(node.position()) {
                if excluded.contains(&next) {
                    continue;
                }
                let child = SearchNode::child(&node, action, next);

                if !key_found && maze.is_key(next) {
                    // Key captured: keep the path so far as the solution
                    // prefix, then restart the search from the key tile.
                    // The flag flips and the exclusions clear before the
                    // new root is seeded, and it is seeded exactly once.
                    prefix = child.path();
                    key_found = true;
                    excluded.clear();
                    frontier.clear();
                    let reroot = SearchNode::root(next);
                    frontier.push(FrontierEntry {
                        rank: self.rank(&reroot, key_found),
                        seq,
                        node: reroot,
                    });
                    seq += 1;
                    debug!(
                        x = next.x,
                        y = next.y,
                        prefix_len = prefix.len(),
                        "key captured, rerooting search"
                    );
                    break;
                }

                if key_found && maze.is_goal(next) {
                    let mut solution = mem::take(&mut prefix);
                    solution.extend(child.path());
                    debug!(len = solution.len(), "goal reached");
                    return Some(solution);
                }

                // Visited avoidance, not strict visited tracking: the
                // expanded parent is barred from re-expansion once it
                // produces a non-key child.
                if !maze.is_key(next) {
                    excluded.insert(node.position());
                }

                frontier.push(FrontierEntry {
                    rank: self.rank(&child, key_found),
                    seq,
                    node: child,
                });
                seq += 1;
            }
        }

        debug!("frontier exhausted without reaching a goal");
        None
    }
}

/// Searches `maze` with the default heuristic-weighted ordering.
pub fn solve(maze: &Maze) -> Option<Vec<Action>> {
    Solver::new(maze).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Maze;

    fn maze() -> Maze {
        Maze::from_rows(&["XXXXXXX", "XI...KX", "X.M...X", "X.X.XGX", "XXXXXXX"]).unwrap()
    }

    #[test]
    fn root_has_empty_path_and_zero_cost() {
        let m = maze();
        let root = SearchNode::root(m.initial());
        assert!(root.path().is_empty());
        assert_eq!(root.path_cost(&m), 0);
    }

    #[test]
    fn path_walks_back_to_the_root() {
        let root = SearchNode::root(Position::new(1, 1));
        let a = SearchNode::child(&root, Action::Right, Position::new(2, 1));
        let b = SearchNode::child(&a, Action::Down, Position::new(2, 2));
        assert_eq!(a.path(), vec![Action::Right]);
        assert_eq!(b.path(), vec![Action::Right, Action::Down]);
    }

    #[test]
    fn path_cost_charges_every_step_but_not_the_root() {
        let m = maze();
        let root = SearchNode::root(Position::new(1, 1));
        let a = SearchNode::child(&root, Action::Right, Position::new(2, 1));
        // (2, 2) is mud.
        let b = SearchNode::child(&a, Action::Down, Position::new(2, 2));
        assert_eq!(a.path_cost(&m), 1);
        assert_eq!(b.path_cost(&m), 4);
    }

    #[test]
    fn total_cost_adds_the_phase_heuristic() {
        let m = maze();
        let root = SearchNode::root(Position::new(1, 1));
        let a = SearchNode::child(&root, Action::Right, Position::new(2, 1));
        // Key at (5, 1) is 3 away; goal at (5, 3) is 5 away.
        assert_eq!(a.total_cost(&m, false), 1 + 3);
        assert_eq!(a.total_cost(&m, true), 1 + 5);
    }

    #[test]
    fn frontier_pops_lowest_rank_first() {
        let m = maze();
        let mut heap = BinaryHeap::new();
        for (seq, rank) in [(0u64, 9usize), (1, 2), (2, 5)] {
            heap.push(FrontierEntry {
                rank,
                seq,
                node: SearchNode::root(m.initial()),
            });
        }
        assert_eq!(heap.pop().unwrap().rank, 2);
        assert_eq!(heap.pop().unwrap().rank, 5);
        assert_eq!(heap.pop().unwrap().rank, 9);
    }

    #[test]
    fn frontier_breaks_rank_ties_by_insertion_order() {
        let m = maze();
        let mut heap = BinaryHeap::new();
        for seq in [3u64, 1, 2] {
            heap.push(FrontierEntry {
                rank: 7,
                seq,
                node: SearchNode::root(m.initial()),
            });
        }
        assert_eq!(heap.pop().unwrap().seq, 1);
        assert_eq!(heap.pop().unwrap().seq, 2);
        assert_eq!(heap.pop().unwrap().seq, 3);
    }
}
