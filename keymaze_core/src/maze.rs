use serde::{Deserialize, Serialize};

use crate::{Action, Position, map::Grid};

/// Static classification of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Open,
    Wall,
    /// Costs 3 to step onto instead of 1.
    Mud,
    Key,
    Goal,
    Initial,
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::Open
    }
}

impl Terrain {
    /// Parses a single layout character.
    fn from_symbol(symbol: char) -> Option<Terrain> {
        match symbol {
            '.' => Some(Terrain::Open),
            'X' => Some(Terrain::Wall),
            'M' => Some(Terrain::Mud),
            'K' => Some(Terrain::Key),
            'G' => Some(Terrain::Goal),
            'I' => Some(Terrain::Initial),
            _ => None,
        }
    }
}

/// Errors raised while constructing a [`Maze`] from a textual layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze layout is empty")]
    EmptyLayout,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized tile '{symbol}' at ({x}, {y})")]
    UnknownTile { symbol: char, x: usize, y: usize },
    #[error("maze has no initial tile 'I'")]
    MissingInitial,
    #[error("maze has more than one initial tile 'I'")]
    DuplicateInitial,
    #[error("maze has more than one key tile 'K'")]
    DuplicateKey,
    #[error("maze has no goal tile 'G'")]
    MissingGoal,
}

/// An immutable maze: terrain plus the initial, key, and goal positions.
///
/// The maze is a read-only terrain oracle. It answers legality, cost, and
/// membership queries; all search bookkeeping lives with the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    terrain: Grid<Terrain>,
    initial: Position,
    key: Option<Position>,
    goals: Vec<Position>,
}

impl Maze {
    /// Parses a maze from layout rows.
    ///
    /// Each row is a string of tile symbols: `X` wall, `.` open, `M` mud,
    /// `I` initial (exactly one), `K` key (at most one), `G` goal (at least
    /// one). Rows must all have the same length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Maze, MazeError> {
        if rows.is_empty() {
            return Err(MazeError::EmptyLayout);
        }
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(MazeError::EmptyLayout);
        }
        let height = rows.len();

        let mut terrain = Grid::new(width, height);
        let mut initial = None;
        let mut key = None;
        let mut goals = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let mut count = 0;
            for (x, symbol) in row.as_ref().chars().enumerate() {
                count += 1;
                if x >= width {
                    continue;
                }
                let position = Position::new(x, y);
                let tile = Terrain::from_symbol(symbol)
                    .ok_or(MazeError::UnknownTile { symbol, x, y })?;
                match tile {
                    Terrain::Initial => {
                        if initial.replace(position).is_some() {
                            return Err(MazeError::DuplicateInitial);
                        }
                    }
                    Terrain::Key => {
                        if key.replace(position).is_some() {
                            return Err(MazeError::DuplicateKey);
                        }
                    }
                    Terrain::Goal => goals.push(position),
                    _ => {}
                }
                terrain[position] = tile;
            }
            if count != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: count,
                });
            }
        }

        let initial = initial.ok_or(MazeError::MissingInitial)?;
        if goals.is_empty() {
            return Err(MazeError::MissingGoal);
        }

        Ok(Maze {
            terrain,
            initial,
            key,
            goals,
        })
    }

    /// Parses a maze from a whole layout text, one row per line.
    ///
    /// Surrounding whitespace on each line is ignored, as are blank lines.
    pub fn parse(layout: &str) -> Result<Maze, MazeError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Maze::from_rows(&rows)
    }

    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    pub fn initial(&self) -> Position {
        self.initial
    }

    /// The key position, if the maze has one.
    pub fn key(&self) -> Option<Position> {
        self.key
    }

    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    pub fn terrain_at(&self, position: Position) -> Option<Terrain> {
        self.terrain.get(position.x, position.y).copied()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.terrain.in_bounds(position.x, position.y)
    }

    pub fn is_wall(&self, position: Position) -> bool {
        self.terrain_at(position) == Some(Terrain::Wall)
    }

    pub fn is_goal(&self, position: Position) -> bool {
        self.goals.contains(&position)
    }

    pub fn is_key(&self, position: Position) -> bool {
        self.key == Some(position)
    }

    /// Cost of stepping *onto* this tile: 3 for mud, 1 otherwise.
    ///
    /// Cost is attributed to the destination of a move, never the source.
    pub fn move_cost(&self, position: Position) -> usize {
        match self.terrain_at(position) {
            Some(Terrain::Mud) => 3,
            _ => 1,
        }
    }

    /// Legal moves out of a position, in the fixed order Up, Down, Left,
    /// Right.
    ///
    /// A move is legal when the neighbor is in bounds and not a wall.
    pub fn transitions(&self, from: Position) -> Vec<(Action, Position)> {
        let mut moves = Vec::with_capacity(4);
        for action in Action::ALL {
            let Some(next) = action.apply(from) else {
                continue;
            };
            if !self.in_bounds(next) || self.is_wall(next) {
                continue;
            }
            moves.push((action, next));
        }
        moves
    }

    /// Manhattan estimate to the current search target.
    ///
    /// Before the key is found the target is the key tile; afterwards it is
    /// the nearest goal. Mud is invisible to the estimate, so it can
    /// undershoot the true remaining cost; paths ranked by it are
    /// best-effort rather than provably optimal.
    pub fn heuristic(&self, from: Position, key_found: bool) -> usize {
        if key_found {
            self.goals
                .iter()
                .map(|goal| from.manhattan(*goal))
                .min()
                .unwrap_or(0)
        } else {
            self.key.map_or(0, |key| from.manhattan(key))
        }
    }
}
