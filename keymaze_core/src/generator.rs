use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Maze, MazeError};

/// Shape and density parameters for random maze generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    /// Probability that an interior tile is a wall.
    pub wall_ratio: f64,
    /// Probability that a non-wall interior tile is mud.
    pub mud_ratio: f64,
    pub with_key: bool,
    pub goal_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            width: 12,
            height: 8,
            wall_ratio: 0.25,
            mud_ratio: 0.15,
            with_key: true,
            goal_count: 1,
        }
    }
}

/// Generates a random maze from a seed.
///
/// The layout is bordered by walls with probabilistic interior walls and
/// mud; the initial tile, the goals, and the key (when requested) land on
/// distinct interior tiles. The same seed and config always produce the
/// same maze. Generated mazes are valid but not necessarily solvable —
/// the solver's explicit no-solution result covers the rest.
///
/// # Panics
///
/// Panics if the configured dimensions leave no room for the special tiles
/// (both dimensions must be at least 4, and `goal_count` at least 1).
pub fn generate(seed: u64, config: &GeneratorConfig) -> Result<Maze, MazeError> {
    let (width, height) = (config.width, config.height);
    let special = 1 + config.goal_count + usize::from(config.with_key);
    assert!(
        width >= 4 && height >= 4,
        "maze dimensions must be at least 4x4"
    );
    assert!(config.goal_count >= 1, "a maze needs at least one goal");
    assert!(
        (width - 2) * (height - 2) >= special,
        "interior too small for the special tiles"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                        'X'
                    } else if rng.random_bool(config.wall_ratio) {
                        'X'
                    } else if rng.random_bool(config.mud_ratio) {
                        'M'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();

    // Special tiles overwrite whatever the density pass placed there.
    let mut taken: Vec<(usize, usize)> = Vec::with_capacity(special);
    let mut place = |rows: &mut Vec<Vec<char>>, rng: &mut StdRng, symbol: char| {
        loop {
            let x = rng.random_range(1..width - 1);
            let y = rng.random_range(1..height - 1);
            if taken.contains(&(x, y)) {
                continue;
            }
            taken.push((x, y));
            rows[y][x] = symbol;
            break;
        }
    };

    place(&mut rows, &mut rng, 'I');
    for _ in 0..config.goal_count {
        place(&mut rows, &mut rng, 'G');
    }
    if config.with_key {
        place(&mut rows, &mut rng, 'K');
    }

    let rows: Vec<String> = rows.into_iter().map(|row| row.into_iter().collect()).collect();
    Maze::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_mazes_parse_and_carry_their_special_tiles() {
        let config = GeneratorConfig {
            goal_count: 2,
            ..GeneratorConfig::default()
        };
        for seed in 0..20 {
            let maze = generate(seed, &config).unwrap();
            assert_eq!(maze.width(), config.width);
            assert_eq!(maze.height(), config.height);
            assert!(maze.key().is_some());
            assert_eq!(maze.goals().len(), 2);
            assert!(!maze.is_wall(maze.initial()));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let config = GeneratorConfig::default();
        let a = generate(42, &config).unwrap();
        let b = generate(42, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn key_is_optional() {
        let config = GeneratorConfig {
            with_key: false,
            ..GeneratorConfig::default()
        };
        let maze = generate(7, &config).unwrap();
        assert_eq!(maze.key(), None);
    }
}
