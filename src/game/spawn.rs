use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::{Position, Snake};

/// Random placement of food and obstacles on the grid.
///
/// Placement is retry-based: pick a random cell, reject it if occupied,
/// try again. Retries are bounded so a crowded grid cannot stall a tick.
#[derive(Debug)]
pub struct Spawner {
    rng: StdRng,
    /// Maximum number of placement attempts per item
    attempts: u32,
}

impl Spawner {
    pub fn new(attempts: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            attempts,
        }
    }

    /// Create a spawner with a fixed seed for reproducible placement
    pub fn with_seed(seed: u64, attempts: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            attempts,
        }
    }

    /// Pick a uniformly random cell on the grid
    pub fn random_position(&mut self, grid_size: usize) -> Position {
        Position::new(
            self.rng.gen_range(0..grid_size as i32),
            self.rng.gen_range(0..grid_size as i32),
        )
    }

    /// Sample a Bernoulli outcome, e.g. whether special food appears
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen_bool(chance)
    }

    /// Try to find a free cell, giving up after the attempt budget.
    /// Returns None if every sampled cell was rejected.
    pub fn place_avoiding<F>(&mut self, grid_size: usize, is_free: F) -> Option<Position>
    where
        F: Fn(Position) -> bool,
    {
        for _ in 0..self.attempts {
            let pos = self.random_position(grid_size);
            if is_free(pos) {
                return Some(pos);
            }
        }
        None
    }

    /// Place normal food away from the snake, obstacles and special food.
    /// If the budget runs out the last resort is an arbitrary cell, so
    /// food is always present even on a nearly full grid.
    pub fn spawn_food(
        &mut self,
        grid_size: usize,
        snake: &Snake,
        obstacles: &[Position],
        special: Option<Position>,
    ) -> Position {
        self.place_avoiding(grid_size, |pos| {
            !snake.occupies(pos) && !obstacles.contains(&pos) && special != Some(pos)
        })
        .unwrap_or_else(|| self.random_position(grid_size))
    }

    /// Place special food away from the snake, obstacles and normal food
    pub fn spawn_special(
        &mut self,
        grid_size: usize,
        snake: &Snake,
        obstacles: &[Position],
        food: Position,
    ) -> Position {
        self.place_avoiding(grid_size, |pos| {
            !snake.occupies(pos) && !obstacles.contains(&pos) && pos != food
        })
        .unwrap_or_else(|| self.random_position(grid_size))
    }

    /// Place up to `target` obstacles, each avoiding the snake, food and
    /// the obstacles placed so far. An obstacle whose budget runs out is
    /// dropped rather than forced onto an occupied cell.
    pub fn spawn_obstacles(
        &mut self,
        target: usize,
        grid_size: usize,
        snake: &Snake,
        food: Position,
        special: Option<Position>,
    ) -> Vec<Position> {
        let mut out: Vec<Position> = Vec::with_capacity(target);
        for _ in 0..target {
            let placed = self.place_avoiding(grid_size, |pos| {
                !snake.occupies(pos)
                    && pos != food
                    && special != Some(pos)
                    && !out.contains(&pos)
            });
            if let Some(pos) = placed {
                out.push(pos);
            }
        }
        out
    }
}
