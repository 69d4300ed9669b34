use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the starting grid (the board is square)
    pub base_grid_size: usize,
    /// Cells added to the grid side on each level-up
    pub grid_growth: usize,
    /// Largest side length the grid may reach
    pub max_grid_size: usize,
    /// Starting length of the snake
    pub initial_snake_length: usize,

    // Scoring
    /// Points for eating normal food
    pub food_points: u32,
    /// Points for eating special food
    pub special_food_points: u32,
    /// Points needed to advance one level
    pub points_per_level: u32,

    // Timing
    /// Movement tick length before any level speedup, in milliseconds
    pub base_tick_ms: u64,
    /// Milliseconds shaved off the movement tick per level
    pub tick_step_ms: u64,
    /// Shortest allowed movement tick, in milliseconds
    pub min_tick_ms: u64,
    /// Milliseconds between special-food spawn attempts
    pub special_spawn_interval_ms: u64,
    /// Chance that a spawn attempt actually produces special food
    pub special_spawn_chance: f64,
    /// How long special food stays on the board before despawning, in milliseconds
    pub special_lifetime_ms: u64,
    /// How long the level-up banner stays visible, in milliseconds
    pub level_banner_ms: u64,

    // Spawning
    /// Retry cap when looking for an unoccupied cell
    pub spawn_attempts: u32,
    /// Obstacles added per level past the first
    pub obstacles_per_level: usize,
    /// Ceiling on the obstacle count as a fraction of the cell count
    pub max_obstacle_density: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_grid_size: 20,
            grid_growth: 2,
            max_grid_size: 40,
            initial_snake_length: 1,
            food_points: 1,
            special_food_points: 10,
            points_per_level: 10,
            base_tick_ms: 200,
            tick_step_ms: 10,
            min_tick_ms: 50,
            special_spawn_interval_ms: 8_000,
            special_spawn_chance: 0.3,
            special_lifetime_ms: 5_000,
            level_banner_ms: 2_000,
            spawn_attempts: 100,
            obstacles_per_level: 2,
            max_obstacle_density: 0.1,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom starting grid
    pub fn new(base_grid_size: usize) -> Self {
        Self {
            base_grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Length of one movement tick at the given level.
    ///
    /// The tick shrinks by `tick_step_ms` per level and bottoms out at
    /// `min_tick_ms`.
    pub fn tick_interval(&self, level: u32) -> Duration {
        let ms = self
            .base_tick_ms
            .saturating_sub(self.tick_step_ms * u64::from(level))
            .max(self.min_tick_ms);
        Duration::from_millis(ms)
    }

    /// Interval between special-food spawn attempts
    pub fn special_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.special_spawn_interval_ms)
    }

    /// Lifetime of special food once it appears
    pub fn special_lifetime(&self) -> Duration {
        Duration::from_millis(self.special_lifetime_ms)
    }

    /// How long the level-up banner stays on screen
    pub fn level_banner_duration(&self) -> Duration {
        Duration::from_millis(self.level_banner_ms)
    }

    /// Grid side length at the given level, capped at `max_grid_size`
    pub fn grid_size_for(&self, level: u32) -> usize {
        let grown = self.base_grid_size + self.grid_growth * (level.saturating_sub(1) as usize);
        grown.min(self.max_grid_size)
    }

    /// How many obstacles the given level should carry on a grid of the
    /// given side length. Level 1 has none; the count is bounded by a
    /// fraction of the total cell count so dense boards stay playable.
    pub fn obstacle_target(&self, level: u32, grid_size: usize) -> usize {
        if level <= 1 {
            return 0;
        }
        let scaled = (level as usize - 1) * self.obstacles_per_level;
        let cap = (grid_size * grid_size) as f64 * self.max_obstacle_density;
        scaled.min(cap as usize)
    }
}
