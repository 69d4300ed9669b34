use super::{
    action::{Action, Direction},
    config::GameConfig,
    spawn::Spawner,
    state::{CollisionKind, Food, GameState, Phase, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate normal food this step
    pub ate_food: bool,
    /// Whether the snake ate special food this step
    pub ate_special: bool,
    /// Kind of collision if one occurred
    pub collision: Option<CollisionKind>,
    /// New level if a level threshold was crossed this step
    pub leveled_up: Option<u32>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    spawner: Spawner,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let spawner = Spawner::new(config.spawn_attempts);
        Self { config, spawner }
    }

    /// Create an engine whose placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let spawner = Spawner::with_seed(seed, config.spawn_attempts);
        Self { config, spawner }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let grid_size = self.config.base_grid_size;
        let center = (grid_size / 2) as i32;

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawner.spawn_food(grid_size, &snake, &[], None);

        GameState::new(snake, Food::normal(food), grid_size)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_running() {
            return StepResult {
                terminated: state.phase == Phase::GameOver,
                info: StepInfo::default(),
            };
        }

        // Update direction based on action (prevent 180° turns)
        match action {
            Action::Move(new_direction) => {
                if !state.snake.direction.is_opposite(new_direction) {
                    state.snake.direction = new_direction;
                }
            }
            Action::Continue => {
                // Keep current direction
            }
        }

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Check for collisions
        if let Some(collision) = self.check_collision(state, new_head) {
            state.finish();

            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision: Some(collision),
                    ..StepInfo::default()
                },
            };
        }

        // Check what the snake ate; either kind of food grows it
        let ate_food = new_head == state.food.pos;
        let ate_special = state.special_food.map(|f| f.pos) == Some(new_head);

        state.snake.advance(ate_food || ate_special);

        // Update score and spawn new food if needed
        let prev_score = state.score;

        if ate_food {
            state.score += self.config.food_points;
            let pos = self.spawner.spawn_food(
                state.grid_size,
                &state.snake,
                &state.obstacles,
                state.special_food.map(|f| f.pos),
            );
            state.food = Food::normal(pos);
        }

        if ate_special {
            state.score += self.config.special_food_points;
            state.special_food = None;
        }

        let leveled_up = self.apply_level_progress(state, prev_score);

        StepResult {
            terminated: false,
            info: StepInfo {
                ate_food,
                ate_special,
                collision: None,
                leveled_up,
            },
        }
    }

    /// Offer to place special food on the board. Nothing happens if the
    /// game is not running or a special is already out; otherwise a
    /// weighted coin decides. Returns true if food was placed.
    pub fn try_spawn_special(&mut self, state: &mut GameState) -> bool {
        if !state.is_running() || state.special_food.is_some() {
            return false;
        }
        if !self.spawner.roll(self.config.special_spawn_chance) {
            return false;
        }

        let pos = self.spawner.spawn_special(
            state.grid_size,
            &state.snake,
            &state.obstacles,
            state.food.pos,
        );
        state.special_food = Some(Food::special(pos));
        true
    }

    /// Advance the level when the score crosses a ten-point threshold.
    /// Levelling grows the grid and deals a fresh set of obstacles.
    fn apply_level_progress(&mut self, state: &mut GameState, prev_score: u32) -> Option<u32> {
        let pts = self.config.points_per_level;
        if state.score / pts <= prev_score / pts {
            return None;
        }

        state.level = state.score / pts + 1;
        state.grid_size = self.config.grid_size_for(state.level);

        let target = self.config.obstacle_target(state.level, state.grid_size);
        state.obstacles = self.spawner.spawn_obstacles(
            target,
            state.grid_size,
            &state.snake,
            state.food.pos,
            state.special_food.map(|f| f.pos),
        );

        Some(state.level)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionKind> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionKind::Wall);
        }

        // Check obstacle collision
        if state.obstacles.contains(&pos) {
            return Some(CollisionKind::Obstacle);
        }

        // Check self-collision
        if state.snake.collides_with_body(pos) {
            return Some(CollisionKind::SelfHit);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_engine() -> (GameEngine, GameState) {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        let mut state = engine.reset();
        state.start();
        (engine, state)
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        let state = engine.reset();

        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.grid_size, 20);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.direction, Direction::Right);
        assert!(state.special_food.is_none());
        assert!(state.obstacles.is_empty());
        assert!(state.is_in_bounds(state.food.pos));
        assert!(!state.snake.occupies(state.food.pos));
    }

    #[test]
    fn test_first_step_moves_head_right() {
        let (mut engine, mut state) = running_engine();
        // Keep the food out of the way for this check
        state.food = Food::normal(Position::new(0, 0));

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_length_unchanged_without_food() {
        let (mut engine, mut state) = running_engine();
        state.food = Food::normal(Position::new(0, 0));
        let initial_length = state.snake.len();

        for _ in 0..5 {
            let result = engine.step(&mut state, Action::Continue);
            assert!(!result.terminated);
            assert!(!result.info.ate_food);
            assert_eq!(state.snake.len(), initial_length);
        }
    }

    #[test]
    fn test_food_consumption() {
        let (mut engine, mut state) = running_engine();

        // Place food directly in front of snake
        let head = state.snake.head();
        state.food = Food::normal(head.moved_in_direction(state.snake.direction));
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_food);
        assert!(!result.info.ate_special);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        // Food respawns somewhere off the snake
        assert!(!state.snake.occupies(state.food.pos));
        assert!(state.is_in_bounds(state.food.pos));
    }

    #[test]
    fn test_special_food_consumption() {
        let (mut engine, mut state) = running_engine();

        let head = state.snake.head();
        state.food = Food::normal(Position::new(0, 0));
        state.special_food = Some(Food::special(
            head.moved_in_direction(state.snake.direction),
        ));
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_special);
        assert!(!result.info.ate_food);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(state.special_food.is_none());
        // Ten points always crosses a level threshold
        assert_eq!(result.info.leveled_up, Some(2));
    }

    #[test]
    fn test_level_up_at_ten_points() {
        let (mut engine, mut state) = running_engine();
        state.score = 9;

        let head = state.snake.head();
        state.food = Food::normal(head.moved_in_direction(state.snake.direction));

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(state.score, 10);
        assert_eq!(result.info.leveled_up, Some(2));
        assert_eq!(state.level, 2);
        assert_eq!(state.grid_size, 22);
        assert_eq!(state.obstacles.len(), 2);
        for pos in &state.obstacles {
            assert!(!state.snake.occupies(*pos));
            assert_ne!(*pos, state.food.pos);
        }
    }

    #[test]
    fn test_no_level_up_below_threshold() {
        let (mut engine, mut state) = running_engine();
        state.score = 5;

        let head = state.snake.head();
        state.food = Food::normal(head.moved_in_direction(state.snake.direction));

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(state.score, 6);
        assert_eq!(result.info.leveled_up, None);
        assert_eq!(state.level, 1);
        assert_eq!(state.grid_size, 20);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Food::normal(Position::new(5, 5)),
            10,
        );
        state.start();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(result.info.collision, Some(CollisionKind::Wall));
    }

    #[test]
    fn test_obstacle_collision() {
        let (mut engine, mut state) = running_engine();
        state.food = Food::normal(Position::new(0, 0));

        let head = state.snake.head();
        state.obstacles = vec![head.moved_in_direction(state.snake.direction)];

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionKind::Obstacle));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);

        // Snake at (5, 5) going Right with length 4
        // Body: (5,5), (4,5), (3,5), (2,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        let mut state = GameState::new(snake, Food::normal(Position::new(8, 8)), 10);
        state.start();

        // Move in a pattern that will cause self-collision:
        // Right: (6,5), (5,5), (4,5), (3,5)
        engine.step(&mut state, Action::Continue);
        // Down: (6,6), (6,5), (5,5), (4,5)
        engine.step(&mut state, Action::Move(Direction::Down));
        // Left: (5,6), (6,6), (6,5), (5,5)
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up: (5,5) - this should collide with body at (5,5)!
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionKind::SelfHit));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let (mut engine, mut state) = running_engine();
        state.food = Food::normal(Position::new(0, 0));
        state.snake.direction = Direction::Right;

        // Try to turn 180 degrees (should be ignored)
        engine.step(&mut state, Action::Move(Direction::Left));

        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_step_is_noop_unless_running() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        let mut state = engine.reset();
        let before = state.clone();

        let result = engine.step(&mut state, Action::Continue);
        assert!(!result.terminated);
        assert_eq!(state, before);

        state.finish();
        let result = engine.step(&mut state, Action::Continue);
        assert!(result.terminated);
        assert_eq!(state.snake, before.snake);
    }

    #[test]
    fn test_special_spawn_respects_occupancy() {
        let (mut engine, mut state) = running_engine();

        // Keep offering until the coin lands heads
        let mut spawned = false;
        for _ in 0..200 {
            if engine.try_spawn_special(&mut state) {
                spawned = true;
                break;
            }
        }
        assert!(spawned);

        let special = state.special_food.unwrap();
        assert!(state.is_in_bounds(special.pos));
        assert!(!state.snake.occupies(special.pos));
        assert_ne!(special.pos, state.food.pos);

        // No second special while one is on the board
        assert!(!engine.try_spawn_special(&mut state));
    }

    #[test]
    fn test_special_spawn_requires_running_game() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        let mut state = engine.reset();

        for _ in 0..200 {
            assert!(!engine.try_spawn_special(&mut state));
        }
        assert!(state.special_food.is_none());
    }

    #[test]
    fn test_head_in_bounds_until_termination() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 7);
        let mut state = engine.reset();
        state.start();

        // Tight clockwise turning; ends in a self-hit once the snake grows
        let turns = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ];
        for i in 0..500 {
            let result = engine.step(&mut state, Action::Move(turns[i % 4]));
            if result.terminated {
                break;
            }
            assert!(state.is_in_bounds(state.snake.head()));
        }
    }

    #[test]
    fn test_eating_both_foods_in_one_step() {
        let (mut engine, mut state) = running_engine();

        // Both foods stacked on the cell the head enters next
        let target = state.snake.head().moved_in_direction(state.snake.direction);
        state.food = Food::normal(target);
        state.special_food = Some(Food::special(target));
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_food);
        assert!(result.info.ate_special);
        assert_eq!(state.score, 11);
        // One cell of growth even though both were eaten
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(state.special_food.is_none());
        assert_eq!(result.info.leveled_up, Some(2));
    }

    #[test]
    fn test_eating_both_foods_jumps_two_levels() {
        let (mut engine, mut state) = running_engine();
        state.score = 9;

        let target = state.snake.head().moved_in_direction(state.snake.direction);
        state.food = Food::normal(target);
        state.special_food = Some(Food::special(target));

        let result = engine.step(&mut state, Action::Continue);

        // 9 + 1 + 10 clears both the 10 and 20 point marks in one move
        assert_eq!(state.score, 20);
        assert_eq!(result.info.leveled_up, Some(3));
        assert_eq!(state.level, 3);
        assert_eq!(state.grid_size, 24);
        assert_eq!(state.obstacles.len(), 4);
    }
}
