use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The two kinds of food that can appear on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    /// Ordinary food, worth one point, always present
    Normal,
    /// Timed bonus food, worth ten points, despawns if uneaten
    Special,
}

/// A food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub pos: Position,
    pub kind: FoodKind,
}

impl Food {
    pub fn normal(pos: Position) -> Self {
        Self {
            pos,
            kind: FoodKind::Normal,
        }
    }

    pub fn special(pos: Position) -> Self {
        Self {
            pos,
            kind: FoodKind::Special,
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given head position and direction.
    /// Extra segments trail behind the head, opposite the direction.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position lies on any segment, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move snake in current direction, growing if should_grow is true
    pub fn advance(&mut self, should_grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What the snake's head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Snake left the grid
    Wall,
    /// Snake hit an obstacle
    Obstacle,
    /// Snake hit its own body
    SelfHit,
}

/// Where a game session currently stands.
///
/// `Ready` shows the start screen until the first directional input,
/// `GameOver` is a normal terminal state that a restart leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub special_food: Option<Food>,
    pub obstacles: Vec<Position>,
    pub score: u32,
    pub level: u32,
    /// Side length of the (square) grid; grows with the level
    pub grid_size: usize,
    pub phase: Phase,
}

impl GameState {
    /// Create a fresh state waiting for the first input
    pub fn new(snake: Snake, food: Food, grid_size: usize) -> Self {
        Self {
            snake,
            food,
            special_food: None,
            obstacles: Vec::new(),
            score: 0,
            level: 1,
            grid_size,
            phase: Phase::Ready,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_size as i32
            && pos.y >= 0
            && pos.y < self.grid_size as i32
    }

    /// Whether the simulation is actively ticking
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Leave the start screen and begin play
    pub fn start(&mut self) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Running;
        }
    }

    /// Flip between Running and Paused; other phases are unaffected
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// End the run
    pub fn finish(&mut self) {
        self.phase = Phase::GameOver;
    }
}
