//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering
//! dependencies, so it can be driven and tested headlessly.

pub mod action;
pub mod config;
pub mod engine;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use spawn::Spawner;
pub use state::{CollisionKind, Food, FoodKind, GameState, Phase, Position, Snake};
