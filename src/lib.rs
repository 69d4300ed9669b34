//! Neon Snake - a level-based snake game for the terminal
//!
//! This library provides:
//! - Core game logic (game module)
//! - Keyboard and mouse input mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
