use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Minimum travel, in grid cells, before a drag counts as a swipe
const SWIPE_CELLS: i32 = 3;

/// Turns mouse drags into swipe directions.
///
/// A press records the origin; the matching release measures how far the
/// pointer travelled. Short drags are ignored, longer ones resolve to
/// the dominant axis.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self { origin: None }
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (ox, oy) = self.origin.take()?;
                // Grid cells are two columns wide, so halve horizontal travel
                let dx = (event.column as i32 - ox as i32) / 2;
                let dy = event.row as i32 - oy as i32;

                if dx.abs() < SWIPE_CELLS && dy.abs() < SWIPE_CELLS {
                    return None;
                }

                if dx.abs() > dy.abs() {
                    Some(if dx > 0 { Direction::Right } else { Direction::Left })
                } else {
                    Some(if dy > 0 { Direction::Down } else { Direction::Up })
                }
            }
            _ => None,
        }
    }
}
