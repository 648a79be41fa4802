use std::time::Duration;

// The board is a fixed pixel canvas divided into square cells. The terminal
// renderer maps one cell to one character, but the grid dimensions are
// derived from the canvas, not from the terminal.
pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;
pub const CELL_SIZE: u32 = 20;

pub const GRID_WIDTH: i32 = (CANVAS_WIDTH / CELL_SIZE) as i32;
pub const GRID_HEIGHT: i32 = (CANVAS_HEIGHT / CELL_SIZE) as i32;

/// Minimum time between two snake steps, regardless of frame rate.
pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 6);
