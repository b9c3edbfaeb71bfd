//! Shared types, constants, and rules for the maze runner game
//!
//! This crate holds everything that decides how the game behaves:
//! maze generation, the movement / timer / win state machine, and the
//! normalization of raw pointer samples into directional intents.
//!
//! The crate is no_std (it only needs `alloc`) so it stays free of any
//! rendering surface, transport, or async runtime. Those live in the
//! session and server crates.

#![no_std]

extern crate alloc;

pub mod game;
pub mod input;
pub mod maze_gen;
pub mod rng;

pub use game::{GameEvent, GameSession, Phase};
pub use input::{direction_from_key, normalize, Debouncer, InputNormalizer, PointerOutcome, PointerSample};
pub use maze_gen::{Cell, Direction, Maze, MazeError, Position};
pub use rng::{MazeRng, SimpleLCG};

/// Maze dimensions (cells)
pub const MAZE_WIDTH: usize = 10;
pub const MAZE_HEIGHT: usize = 8;

/// Largest maze (in cells) the generator will allocate
pub const MAX_CELLS: usize = 1 << 20;

/// Pixel size of one cell on the drawing surface
pub const CELL_SIZE: u32 = 25;

/// Diameter of the player and goal glyphs
pub const PLAYER_SIZE: u32 = 15;

/// Chance (in percent) that the braid pass removes one more wall of a cell
pub const BRAID_PERCENT: usize = 30;

/// Logical pointer input space is INPUT_SPACE x INPUT_SPACE (0..=1023 per axis)
pub const INPUT_SPACE: u32 = 1024;

/// Centre of the pointer input space: 1023 / 2
pub const INPUT_CENTER: f64 = 511.5;

/// Half-width of the dead zone around INPUT_CENTER
pub const DEAD_ZONE: f64 = 50.0;

/// Minimum time between two accepted pointer intents
pub const MOVE_DELAY_MS: u64 = 100;

/// Period of the game timer
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Tunable parameters of one game, defaulting to the constants above
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: u32,
    pub player_size: u32,
    pub braid_percent: usize,
    pub move_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: MAZE_WIDTH,
            height: MAZE_HEIGHT,
            cell_size: CELL_SIZE,
            player_size: PLAYER_SIZE,
            braid_percent: BRAID_PERCENT,
            move_delay_ms: MOVE_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Generate a maze with this configuration's dimensions and braid chance
    pub fn generate_maze<R: MazeRng>(&self, rng: &mut R) -> Result<Maze, MazeError> {
        Maze::try_generate_braided(self.width, self.height, self.braid_percent, rng)
    }
}

/// Format elapsed seconds as `mm:ss`
///
/// Minutes are not capped, so an hour reads as `60:00`.
pub fn format_time(seconds: u32) -> alloc::string::String {
    alloc::format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
