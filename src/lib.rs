//! Gopher Run - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (mode machine, physics, terrain, collisions)
//! - `settings`: Immutable engine configuration
//!
//! Rendering, audio and input plumbing live with the host. Each frame the host
//! hands a [`sim::TickInput`] to [`sim::tick`] and draws the resulting
//! [`sim::Scene`].

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, PhysicsSettings, Settings, TerrainSettings};
pub use sim::{GameEvent, GameState, Mode, Scene, TickInput, TickOutcome, tick};

/// Game configuration defaults
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: u32 = 320;
    pub const SCREEN_HEIGHT: u32 = 180;
    /// Tile edge in pixels (tiles are square)
    pub const TILE_SIZE: u32 = 16;

    /// Fractional bits of the fixed-point representation (1/64 px)
    pub const FIXED_FRAC_BITS: u32 = 6;
    /// Largest screen, tile or per-frame distance accepted, in pixels.
    /// Keeps every 26.6 sum in the frame loop well inside `i32`.
    pub const MAX_EXTENT_PX: u32 = 1 << 16;

    /// Physics defaults, in pixels and pixels/frame
    pub const GRAVITY: f32 = 1.5;
    pub const MAX_FALL_SPEED: f32 = 8.0;
    pub const RISING_POWER: f32 = 5.5;
    pub const INITIAL_RUN_SPEED: f32 = 1.0 / 3.0;
    pub const RUN_ACCELERATION: f32 = 1.0 / 40.0;
    pub const MAX_RUN_SPEED: f32 = 3.0;
    /// Character never moves horizontally on screen; the world scrolls
    pub const CHARACTER_X: f32 = 64.0;
    pub const CHARACTER_START_Y: f32 = 128.0;
    pub const RISING_FRAMES: u32 = 10;
    /// Frames each walk-cycle pose is held
    pub const WALK_FRAME_TICKS: u32 = 10;

    /// Terrain defaults
    pub const TERRAIN_SEED: u64 = 114514;
    pub const TITLE_GROUND_HEIGHT: i32 = 10;
    pub const MIN_GROUND_HEIGHT: i32 = 4;
    pub const MAX_GROUND_HEIGHT: i32 = 10;
    pub const INITIAL_GROUND_RUN: i32 = 5;
}

/// Number of tiles needed to cover `extent` pixels, plus one for the
/// partially scrolled-in column/row.
#[inline]
pub fn tiles_to_cover(extent: u32, tile_size: u32) -> usize {
    (extent.div_ceil(tile_size) + 1) as usize
}
