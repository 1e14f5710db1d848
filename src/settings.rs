//! Engine settings
//!
//! Everything the simulation used to keep in package-level globals: screen and
//! tile geometry, physics constants and terrain tuning. Settings are validated
//! once and then owned, read-only, by the session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::fixed::Fixed;
use crate::sim::scene::WALK_CYCLE;
use crate::tiles_to_cover;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile size must be non-zero")]
    ZeroTileSize,
    #[error("screen must be at least one tile in each direction ({width}x{height})")]
    ScreenTooSmall { width: u32, height: u32 },
    #[error("ground band {min}..={max} does not fit in {rows} rows")]
    GroundBand { min: i32, max: i32, rows: usize },
    #[error("title ground height {height} is outside the grid ({rows} rows)")]
    TitleGround { height: i32, rows: usize },
    #[error("character at x={x}px needs a look-ahead column inside {width}px")]
    CharacterOutOfGrid { x: f32, width: u32 },
    #[error("{name} must be in [0, 1], got {value}")]
    Probability { name: &'static str, value: f32 },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroCap { name: &'static str },
    #[error("{name} must be at most {max}, got {value}")]
    TooLarge {
        name: &'static str,
        value: u64,
        max: u64,
    },
    #[error("{name} must be finite and in [{min}, {max}] px, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("invalid distribution: {0}")]
    Distribution(String),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Physics constants in pixel units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration once the rise has ended (px/frame²)
    pub gravity: f32,
    /// Terminal fall speed (px/frame)
    pub max_fall_speed: f32,
    /// Upward speed while the jump is held (px/frame)
    pub rising_power: f32,
    /// Scroll speed on the title screen and at the start of a run
    pub initial_run_speed: f32,
    pub run_acceleration: f32,
    pub max_run_speed: f32,
    /// Fixed screen x of the character's left edge
    pub character_x: f32,
    pub character_start_y: f32,
    /// Frames a held jump keeps rising
    pub rising_frames: u32,
    pub walk_frame_ticks: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            rising_power: RISING_POWER,
            initial_run_speed: INITIAL_RUN_SPEED,
            run_acceleration: RUN_ACCELERATION,
            max_run_speed: MAX_RUN_SPEED,
            character_x: CHARACTER_X,
            character_start_y: CHARACTER_START_Y,
            rising_frames: RISING_FRAMES,
            walk_frame_ticks: WALK_FRAME_TICKS,
        }
    }
}

/// Terrain generator tuning
///
/// Heights are row indices where solid ground begins, so a smaller value is
/// a taller plateau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Seed used every time a run starts
    pub seed: u64,
    pub title_ground_height: i32,
    pub min_ground_height: i32,
    pub max_ground_height: i32,
    /// Columns of flat ground before the first terrain decision
    pub initial_run: i32,
    /// Chance that a decision opens a hole
    pub hole_chance: f32,
    /// Mean of the exponential hole length
    pub hole_mean_run: f64,
    pub max_hole_run: i32,
    /// Draws below this lower the ground row (raise the plateau)
    pub lower_chance: f32,
    /// Draws at or above this raise the ground row (drop the plateau)
    pub raise_threshold: f32,
    /// Mean of the exponential height step
    pub height_step_mean: f64,
    pub max_height_step: i32,
    /// Normal distribution of plateau lengths
    pub run_mean: f64,
    pub run_std_dev: f64,
    pub max_run: i32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            seed: TERRAIN_SEED,
            title_ground_height: TITLE_GROUND_HEIGHT,
            min_ground_height: MIN_GROUND_HEIGHT,
            max_ground_height: MAX_GROUND_HEIGHT,
            initial_run: INITIAL_GROUND_RUN,
            hole_chance: 0.17,
            hole_mean_run: 1.5,
            max_hole_run: 4,
            lower_chance: 0.18,
            raise_threshold: 0.82,
            height_step_mean: 1.0,
            max_height_step: 4,
            run_mean: 3.0,
            run_std_dev: 2.0,
            max_run: 8,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: u32,
    pub screen_height: u32,
    pub tile_size: u32,
    pub physics: PhysicsSettings,
    pub terrain: TerrainSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tile_size: TILE_SIZE,
            physics: PhysicsSettings::default(),
            terrain: TerrainSettings::default(),
        }
    }
}

/// Physics constants resolved to fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsParams {
    pub tile: Fixed,
    pub screen_height: i32,
    pub gravity: Fixed,
    pub max_fall_speed: Fixed,
    pub rising_power: Fixed,
    pub initial_run_speed: Fixed,
    pub run_acceleration: Fixed,
    pub max_run_speed: Fixed,
    pub character_x: Fixed,
    pub character_start_y: Fixed,
    pub rising_frames: u32,
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Tile grid columns (screen plus one partially visible column)
    pub fn columns(&self) -> usize {
        tiles_to_cover(self.screen_width, self.tile_size)
    }

    /// Tile grid rows
    pub fn rows(&self) -> usize {
        tiles_to_cover(self.screen_height, self.tile_size)
    }

    /// Check that every frame computation stays inside the grid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        for (name, value) in [
            ("tile_size", self.tile_size),
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if value > MAX_EXTENT_PX {
                return Err(ConfigError::TooLarge {
                    name,
                    value: value.into(),
                    max: MAX_EXTENT_PX.into(),
                });
            }
        }
        if self.screen_width < self.tile_size || self.screen_height < self.tile_size {
            return Err(ConfigError::ScreenTooSmall {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        let rows = self.rows();
        let t = &self.terrain;
        // Ground needs at least two rows of headroom for the character
        if t.min_ground_height < 2
            || t.min_ground_height > t.max_ground_height
            || t.max_ground_height as usize >= rows
        {
            return Err(ConfigError::GroundBand {
                min: t.min_ground_height,
                max: t.max_ground_height,
                rows,
            });
        }
        if t.title_ground_height < 2 || t.title_ground_height as usize >= rows {
            return Err(ConfigError::TitleGround {
                height: t.title_ground_height,
                rows,
            });
        }

        self.validate_physics()?;
        // Wall probe looks one column past the character's right edge, which
        // itself may sit a full frame of scrolling into the next tile.
        let p = &self.physics;
        let tile = self.tile_size as f32;
        let reach = p.character_x + tile * 3.0 + p.max_run_speed.max(p.initial_run_speed);
        if reach >= (self.columns() as f32) * tile {
            return Err(ConfigError::CharacterOutOfGrid {
                x: p.character_x,
                width: self.screen_width,
            });
        }

        for (name, value) in [
            ("hole_chance", t.hole_chance),
            ("lower_chance", t.lower_chance),
            ("raise_threshold", t.raise_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        for (name, value) in [
            ("hole_mean_run", t.hole_mean_run),
            ("height_step_mean", t.height_step_mean),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(t.run_std_dev.is_finite() && t.run_std_dev >= 0.0) || !t.run_mean.is_finite() {
            return Err(ConfigError::Distribution(format!(
                "run length N({}, {})",
                t.run_mean, t.run_std_dev
            )));
        }
        for (name, value) in [
            ("max_hole_run", t.max_hole_run),
            ("max_height_step", t.max_height_step),
            ("max_run", t.max_run),
            ("initial_run", t.initial_run),
        ] {
            if value < 1 {
                return Err(ConfigError::ZeroCap { name });
            }
        }
        Ok(())
    }

    /// Forces must pull the right way and every distance must stay small
    /// enough that the body cannot run away in fixed point.
    fn validate_physics(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let max = MAX_EXTENT_PX as f32;
        // At least one fixed-point step, so truncation never yields zero
        let step = 1.0 / (1 << FIXED_FRAC_BITS) as f32;

        for (name, value, min) in [
            ("gravity", p.gravity, step),
            ("max_fall_speed", p.max_fall_speed, step),
            ("rising_power", p.rising_power, step),
            ("initial_run_speed", p.initial_run_speed, 0.0),
            ("run_acceleration", p.run_acceleration, 0.0),
            ("max_run_speed", p.max_run_speed, 0.0),
            ("character_x", p.character_x, 0.0),
            ("character_start_y", p.character_start_y, -max),
        ] {
            if !(value.is_finite() && (min..=max).contains(&value)) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    min,
                    max,
                });
            }
        }

        // Total height of a held jump
        let rise = p.rising_power as f64 * (f64::from(p.rising_frames) + 1.0);
        if rise > f64::from(MAX_EXTENT_PX) {
            return Err(ConfigError::TooLarge {
                name: "rising_frames",
                value: p.rising_frames.into(),
                max: (f64::from(MAX_EXTENT_PX) / p.rising_power as f64) as u64,
            });
        }

        if p.walk_frame_ticks == 0 {
            return Err(ConfigError::ZeroCap {
                name: "walk_frame_ticks",
            });
        }
        let max_ticks = u32::MAX / WALK_CYCLE.len() as u32;
        if p.walk_frame_ticks > max_ticks {
            return Err(ConfigError::TooLarge {
                name: "walk_frame_ticks",
                value: p.walk_frame_ticks.into(),
                max: max_ticks.into(),
            });
        }
        Ok(())
    }

    /// Convert pixel constants to fixed point (truncating sub-1/64 px)
    pub fn physics_params(&self) -> PhysicsParams {
        let p = &self.physics;
        PhysicsParams {
            tile: Fixed::from_px(self.tile_size as i32),
            screen_height: self.screen_height as i32,
            gravity: Fixed::from_px_f32(p.gravity),
            max_fall_speed: Fixed::from_px_f32(p.max_fall_speed),
            rising_power: Fixed::from_px_f32(p.rising_power),
            initial_run_speed: Fixed::from_px_f32(p.initial_run_speed),
            run_acceleration: Fixed::from_px_f32(p.run_acceleration),
            max_run_speed: Fixed::from_px_f32(p.max_run_speed),
            character_x: Fixed::from_px_f32(p.character_x),
            character_start_y: Fixed::from_px_f32(p.character_start_y),
            rising_frames: p.rising_frames,
        }
    }
}
