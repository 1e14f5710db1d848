//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame, fixed-point arithmetic only
//! - Seeded, session-owned RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod fixed;
pub mod physics;
pub mod scene;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod tilemap;

pub use collision::{GroundContact, WallHit, check_ground, check_wall, fell_off_screen};
pub use fixed::{Fixed, pixel_to_tile, tile_to_pixel};
pub use physics::CharacterBody;
pub use scene::{Animation, SPRITE_PATTERNS, Scene, Sprite, SpritePattern, TileDraw};
pub use state::{GameEvent, GameState, Mode};
pub use terrain::{Segment, TerrainCursor, TerrainGenerator};
pub use tick::{TickInput, TickOutcome, tick};
pub use tilemap::{TILE_GROUND, TILE_SKY, TileMap, is_solid};
