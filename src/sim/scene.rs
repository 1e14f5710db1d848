//! Draw-ready snapshot for the renderer
//!
//! The core never blits anything. It hands the host the tile grid, scroll
//! offsets and sprite list; the host maps tile types and pattern indices onto
//! its own sheets.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::physics::CharacterBody;
use super::state::{GameState, Mode};

/// Idle pose
pub const IDLE_PATTERN: usize = 0;
/// Walk-cycle poses, in order
pub const WALK_CYCLE: [usize; 3] = [3, 4, 5];
/// Airborne pose
pub const JUMP_PATTERN: usize = 6;

/// Tiles per row of the tile atlas
pub const ATLAS_COLUMNS: u8 = 16;

/// Source rectangle on a sprite or tile sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritePattern {
    pub origin: IVec2,
    pub size: IVec2,
}

impl SpritePattern {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    /// Exclusive bottom-right corner
    #[inline]
    pub fn max(&self) -> IVec2 {
        self.origin + self.size
    }
}

/// Character sheet: seven 16x32 frames side by side
pub const SPRITE_PATTERNS: [SpritePattern; 7] = [
    SpritePattern::new(0, 0, 16, 32),
    SpritePattern::new(16, 0, 16, 32),
    SpritePattern::new(32, 0, 16, 32),
    SpritePattern::new(48, 0, 16, 32),
    SpritePattern::new(64, 0, 16, 32),
    SpritePattern::new(80, 0, 16, 32),
    SpritePattern::new(96, 0, 16, 32),
];

/// A sprite to draw: pattern index into [`SPRITE_PATTERNS`] at a screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub pattern: usize,
    pub pos: IVec2,
}

/// Walk-cycle bookkeeping for the character sprite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Animation {
    pub pattern: usize,
    frame: u32,
}

impl Animation {
    /// Pick this frame's pose from the body state
    pub fn update(&mut self, body: &CharacterBody, ticks_per_pose: u32) {
        if body.floating {
            self.pattern = JUMP_PATTERN;
            self.frame = 0;
        } else if body.speed_x.raw() > 0 {
            let ticks = ticks_per_pose.max(1);
            self.pattern = WALK_CYCLE[(self.frame / ticks) as usize];
            self.frame += 1;
            if self.frame >= (WALK_CYCLE.len() as u32).saturating_mul(ticks) {
                self.frame = 0;
            }
        } else {
            self.pattern = IDLE_PATTERN;
            self.frame = 0;
        }
    }
}

/// One tile placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDraw {
    pub tile: u8,
    /// Top-left screen position
    pub dst: IVec2,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub mode: Mode,
    pub frame: u64,
    /// Column-major tile bytes (`col * rows + row`)
    pub tiles: Vec<u8>,
    pub columns: usize,
    pub rows: usize,
    pub tile_size: i32,
    /// Scroll offset in whole pixels
    pub scroll: IVec2,
    pub sprites: Vec<Sprite>,
}

impl Scene {
    pub fn capture(state: &GameState) -> Self {
        let params = state.params();
        Self {
            mode: state.mode,
            frame: state.frame,
            tiles: state.map.tiles().to_vec(),
            columns: state.map.columns(),
            rows: state.map.rows(),
            tile_size: params.tile.floor(),
            scroll: IVec2::new(state.scroll_x.floor(), state.scroll_y.floor()),
            sprites: vec![Sprite {
                pattern: state.animation.pattern,
                pos: IVec2::new(params.character_x.floor(), state.body.y.floor()),
            }],
        }
    }

    /// Atlas cell for a tile type (16 tiles per atlas row)
    pub fn tile_source(&self, tile: u8) -> SpritePattern {
        let cols = ATLAS_COLUMNS;
        SpritePattern::new(
            (tile % cols) as i32 * self.tile_size,
            (tile / cols) as i32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Every tile with its scrolled screen position, column by column
    pub fn tiles(&self) -> impl Iterator<Item = TileDraw> + '_ {
        let rows = self.rows.max(1);
        self.tiles.iter().enumerate().map(move |(i, &tile)| {
            let cell = IVec2::new((i / rows) as i32, (i % rows) as i32);
            TileDraw {
                tile,
                dst: cell * self.tile_size - self.scroll,
            }
        })
    }

    /// Source rectangle for a sprite's pattern
    pub fn sprite_source(sprite: &Sprite) -> Option<SpritePattern> {
        SPRITE_PATTERNS.get(sprite.pattern).copied()
    }
}
