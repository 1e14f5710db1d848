//! Tile-grid collision for the runner
//!
//! The character is one tile wide and two tiles tall, pinned at a fixed screen
//! x. Its world x is that screen x plus the scroll offset, so every probe
//! below works in screen pixels relative to the scrolled grid.

use super::fixed::{Fixed, is_tile_aligned, pixel_to_tile, tile_to_pixel};
use super::physics::CharacterBody;
use super::tilemap::TileMap;
use crate::settings::PhysicsParams;

/// Character height in tiles
pub const CHARACTER_TILES_HIGH: i32 = 2;

/// A wall directly ahead of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHit {
    /// Grid column of the wall
    pub column: i32,
    /// Scroll offset that puts the character's leading edge on the wall
    pub scroll_x: Fixed,
}

/// Result of probing beneath the character's feet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    /// Feet are on solid ground whose top puts the character at `y`
    Landed { y: Fixed },
    /// Nothing solid below
    Airborne,
    /// Feet row is outside the grid (above the top or below the bottom)
    OutOfRange,
}

/// Look for a solid tile in the column just ahead of the character.
///
/// The probed column is the one containing `character_x + scroll_x + tile`;
/// the character spans two rows when tile-aligned vertically, three otherwise.
pub fn check_wall(
    map: &TileMap,
    params: &PhysicsParams,
    scroll_x: Fixed,
    body: &CharacterBody,
) -> Option<WallHit> {
    let tile = params.tile.floor();
    let y = body.y.floor();
    let column = pixel_to_tile((params.character_x + scroll_x).floor() + tile, tile);
    let top_row = pixel_to_tile(y, tile);
    let span = if is_tile_aligned(y, tile) {
        CHARACTER_TILES_HIGH
    } else {
        CHARACTER_TILES_HIGH + 1
    };

    let rows = map.rows() as i32;
    let hit = (top_row..top_row + span)
        .filter(|&row| row >= 0)
        .take_while(|&row| row < rows)
        .any(|row| map.is_solid_at(column, row));

    hit.then(|| WallHit {
        column,
        scroll_x: Fixed::from_px(tile_to_pixel(column - 1, tile)) - params.character_x,
    })
}

/// Probe the row under the character's feet.
///
/// Covers one column when the character is horizontally tile-aligned, two
/// otherwise.
pub fn check_ground(
    map: &TileMap,
    params: &PhysicsParams,
    scroll_x: Fixed,
    body: &CharacterBody,
) -> GroundContact {
    let tile = params.tile.floor();
    let x = (params.character_x + scroll_x).floor();
    let column = pixel_to_tile(x, tile);
    let feet_row = pixel_to_tile(body.y.floor() + tile * CHARACTER_TILES_HIGH, tile);
    let width = if is_tile_aligned(x, tile) { 1 } else { 2 };

    if feet_row < 0 || feet_row >= map.rows() as i32 {
        return GroundContact::OutOfRange;
    }

    if (column..column + width).any(|col| map.is_solid_at(col, feet_row)) {
        GroundContact::Landed {
            y: Fixed::from_px(tile_to_pixel(feet_row - CHARACTER_TILES_HIGH, tile)),
        }
    } else {
        GroundContact::Airborne
    }
}

/// Whether the character has dropped past the bottom of the screen
#[inline]
pub fn fell_off_screen(params: &PhysicsParams, body: &CharacterBody) -> bool {
    body.y.floor() > params.screen_height
}
