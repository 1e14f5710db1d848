//! Scrolling tile grid
//!
//! Tiles are stored column-major (`col * rows + row`) so retiring the left
//! column is a single slice move.

use super::fixed::tile_in_bounds;

/// Empty sky
pub const TILE_SKY: u8 = 0x00;
/// Plain ground block
pub const TILE_GROUND: u8 = 0x10;
/// Tile types at or above this value collide
pub const SOLID_THRESHOLD: u8 = 0x10;

#[inline]
pub fn is_solid(tile: u8) -> bool {
    tile >= SOLID_THRESHOLD
}

/// Fixed-size grid of tile-type bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    columns: usize,
    rows: usize,
    tiles: Vec<u8>,
    /// Total columns retired since creation
    columns_shifted: u64,
}

impl TileMap {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            tiles: vec![TILE_SKY; columns * rows],
            columns_shifted: 0,
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Raw column-major tile bytes
    #[inline]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    #[inline]
    pub fn columns_shifted(&self) -> u64 {
        self.columns_shifted
    }

    /// Tile at (col, row); `None` outside the grid
    pub fn get(&self, col: i32, row: i32) -> Option<u8> {
        let col = tile_in_bounds(col, self.columns)?;
        let row = tile_in_bounds(row, self.rows)?;
        Some(self.tiles[col * self.rows + row])
    }

    /// Whether (col, row) holds a solid tile; outside the grid is open space
    pub fn is_solid_at(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_some_and(is_solid)
    }

    /// Set a single tile, ignoring coordinates outside the grid
    pub fn set(&mut self, col: i32, row: i32, tile: u8) {
        if let (Some(col), Some(row)) = (
            tile_in_bounds(col, self.columns),
            tile_in_bounds(row, self.rows),
        ) {
            self.tiles[col * self.rows + row] = tile;
        }
    }

    /// Fill the whole grid with flat ground starting at `ground_height`
    pub fn fill_flat(&mut self, ground_height: i32) {
        for col in 0..self.columns {
            self.write_column(col, ground_height, false);
        }
    }

    /// Drop column 0; every other column moves one to the left
    pub fn retire_left_column(&mut self) {
        let rows = self.rows;
        self.tiles.copy_within(rows.., 0);
        self.columns_shifted += 1;
    }

    /// Rewrite the rightmost column: ground from `ground_height` down unless
    /// the column is a hole
    pub fn append_right_column(&mut self, ground_height: i32, hole: bool) {
        if let Some(last) = self.columns.checked_sub(1) {
            self.write_column(last, ground_height, hole);
        }
    }

    fn write_column(&mut self, col: usize, ground_height: i32, hole: bool) {
        let start = col * self.rows;
        for (row, tile) in self.tiles[start..start + self.rows].iter_mut().enumerate() {
            *tile = if !hole && row as i32 >= ground_height {
                TILE_GROUND
            } else {
                TILE_SKY
            };
        }
    }
}
