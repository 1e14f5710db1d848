//! 26.6 fixed-point values and pixel/tile conversion
//!
//! Positions, speeds and scroll offsets are integers counting 1/64 px, so a
//! run replays identically on every platform. Pixel mapping floors toward
//! negative infinity, and so does tile mapping.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::consts::FIXED_FRAC_BITS;

/// A 26.6 fixed-point number (unit = 1/64 px)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FIXED_FRAC_BITS);

    /// Wrap a raw 1/64 px value
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// Whole pixels
    #[inline]
    pub const fn from_px(px: i32) -> Self {
        Fixed(px << FIXED_FRAC_BITS)
    }

    /// `num / den` pixels, truncated to the nearest representable step
    #[inline]
    pub const fn from_ratio(num: i32, den: i32) -> Self {
        Fixed((num << FIXED_FRAC_BITS) / den)
    }

    /// Fractional pixels, truncated toward zero
    #[inline]
    pub fn from_px_f32(px: f32) -> Self {
        Fixed((px * (1 << FIXED_FRAC_BITS) as f32) as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Pixel coordinate, rounded toward negative infinity
    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> FIXED_FRAC_BITS
    }

    /// Approximate pixel value, for logging only
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / (1 << FIXED_FRAC_BITS) as f32
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

/// Tile index containing pixel `px` (floor division, valid for negatives)
#[inline]
pub fn pixel_to_tile(px: i32, tile_size: i32) -> i32 {
    px.div_euclid(tile_size)
}

/// Left/top pixel edge of tile `index`
#[inline]
pub fn tile_to_pixel(index: i32, tile_size: i32) -> i32 {
    index * tile_size
}

/// Whether pixel `px` sits exactly on a tile boundary
#[inline]
pub fn is_tile_aligned(px: i32, tile_size: i32) -> bool {
    px.rem_euclid(tile_size) == 0
}

/// Clamp a tile index into `0..len`; `None` when it falls outside
#[inline]
pub fn tile_in_bounds(index: i32, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}
