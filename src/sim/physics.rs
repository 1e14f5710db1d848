//! Character physics
//!
//! The character never moves horizontally on screen. Its horizontal speed is
//! the scroll speed of the world; only the vertical axis is integrated here.

use serde::{Deserialize, Serialize};

use super::fixed::Fixed;
use crate::settings::PhysicsParams;

/// The runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBody {
    /// Top edge, screen space
    pub y: Fixed,
    /// World scroll speed (positive = running right)
    pub speed_x: Fixed,
    /// Positive = falling
    pub speed_y: Fixed,
    /// Airborne this frame
    pub floating: bool,
    /// Frames of sustained rise left while the jump is held
    pub rising_frames: u32,
}

impl CharacterBody {
    /// Standing at the start position, running at the initial speed
    pub fn new(params: &PhysicsParams) -> Self {
        Self {
            y: params.character_start_y,
            speed_x: params.initial_run_speed,
            speed_y: Fixed::ZERO,
            floating: false,
            rising_frames: 0,
        }
    }

    /// Apply one frame of jump input and vertical forces.
    ///
    /// Returns `true` when a jump started this frame.
    pub fn apply_vertical(&mut self, params: &PhysicsParams, pressed: bool, released: bool) -> bool {
        if self.floating {
            if self.rising_frames > 0 {
                if released {
                    self.rising_frames = 0;
                } else {
                    self.rising_frames -= 1;
                }
                self.speed_y = -params.rising_power;
            } else {
                self.speed_y += params.gravity;
                if self.speed_y > params.max_fall_speed {
                    self.speed_y = params.max_fall_speed;
                }
            }
            false
        } else if pressed {
            self.start_jump(params);
            true
        } else {
            false
        }
    }

    /// Leave the ground with a full rise budget
    pub fn start_jump(&mut self, params: &PhysicsParams) {
        self.floating = true;
        self.rising_frames = params.rising_frames;
        self.speed_y = -params.rising_power;
    }

    /// Speed up toward the maximum run speed
    pub fn accelerate(&mut self, params: &PhysicsParams) {
        self.speed_x += params.run_acceleration;
        if self.speed_x > params.max_run_speed {
            self.speed_x = params.max_run_speed;
        }
    }

    /// Move vertically by the current speed
    #[inline]
    pub fn integrate(&mut self) {
        self.y += self.speed_y;
    }

    /// Rest on ground whose top edge is at `top` pixels
    pub fn land(&mut self, top: Fixed) {
        self.y = top;
        self.speed_y = Fixed::ZERO;
        self.floating = false;
        self.rising_frames = 0;
    }

    #[inline]
    pub fn is_rising(&self) -> bool {
        self.speed_y < Fixed::ZERO
    }
}
