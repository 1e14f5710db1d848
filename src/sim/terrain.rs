//! Procedural terrain
//!
//! The generator decides, one plateau at a time, how high the ground sits and
//! where holes open. All draws come from a session-owned PCG stream that is
//! reseeded whenever a run starts, so a seed always yields the same course.

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::{ConfigError, TerrainSettings};

/// Generator position along the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainCursor {
    /// Row where solid ground begins
    pub ground_height: i32,
    /// Current columns are a gap
    pub ground_hole: bool,
    /// Columns left before the next terrain decision
    pub ground_run_remaining: i32,
}

/// What the next terrain decision produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Hole { columns: i32 },
    Plateau { ground_height: i32, columns: i32 },
}

/// Seeded terrain generator
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    tuning: TerrainSettings,
    cursor: TerrainCursor,
    rng: Pcg32,
    hole_length: Exp<f64>,
    height_step: Exp<f64>,
    run_length: Normal<f64>,
}

impl TerrainGenerator {
    pub fn new(tuning: &TerrainSettings) -> Result<Self, ConfigError> {
        let hole_length = Exp::new(1.0 / tuning.hole_mean_run)
            .map_err(|e| ConfigError::Distribution(format!("hole length: {e}")))?;
        let height_step = Exp::new(1.0 / tuning.height_step_mean)
            .map_err(|e| ConfigError::Distribution(format!("height step: {e}")))?;
        let run_length = Normal::new(tuning.run_mean, tuning.run_std_dev)
            .map_err(|e| ConfigError::Distribution(format!("run length: {e}")))?;

        Ok(Self {
            tuning: tuning.clone(),
            cursor: Self::initial_cursor(tuning),
            rng: Pcg32::seed_from_u64(tuning.seed),
            hole_length,
            height_step,
            run_length,
        })
    }

    fn initial_cursor(tuning: &TerrainSettings) -> TerrainCursor {
        TerrainCursor {
            ground_height: tuning.title_ground_height,
            ground_hole: false,
            ground_run_remaining: tuning.initial_run,
        }
    }

    /// Back to flat ground and the configured seed
    pub fn reset(&mut self) {
        self.cursor = Self::initial_cursor(&self.tuning);
        self.rng = Pcg32::seed_from_u64(self.tuning.seed);
        log::debug!("Terrain reseeded with {}", self.tuning.seed);
    }

    #[inline]
    pub fn cursor(&self) -> TerrainCursor {
        self.cursor
    }

    /// Flat column used outside of a run
    #[inline]
    pub fn title_ground_height(&self) -> i32 {
        self.tuning.title_ground_height
    }

    /// Shape of the column entering on the right, then step the cursor.
    ///
    /// Returns `(ground_height, hole)` for the new column.
    pub fn next_column(&mut self) -> (i32, bool) {
        let column = (self.cursor.ground_height, self.cursor.ground_hole);
        self.cursor.ground_run_remaining -= 1;
        if self.cursor.ground_run_remaining <= 0 {
            self.next_segment();
        }
        column
    }

    /// Decide the next plateau or hole
    pub fn next_segment(&mut self) -> Segment {
        let t = &self.tuning;

        if !self.cursor.ground_hole && self.rng.random::<f32>() < t.hole_chance {
            let columns = Self::clamp_draw(self.hole_length.sample(&mut self.rng), t.max_hole_run);
            self.cursor.ground_hole = true;
            self.cursor.ground_run_remaining = columns;
            log::debug!("Terrain: hole of {} columns", columns);
            return Segment::Hole { columns };
        }

        let r = self.rng.random::<f32>();
        if r < t.lower_chance {
            let step = Self::clamp_draw(self.height_step.sample(&mut self.rng), t.max_height_step);
            self.cursor.ground_height = (self.cursor.ground_height - step).max(t.min_ground_height);
        } else if r >= t.raise_threshold {
            let step = Self::clamp_draw(self.height_step.sample(&mut self.rng), t.max_height_step);
            self.cursor.ground_height = (self.cursor.ground_height + step).min(t.max_ground_height);
        }

        let columns = Self::clamp_draw(self.run_length.sample(&mut self.rng), t.max_run);
        self.cursor.ground_hole = false;
        self.cursor.ground_run_remaining = columns;
        log::debug!(
            "Terrain: plateau at row {} for {} columns",
            self.cursor.ground_height,
            columns
        );
        Segment::Plateau {
            ground_height: self.cursor.ground_height,
            columns,
        }
    }

    fn clamp_draw(sample: f64, max: i32) -> i32 {
        (sample.round() as i32).clamp(1, max)
    }
}
