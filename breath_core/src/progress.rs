//! Visual size of the breathing circle.
//!
//! The size tracks lung volume: it grows linearly through the inhale, stays
//! full during the first hold, shrinks through the exhale and stays empty
//! during the second hold.

use crate::{DisplayConfig, Error, ExerciseDefinition, Phase, Result};

/// Maps the scheduler's discrete state onto a continuous size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressCalculator {
    min_size: f64,
    max_size: f64,
}

impl Default for ProgressCalculator {
    fn default() -> Self {
        Self {
            min_size: 100.0,
            max_size: 280.0,
        }
    }
}

impl ProgressCalculator {
    pub fn new(min_size: f64, max_size: f64) -> Result<Self> {
        if !(min_size.is_finite() && max_size.is_finite()) || min_size < 0.0 || min_size >= max_size
        {
            return Err(Error::Config(format!(
                "invalid size range {}..{}",
                min_size, max_size
            )));
        }
        Ok(Self { min_size, max_size })
    }

    pub fn from_config(display: &DisplayConfig) -> Result<Self> {
        Self::new(display.min_size, display.max_size)
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    /// Size for `phase` with `time_remaining` seconds left in it
    pub fn size(&self, phase: Phase, time_remaining: u32, exercise: &ExerciseDefinition) -> f64 {
        let span = self.max_size - self.min_size;
        let durations = &exercise.durations;

        let size = match phase {
            Phase::Idle | Phase::Hold2 => self.min_size,
            Phase::Hold1 => self.max_size,
            Phase::Inhale => {
                let progress = 1.0 - f64::from(time_remaining) / f64::from(durations.inhale.get());
                self.min_size + progress * span
            }
            Phase::Exhale => {
                let progress = 1.0 - f64::from(time_remaining) / f64::from(durations.exhale.get());
                self.max_size - progress * span
            }
        };

        size.clamp(self.min_size, self.max_size)
    }

    /// Size as a fraction of the range, 0.0 at `min_size` and 1.0 at `max_size`
    pub fn fraction(&self, size: f64) -> f64 {
        ((size - self.min_size) / (self.max_size - self.min_size)).clamp(0.0, 1.0)
    }
}
