//! Score-driven fall speed
//!
//! Speed rises exponentially from `start_speed` towards `max_speed` as the
//! cumulative score grows:
//!
//! `speed(s) = max - (max - start) * e^(-k * s)`

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    pub start_speed: f32,
    pub max_speed: f32,
    /// Growth rate `k`
    pub growth: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            start_speed: START_SPEED,
            max_speed: MAX_SPEED,
            growth: SPEED_GROWTH,
        }
    }
}

impl DifficultyCurve {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            start_speed: tuning.start_speed,
            max_speed: tuning.max_speed,
            growth: tuning.speed_growth,
        }
    }

    /// Fall speed (px/s) for a cumulative score
    pub fn speed(&self, score: f32) -> f32 {
        let s = if score.is_finite() { score.max(0.0) } else { 0.0 };
        let speed = self.max_speed - (self.max_speed - self.start_speed) * (-self.growth * s).exp();
        if !speed.is_finite() {
            return self.start_speed;
        }
        // max/min rather than clamp: clamp panics on an inverted range
        speed.max(self.start_speed).min(self.max_speed)
    }
}
