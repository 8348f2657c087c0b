//! Data-driven game balance
//!
//! Every knob the simulation reads lives here so a match can be rebalanced
//! from JSON without touching code. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration. The simulation refuses to start with any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena must have a positive size, got {width}x{height}")]
    ArenaSize { width: f32, height: f32 },
    #[error("{what} ({size}px) does not fit in a {half_width}px half")]
    DoesNotFit {
        what: &'static str,
        size: f32,
        half_width: f32,
    },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("min spawn interval must be at least 1ms")]
    ZeroSpawnInterval,
    #[error("max speed {max} is below start speed {start}")]
    SpeedRange { start: f32, max: f32 },
    #[error("variant chances must lie in [0, 1] and sum to at most 1 (obstacle {obstacle}, bonus {bonus})")]
    Chances { obstacle: f32, bonus: f32 },
    #[error("max misses must be at least 1")]
    NoLives,
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,

    pub catcher_width: f32,
    pub catcher_height: f32,
    pub catcher_margin: f32,
    pub catcher_speed: f32,

    pub entity_width: f32,
    pub entity_height: f32,
    pub spawn_y: f32,
    pub normal_points: u32,
    pub bonus_points: u32,

    pub start_speed: f32,
    pub max_speed: f32,
    pub speed_growth: f32,

    pub spawn_gap_distance: f32,
    pub min_spawn_interval_ms: u32,

    pub obstacle_chance: f32,
    pub bonus_chance: f32,

    pub sway_amplitude: f32,
    pub sway_frequency: f32,

    pub max_misses: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            catcher_width: CATCHER_WIDTH,
            catcher_height: CATCHER_HEIGHT,
            catcher_margin: CATCHER_MARGIN,
            catcher_speed: CATCHER_SPEED,

            entity_width: ENTITY_SIZE,
            entity_height: ENTITY_SIZE,
            spawn_y: SPAWN_Y,
            normal_points: NORMAL_POINTS,
            bonus_points: BONUS_POINTS,

            start_speed: START_SPEED,
            max_speed: MAX_SPEED,
            speed_growth: SPEED_GROWTH,

            spawn_gap_distance: SPAWN_GAP_DISTANCE,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,

            obstacle_chance: OBSTACLE_CHANCE,
            bonus_chance: BONUS_CHANCE,

            sway_amplitude: SWAY_AMPLITUDE,
            sway_frequency: SWAY_FREQUENCY,

            max_misses: MAX_MISSES,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate(1)?;
        Ok(tuning)
    }

    /// Check that the parameters describe a playable arena split into `half_count` halves
    pub fn validate(&self, half_count: usize) -> Result<(), ConfigError> {
        for (name, value) in [
            ("arena width", self.arena_width),
            ("arena height", self.arena_height),
            ("catcher width", self.catcher_width),
            ("catcher height", self.catcher_height),
            ("catcher margin", self.catcher_margin),
            ("catcher speed", self.catcher_speed),
            ("entity width", self.entity_width),
            ("entity height", self.entity_height),
            ("spawn y", self.spawn_y),
            ("start speed", self.start_speed),
            ("max speed", self.max_speed),
            ("speed growth", self.speed_growth),
            ("spawn gap distance", self.spawn_gap_distance),
            ("sway amplitude", self.sway_amplitude),
            ("sway frequency", self.sway_frequency),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::ArenaSize {
                width: self.arena_width,
                height: self.arena_height,
            });
        }

        let half_width = self.arena_width / half_count.max(1) as f32;
        for (what, size) in [
            ("catcher", self.catcher_width),
            ("falling entity", self.entity_width),
        ] {
            if size > half_width {
                return Err(ConfigError::DoesNotFit {
                    what,
                    size,
                    half_width,
                });
            }
        }

        for (name, value) in [
            ("catcher width", self.catcher_width),
            ("catcher height", self.catcher_height),
            ("entity width", self.entity_width),
            ("entity height", self.entity_height),
            ("start speed", self.start_speed),
            ("spawn gap distance", self.spawn_gap_distance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if !(self.max_speed >= self.start_speed) {
            return Err(ConfigError::SpeedRange {
                start: self.start_speed,
                max: self.max_speed,
            });
        }

        if self.min_spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }

        let chance_ok = |c: f32| (0.0..=1.0).contains(&c);
        if !chance_ok(self.obstacle_chance)
            || !chance_ok(self.bonus_chance)
            || self.obstacle_chance + self.bonus_chance > 1.0
        {
            return Err(ConfigError::Chances {
                obstacle: self.obstacle_chance,
                bonus: self.bonus_chance,
            });
        }

        if self.max_misses == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }
}
