//! Catch The Honey - a falling-object catcher arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, collisions, match rules)
//! - `tuning`: Data-driven game balance
//! - `input`: Keyboard bindings to per-player impulses
//! - `result`: Final match record handed to the game-over screen
//! - `snapshot`: Read-only view of the simulation for presentation
//! - `feedback`: Cosmetic cues derived from simulation events
//! - `settings`: Player preferences

pub mod feedback;
pub mod input;
pub mod result;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use input::InputState;
pub use result::{MatchResult, Outcome, PlayerResult};
pub use settings::Settings;
pub use snapshot::Snapshot;
pub use tuning::{ConfigError, Tuning};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta a driver feeds into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (px). Height is the miss line.
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Catcher defaults
    pub const CATCHER_WIDTH: f32 = 80.0;
    pub const CATCHER_HEIGHT: f32 = 80.0;
    /// Gap between the catcher's bottom edge and the miss line
    pub const CATCHER_MARGIN: f32 = 10.0;
    /// Horizontal speed at full impulse: 8 px per 60 Hz frame
    pub const CATCHER_SPEED: f32 = 480.0;

    /// Falling entity defaults
    pub const ENTITY_SIZE: f32 = 40.0;
    /// Entities appear slightly above the arena
    pub const SPAWN_Y: f32 = -10.0;
    pub const NORMAL_POINTS: u32 = 1;
    pub const BONUS_POINTS: u32 = 3;

    /// Difficulty curve (px/s)
    pub const START_SPEED: f32 = 100.0;
    pub const MAX_SPEED: f32 = 400.0;
    pub const SPEED_GROWTH: f32 = 0.02;

    /// Desired vertical distance between consecutive spawns (px)
    pub const SPAWN_GAP_DISTANCE: f32 = 200.0;
    pub const MIN_SPAWN_INTERVAL_MS: u32 = 80;
    /// Used when the curve reports a non-positive speed
    pub const FALLBACK_SPAWN_INTERVAL_MS: u32 = 1000;

    /// Variant odds
    pub const OBSTACLE_CHANCE: f32 = 0.07;
    pub const BONUS_CHANCE: f32 = 0.08;

    /// Obstacle sway
    pub const SWAY_AMPLITUDE: f32 = 30.0;
    pub const SWAY_FREQUENCY: f32 = 1.2;

    /// Lives per player
    pub const MAX_MISSES: u32 = 5;
    /// Lead a survivor needs over an eliminated opponent to win outright
    pub const WINNING_LEAD: u32 = 1;
}

/// Single player or two players sharing the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Single,
    Versus,
}

impl Mode {
    /// Number of arena halves (one per player)
    pub fn half_count(&self) -> usize {
        match self {
            Mode::Single => 1,
            Mode::Versus => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::Versus => "versus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "solo" | "1" => Some(Mode::Single),
            "versus" | "multiplayer" | "multi" | "2" => Some(Mode::Versus),
            _ => None,
        }
    }
}

/// Format elapsed seconds as `m:ss:d` (minutes, seconds, tenths)
pub fn format_elapsed(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).floor() as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let tenths = (total_ms % 1000) / 100;
    format!("{}:{:02}:{}", minutes, seconds, tenths)
}
