//! Game state and core simulation types
//!
//! Per-player bookkeeping lives in [`PlayerState`] records passed explicitly
//! through the tick, so single and two-player matches share one code path.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::DifficultyCurve;
use super::spawn::SpawnScheduler;
use crate::Mode;
use crate::result::{MatchResult, Outcome};
use crate::tuning::{ConfigError, Tuning};

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (no clock, no spawns, no movement)
    Paused,
    /// Match decided
    GameOver,
}

/// Fixed-width play field, split into one half per player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    /// Lower boundary; entities whose top edge passes it are missed
    pub height: f32,
    pub half_count: usize,
}

impl Arena {
    pub fn new(width: f32, height: f32, half_count: usize) -> Self {
        Self {
            width,
            height,
            half_count: half_count.clamp(1, 2),
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / self.half_count as f32
    }

    /// Global x of the left edge of `half`
    #[inline]
    pub fn half_start(&self, half: usize) -> f32 {
        half as f32 * self.half_width()
    }

    /// Which half a global x coordinate falls into
    pub fn half_of(&self, x: f32) -> usize {
        if self.half_count == 1 || x < self.half_width() {
            0
        } else {
            1
        }
    }
}

/// Sprite facing, flipped by the last non-zero impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

/// A player-controlled catcher, confined to its own half
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    /// Left edge, relative to the owning half
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Top edge (fixed)
    pub top: f32,
    /// Signed horizontal impulse in [-1, 1]
    pub impulse: f32,
    pub facing: Facing,
}

impl Catcher {
    /// Catcher centred in a half, resting just above the miss line
    pub fn new(arena: &Arena, tuning: &Tuning) -> Self {
        let x = ((arena.half_width() - tuning.catcher_width) / 2.0).round();
        Self {
            x,
            width: tuning.catcher_width,
            height: tuning.catcher_height,
            top: arena.height - tuning.catcher_height - tuning.catcher_margin,
            impulse: 0.0,
            facing: Facing::default(),
        }
    }

    /// Rightmost allowed left edge within the half
    #[inline]
    pub fn max_x(&self, arena: &Arena) -> f32 {
        (arena.half_width() - self.width).max(0.0)
    }

    /// Set impulse from collaborator input, clamped to [-1, 1]
    pub fn set_impulse(&mut self, impulse: f32) {
        self.impulse = if impulse.is_finite() {
            impulse.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        if self.impulse > 0.0 {
            self.facing = Facing::Right;
        } else if self.impulse < 0.0 {
            self.facing = Facing::Left;
        }
    }

    /// Move by impulse * speed * dt and clamp into the half
    pub fn step(&mut self, dt: f32, speed: f32, arena: &Arena) {
        self.x += self.impulse * speed * dt;
        self.clamp(arena);
    }

    pub fn clamp(&mut self, arena: &Arena) {
        self.x = self.x.clamp(0.0, self.max_x(arena));
    }

    /// Bounding box in arena coordinates
    pub fn rect(&self, arena: &Arena, half: usize) -> Rect {
        Rect::new(arena.half_start(half) + self.x, self.top, self.width, self.height)
    }
}

/// Per-player scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub index: usize,
    pub score: u32,
    /// Penalised events so far; never decreases
    pub misses: u32,
    pub alive: bool,
    /// Seconds played; stops when the player is eliminated
    pub elapsed: f64,
    pub catcher: Catcher,
}

impl PlayerState {
    pub fn new(index: usize, arena: &Arena, tuning: &Tuning) -> Self {
        Self {
            index,
            score: 0,
            misses: 0,
            alive: true,
            elapsed: 0.0,
            catcher: Catcher::new(arena, tuning),
        }
    }

    /// Remaining lives, floored at zero
    pub fn lives(&self, max_misses: u32) -> u32 {
        max_misses.saturating_sub(self.misses)
    }
}

/// Falling entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Honeycomb, 1 point
    Normal,
    /// Blue honeycomb, 3 points
    Bonus,
    /// Leaf: costs a life when caught, harmless when dodged
    Obstacle,
}

impl EntityKind {
    pub fn points(&self, tuning: &Tuning) -> u32 {
        match self {
            EntityKind::Normal => tuning.normal_points,
            EntityKind::Bonus => tuning.bonus_points,
            EntityKind::Obstacle => 0,
        }
    }

    #[inline]
    pub fn is_obstacle(&self) -> bool {
        *self == EntityKind::Obstacle
    }
}

/// Horizontal sway of an obstacle, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sway {
    pub amplitude: f32,
    /// Oscillations per second
    pub frequency: f32,
    pub phase: f32,
}

impl Sway {
    /// Horizontal offset `t` seconds after spawn
    #[inline]
    pub fn offset(&self, t: f32) -> f32 {
        self.amplitude * (std::f32::consts::TAU * self.frequency * t + self.phase).sin()
    }
}

/// An item falling through the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    pub id: u32,
    pub kind: EntityKind,
    pub points: u32,
    /// Fall speed captured at spawn (px/s)
    pub speed: f32,
    /// Left edge (arena coordinates)
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub initial_x: f32,
    /// Simulation time of creation (seconds)
    pub spawned_at: f64,
    pub sway: Option<Sway>,
    pub width: f32,
    pub height: f32,
}

impl FallingEntity {
    /// Advance one step. `now` is the simulation time after the step.
    pub fn advance(&mut self, dt: f32, now: f64, arena_width: f32) {
        self.y += self.speed * dt;
        if let Some(sway) = self.sway {
            let t = (now - self.spawned_at) as f32;
            let max_x = (arena_width - self.width).max(0.0);
            self.x = (self.initial_x + sway.offset(t)).clamp(0.0, max_x);
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.y + self.height / 2.0)
    }
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Spawned {
        id: u32,
        kind: EntityKind,
    },
    /// Honeycomb caught; `at` is the entity centre
    Caught {
        player: usize,
        kind: EntityKind,
        points: u32,
        at: Vec2,
    },
    /// Leaf caught, one life lost
    ObstacleCaught {
        player: usize,
        at: Vec2,
    },
    /// Honeycomb fell past the miss line, one life lost
    Missed {
        player: usize,
        kind: EntityKind,
    },
    /// Leaf fell past the miss line without penalty
    ObstacleDodged {
        id: u32,
    },
    Eliminated {
        player: usize,
    },
    GameOver {
        outcome: Outcome,
    },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub curve: DifficultyCurve,
    pub players: Vec<PlayerState>,
    /// Live entities, sorted by id
    pub entities: Vec<FallingEntity>,
    pub scheduler: SpawnScheduler,
    pub phase: GamePhase,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Final record, set once the match is decided
    pub result: Option<MatchResult>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a match and start spawning immediately
    pub fn new(mode: Mode, seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        let half_count = mode.half_count();
        tuning.validate(half_count)?;

        let arena = Arena::new(tuning.arena_width, tuning.arena_height, half_count);
        let players = (0..half_count)
            .map(|i| PlayerState::new(i, &arena, &tuning))
            .collect();

        let mut state = Self {
            mode,
            seed,
            curve: DifficultyCurve::from_tuning(&tuning),
            scheduler: SpawnScheduler::from_tuning(&tuning),
            tuning,
            arena,
            players,
            entities: Vec::new(),
            phase: GamePhase::Playing,
            time: 0.0,
            result: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.scheduler.start(state.time);

        log::info!(
            "Match started: mode={}, seed={}, arena={}x{}",
            mode.as_str(),
            seed,
            state.arena.width,
            state.arena.height
        );

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Cumulative score driving the difficulty curve (eliminated players stop contributing)
    pub fn score_basis(&self) -> u32 {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.score)
            .sum()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Page visibility changed. Hidden pages stop spawning; showing again
    /// restarts the spawn loop with a fresh immediate spawn.
    pub fn set_visible(&mut self, visible: bool) {
        if self.is_over() {
            return;
        }
        if visible {
            if self.scheduler.start(self.time) {
                log::info!("Spawning resumed at t={:.2}s", self.time);
            }
        } else if self.scheduler.stop() {
            log::info!("Spawning paused at t={:.2}s", self.time);
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove an entity by id, returning it
    pub fn remove_entity(&mut self, id: u32) -> Option<FallingEntity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }
}
