//! Adaptive spawn scheduling
//!
//! The delay between spawns is `gap / speed`, so consecutive entities stay
//! roughly `gap` pixels apart no matter how fast they fall.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Arena, EntityKind, FallingEntity, GameEvent, GameState, PlayerState, Sway};
use crate::consts::FALLBACK_SPAWN_INTERVAL_MS;
use crate::tuning::Tuning;

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    /// Next spawn is owed at `next_at` (simulation seconds)
    Spawning { next_at: f64 },
}

/// Decides when the next entity appears
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub state: SchedulerState,
    pub gap_distance: f32,
    pub min_interval_ms: u32,
}

/// Tolerance for comparing the float clock against scheduled instants
const CLOCK_EPSILON: f64 = 1e-9;

impl SpawnScheduler {
    pub fn new(gap_distance: f32, min_interval_ms: u32) -> Self {
        Self {
            state: SchedulerState::Idle,
            gap_distance,
            min_interval_ms,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.spawn_gap_distance, tuning.min_spawn_interval_ms)
    }

    /// Idle → Spawning with a spawn owed right away. Returns false if already spawning.
    pub fn start(&mut self, now: f64) -> bool {
        match self.state {
            SchedulerState::Spawning { .. } => false,
            SchedulerState::Idle => {
                self.state = SchedulerState::Spawning { next_at: now };
                true
            }
        }
    }

    /// Spawning → Idle, dropping the pending spawn. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        let was_spawning = self.is_spawning();
        self.state = SchedulerState::Idle;
        was_spawning
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        matches!(self.state, SchedulerState::Spawning { .. })
    }

    pub fn next_at(&self) -> Option<f64> {
        match self.state {
            SchedulerState::Spawning { next_at } => Some(next_at),
            SchedulerState::Idle => None,
        }
    }

    /// The scheduled instant, if a spawn is owed at `now`
    pub fn due(&self, now: f64) -> Option<f64> {
        self.next_at().filter(|at| *at <= now + CLOCK_EPSILON)
    }

    /// Delay before the next spawn for entities falling at `speed` px/s
    pub fn interval_ms(&self, speed: f32) -> u32 {
        if !(speed > 0.0) {
            return FALLBACK_SPAWN_INTERVAL_MS;
        }
        let ms = (self.gap_distance / speed * 1000.0).round();
        // Never zero, or catch-up spawning would never advance the clock
        (ms as u32).max(self.min_interval_ms).max(1)
    }

    /// Schedule the next spawn `interval_ms(speed)` after `at`. No-op while idle.
    pub fn schedule_after(&mut self, at: f64, speed: f32) -> Option<u32> {
        if !self.is_spawning() {
            return None;
        }
        let interval = self.interval_ms(speed);
        self.state = SchedulerState::Spawning {
            next_at: at + interval as f64 / 1000.0,
        };
        Some(interval)
    }
}

/// Pick a variant from a uniform draw in [0, 1)
pub fn roll_kind(r: f32, tuning: &Tuning) -> EntityKind {
    if r < tuning.obstacle_chance {
        EntityKind::Obstacle
    } else if r < tuning.obstacle_chance + tuning.bonus_chance {
        EntityKind::Bonus
    } else {
        EntityKind::Normal
    }
}

/// Horizontal range `[lo, hi)` new entities may occupy: the whole arena while
/// every half is alive, otherwise the surviving half. None if nobody is alive.
pub fn spawn_span(arena: &Arena, players: &[PlayerState]) -> Option<(f32, f32)> {
    let alive: Vec<usize> = players.iter().filter(|p| p.alive).map(|p| p.index).collect();
    match alive.as_slice() {
        [] => None,
        [only] if players.len() > 1 => {
            let lo = arena.half_start(*only);
            Some((lo, lo + arena.half_width()))
        }
        _ => Some((0.0, arena.width)),
    }
}

/// Create one entity falling at `speed`. Returns its id, or None if nobody is alive.
pub fn spawn_entity(state: &mut GameState, speed: f32) -> Option<u32> {
    let (lo, hi) = spawn_span(&state.arena, &state.players)?;

    let kind = roll_kind(state.rng.random::<f32>(), &state.tuning);
    let width = state.tuning.entity_width;
    let room = ((hi - lo) - width).max(0.0);
    let x = lo + state.rng.random::<f32>() * room;

    let sway = kind.is_obstacle().then(|| Sway {
        amplitude: state.tuning.sway_amplitude,
        frequency: state.tuning.sway_frequency,
        phase: state.rng.random::<f32>() * std::f32::consts::TAU,
    });

    let id = state.next_entity_id();
    state.entities.push(FallingEntity {
        id,
        kind,
        points: kind.points(&state.tuning),
        speed,
        x,
        y: state.tuning.spawn_y,
        initial_x: x,
        spawned_at: state.time,
        sway,
        width,
        height: state.tuning.entity_height,
    });
    state.events.push(GameEvent::Spawned { id, kind });
    log::debug!("Spawned #{} {:?} at x={:.1}, speed={:.1}", id, kind, x, speed);

    Some(id)
}

/// Fire every spawn owed at the current simulation time
pub fn run_due_spawns(state: &mut GameState) {
    while let Some(at) = state.scheduler.due(state.time) {
        let speed = state.curve.speed(state.score_basis() as f32);
        spawn_entity(state, speed);
        state.scheduler.schedule_after(at, speed);
    }
}
