//! Read-only view of a match for the presentation layer
//!
//! Everything is already in arena pixels; the renderer only draws.

use serde::{Deserialize, Serialize};

use crate::format_elapsed;
use crate::sim::{EntityKind, Facing, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatcherView {
    /// Left edge in arena coordinates
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub score: u32,
    pub misses: u32,
    pub lives: u32,
    /// `m:ss:d`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub catchers: Vec<CatcherView>,
    pub entities: Vec<EntityView>,
    pub players: Vec<PlayerView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let max_misses = state.tuning.max_misses;
        Self {
            phase: state.phase,
            width: state.arena.width,
            height: state.arena.height,
            catchers: state
                .players
                .iter()
                .map(|p| {
                    let rect = p.catcher.rect(&state.arena, p.index);
                    CatcherView {
                        x: rect.left,
                        y: rect.top,
                        width: rect.width,
                        height: rect.height,
                        facing: p.catcher.facing,
                        alive: p.alive,
                    }
                })
                .collect(),
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    x: e.x,
                    y: e.y,
                })
                .collect(),
            players: state
                .players
                .iter()
                .map(|p| PlayerView {
                    score: p.score,
                    misses: p.misses,
                    lives: p.lives(max_misses),
                    time: format_elapsed(p.elapsed),
                })
                .collect(),
        }
    }
}
