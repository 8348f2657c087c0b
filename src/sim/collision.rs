//! Catch and miss detection
//!
//! Every tick each live entity is tested against the one catcher allowed to
//! touch it (the owner of the half holding the entity's centre), then against
//! the miss line.

use super::match_control;
use super::state::{Arena, FallingEntity, GameEvent, GameState, PlayerState};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Overlap test; touching edges count as contact
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && self.right() >= other.left
            && self.top <= other.bottom()
            && self.bottom() >= other.top
    }
}

/// What happened to an entity this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Caught by `player`
    Catch { player: usize },
    /// Crossed the miss line. `victim` is None for obstacles.
    Miss { victim: Option<usize> },
}

/// The only player whose catcher may touch an entity centred at `center_x`
pub fn eligible_catcher(arena: &Arena, center_x: f32) -> usize {
    arena.half_of(center_x)
}

/// Who pays for a missed honeycomb: the owner of the half it fell in, or the
/// other player if the owner is already out
pub fn miss_victim(arena: &Arena, players: &[PlayerState], center_x: f32) -> Option<usize> {
    let natural = arena.half_of(center_x);
    if players.get(natural).is_some_and(|p| p.alive) {
        return Some(natural);
    }
    players.iter().find(|p| p.alive).map(|p| p.index)
}

/// Classify an entity against the current catcher positions
pub fn detect_contact(
    entity: &FallingEntity,
    players: &[PlayerState],
    arena: &Arena,
) -> Option<Contact> {
    let player = eligible_catcher(arena, entity.center_x());
    if let Some(p) = players.get(player).filter(|p| p.alive) {
        if p.catcher.rect(arena, player).intersects(&entity.rect()) {
            return Some(Contact::Catch { player });
        }
    }

    if entity.y > arena.height {
        let victim = if entity.kind.is_obstacle() {
            None
        } else {
            miss_victim(arena, players, entity.center_x())
        };
        return Some(Contact::Miss { victim });
    }

    None
}

/// Resolve catches and misses for every live entity, in id order
pub fn resolve_collisions(state: &mut GameState) {
    let ids: Vec<u32> = state.entities.iter().map(|e| e.id).collect();

    for id in ids {
        if state.is_over() {
            break;
        }
        // May already be gone if an elimination purged its half
        let Some(entity) = state.entities.iter().find(|e| e.id == id) else {
            continue;
        };
        let Some(contact) = detect_contact(entity, &state.players, &state.arena) else {
            continue;
        };
        let Some(entity) = state.remove_entity(id) else {
            continue;
        };

        match contact {
            Contact::Catch { player } if entity.kind.is_obstacle() => {
                state.events.push(GameEvent::ObstacleCaught {
                    player,
                    at: entity.center(),
                });
                match_control::penalize(state, player);
            }
            Contact::Catch { player } => {
                state.players[player].score += entity.points;
                state.events.push(GameEvent::Caught {
                    player,
                    kind: entity.kind,
                    points: entity.points,
                    at: entity.center(),
                });
                match_control::after_catch(state);
            }
            Contact::Miss { victim: None } if entity.kind.is_obstacle() => {
                state.events.push(GameEvent::ObstacleDodged { id });
            }
            Contact::Miss { victim: Some(player) } => {
                state.events.push(GameEvent::Missed {
                    player,
                    kind: entity.kind,
                });
                match_control::penalize(state, player);
            }
            Contact::Miss { victim: None } => {}
        }
    }
}
