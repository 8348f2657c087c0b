//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod match_control;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Contact, Rect, detect_contact, resolve_collisions};
pub use difficulty::DifficultyCurve;
pub use spawn::{SchedulerState, SpawnScheduler};
pub use state::{
    Arena, Catcher, EntityKind, Facing, FallingEntity, GameEvent, GamePhase, GameState,
    PlayerState, Sway,
};
pub use tick::{TickInput, tick};
