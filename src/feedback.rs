//! Cosmetic feedback cues
//!
//! Maps simulation events to the short-lived effects the presentation layer
//! plays: sparkles, floating score popups and temporary catcher faces. None of
//! these feed back into the simulation; a headless run can ignore them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{EntityKind, GameEvent};

/// Floating popup image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Popup {
    PlusOne,
    PlusThree,
    HeartLost,
}

/// Temporary catcher expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// Single frame after a bonus catch
    Happy,
    /// Two alternating frames after catching a leaf
    Disgusted,
}

impl Expression {
    /// How long the face is held before the default sprite returns (ms)
    pub fn duration_ms(&self) -> u32 {
        match self {
            Expression::Happy => 700,
            Expression::Disgusted => 900,
        }
    }

    /// Frame period for animated expressions (ms)
    pub fn frame_ms(&self) -> Option<u32> {
        match self {
            Expression::Happy => None,
            Expression::Disgusted => Some(220),
        }
    }
}

/// Sparkle animation: six frames of 70 ms
pub const SPARKLE_FRAMES: u32 = 6;
pub const SPARKLE_FRAME_MS: u32 = 70;
/// Popup rises this far while fading out
pub const POPUP_RISE_PX: f32 = 36.0;
pub const POPUP_DURATION_MS: u32 = 800;
/// Popup starts this far above the catch point
pub const POPUP_OFFSET_PX: f32 = 24.0;

/// One effect to play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    Sparkle { at: Vec2 },
    Popup { popup: Popup, at: Vec2 },
    Face { player: usize, expression: Expression },
    /// Remove one life icon
    LifeLost { player: usize },
    /// Grey out a player's half
    PlayerDown { player: usize },
}

/// Effects for an event, filtered by the player's preferences
pub fn cues_for(event: &GameEvent, settings: &Settings) -> Vec<Cue> {
    let mut cues = Vec::new();
    let effects = settings.effective_effects();

    match *event {
        GameEvent::Caught {
            player, kind, at, ..
        } => {
            if effects {
                let popup = if kind == EntityKind::Bonus {
                    Popup::PlusThree
                } else {
                    Popup::PlusOne
                };
                cues.push(Cue::Sparkle { at });
                cues.push(Cue::Popup {
                    popup,
                    at: at - Vec2::Y * POPUP_OFFSET_PX,
                });
            }
            if kind == EntityKind::Bonus && settings.expressions {
                cues.push(Cue::Face {
                    player,
                    expression: Expression::Happy,
                });
            }
        }
        GameEvent::ObstacleCaught { player, at } => {
            if effects {
                cues.push(Cue::Sparkle { at });
                cues.push(Cue::Popup {
                    popup: Popup::HeartLost,
                    at: at - Vec2::Y * POPUP_OFFSET_PX,
                });
            }
            if settings.expressions {
                cues.push(Cue::Face {
                    player,
                    expression: Expression::Disgusted,
                });
            }
            cues.push(Cue::LifeLost { player });
        }
        GameEvent::Missed { player, .. } => cues.push(Cue::LifeLost { player }),
        GameEvent::Eliminated { player } => cues.push(Cue::PlayerDown { player }),
        GameEvent::Spawned { .. } | GameEvent::ObstacleDodged { .. } | GameEvent::GameOver { .. } => {}
    }

    cues
}
