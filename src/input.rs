//! Keyboard input handling
//!
//! Turns key presses and releases into a signed impulse per player. One
//! player uses the arrow keys. With two players, the left one uses A/D and
//! the right one uses the arrow keys.

use crate::Mode;
use crate::sim::TickInput;

/// Which way a key pushes its catcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn impulse(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Map a `KeyboardEvent.key` value to (player, direction)
pub fn binding(mode: Mode, key: &str) -> Option<(usize, Direction)> {
    let key = key.to_lowercase();
    match (mode, key.as_str()) {
        (Mode::Single, "arrowleft") => Some((0, Direction::Left)),
        (Mode::Single, "arrowright") => Some((0, Direction::Right)),
        (Mode::Versus, "a") => Some((0, Direction::Left)),
        (Mode::Versus, "d") => Some((0, Direction::Right)),
        (Mode::Versus, "arrowleft") => Some((1, Direction::Left)),
        (Mode::Versus, "arrowright") => Some((1, Direction::Right)),
        _ => None,
    }
}

/// Held-key state for every player
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: Mode,
    impulses: [f32; 2],
    pause_requested: bool,
}

impl InputState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Handle key down. Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        if key.eq_ignore_ascii_case("p") || key == "Escape" {
            self.pause_requested = true;
            return true;
        }
        match binding(self.mode, key) {
            Some((player, dir)) => {
                self.impulses[player] = dir.impulse();
                true
            }
            None => false,
        }
    }

    /// Handle key up. Only stops the catcher if it was moving the released key's way.
    pub fn key_up(&mut self, key: &str) -> bool {
        match binding(self.mode, key) {
            Some((player, dir)) => {
                if self.impulses[player] * dir.impulse() > 0.0 {
                    self.impulses[player] = 0.0;
                }
                true
            }
            None => false,
        }
    }

    pub fn impulse(&self, player: usize) -> f32 {
        self.impulses.get(player).copied().unwrap_or(0.0)
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.impulses = [0.0; 2];
        self.pause_requested = false;
    }

    /// Input for the next tick. One-shot requests are consumed.
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            impulses: self.impulses,
            pause: std::mem::take(&mut self.pause_requested),
        }
    }
}
