//! Final match record
//!
//! Handed to the game-over screen as query parameters, mirroring what the
//! score pages expect: `score`/`time` for one player, `score0`/`time0`/
//! `score1`/`time1` for two.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::Mode;
use crate::format_elapsed;
use crate::sim::GameState;

/// How the match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Single-player run ended
    Solo,
    Winner { player: usize },
    /// Both players out on equal scores
    Draw,
}

/// One player's line on the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub score: u32,
    /// Elapsed time formatted as `m:ss:d`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub mode: Mode,
    pub outcome: Outcome,
    pub players: Vec<PlayerResult>,
}

impl MatchResult {
    pub fn from_state(state: &GameState, outcome: Outcome) -> Self {
        Self {
            mode: state.mode,
            outcome,
            players: state
                .players
                .iter()
                .map(|p| PlayerResult {
                    score: p.score,
                    time: format_elapsed(p.elapsed),
                })
                .collect(),
        }
    }

    /// Form-encoded query string for the game-over page
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self.mode {
            Mode::Single => {
                if let Some(p) = self.players.first() {
                    query
                        .append_pair("score", &p.score.to_string())
                        .append_pair("time", &p.time);
                }
            }
            Mode::Versus => {
                for (i, p) in self.players.iter().enumerate() {
                    query
                        .append_pair(&format!("score{i}"), &p.score.to_string())
                        .append_pair(&format!("time{i}"), &p.time);
                }
            }
        }
        query.finish()
    }

    /// Page the browser navigates to when the match ends
    pub fn game_over_page(&self) -> &'static str {
        match self.mode {
            Mode::Single => "gameover.html",
            Mode::Versus => "gameover-multiplayer.html",
        }
    }

    /// `page?query`
    pub fn game_over_url(&self) -> String {
        format!("{}?{}", self.game_over_page(), self.to_query())
    }
}
