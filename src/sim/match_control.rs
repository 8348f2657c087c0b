//! Lives, elimination and end-of-match rules

use super::state::{GameEvent, GamePhase, GameState, PlayerState};
use crate::Mode;
use crate::consts::WINNING_LEAD;
use crate::result::{MatchResult, Outcome};

/// Charge `player` one life; eliminates them once their misses reach the maximum
pub fn penalize(state: &mut GameState, player: usize) {
    let max_misses = state.tuning.max_misses;
    let Some(p) = state.players.get_mut(player) else {
        return;
    };
    if !p.alive {
        return;
    }
    p.misses += 1;
    log::debug!(
        "Player {} lost a life ({} left)",
        player + 1,
        p.lives(max_misses)
    );
    if p.misses >= max_misses {
        eliminate(state, player);
    }
}

/// Take `player` out of the match and evaluate whether it is over
pub fn eliminate(state: &mut GameState, player: usize) {
    let Some(p) = state.players.get_mut(player) else {
        return;
    };
    if !p.alive {
        return;
    }
    p.alive = false;
    p.catcher.set_impulse(0.0);

    // Entities in that half can no longer be caught or missed by anyone
    let arena = state.arena;
    state
        .entities
        .retain(|e| arena.half_count > 1 && arena.half_of(e.center_x()) != player);

    state.events.push(GameEvent::Eliminated { player });
    log::info!(
        "Player {} eliminated with {} points",
        player + 1,
        state.players[player].score
    );

    match state.mode {
        Mode::Single => finish(state, Outcome::Solo),
        Mode::Versus => {
            if state.alive_count() == 0 {
                let outcome = decide_by_score(&state.players);
                finish(state, outcome);
            } else if let Some(winner) = leader_over_eliminated(state) {
                finish(state, Outcome::Winner { player: winner });
            }
        }
    }
}

/// Lead check after a scoring catch. Only matters once one side is out.
pub fn after_catch(state: &mut GameState) {
    if let Some(winner) = leader_over_eliminated(state) {
        finish(state, Outcome::Winner { player: winner });
    }
}

/// The survivor, if exactly one player of two is left and leads the other by
/// at least [`WINNING_LEAD`]
pub fn leader_over_eliminated(state: &GameState) -> Option<usize> {
    if state.players.len() != 2 || state.alive_count() != 1 {
        return None;
    }
    let survivor = state.players.iter().position(|p| p.alive)?;
    let loser = 1 - survivor;
    let lead = state.players[survivor]
        .score
        .saturating_sub(state.players[loser].score);
    (lead >= WINNING_LEAD).then_some(survivor)
}

/// Both players out: higher score wins, equal scores draw
pub fn decide_by_score(players: &[PlayerState]) -> Outcome {
    match players {
        [a, b] if a.score > b.score => Outcome::Winner { player: a.index },
        [a, b] if b.score > a.score => Outcome::Winner { player: b.index },
        [_, _] => Outcome::Draw,
        _ => Outcome::Solo,
    }
}

fn finish(state: &mut GameState, outcome: Outcome) {
    if state.is_over() {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.scheduler.stop();
    for p in &mut state.players {
        p.catcher.set_impulse(0.0);
    }

    let result = MatchResult::from_state(state, outcome);
    log::info!("Game over: {:?} ({})", outcome, result.to_query());
    state.result = Some(result);
    state.events.push(GameEvent::GameOver { outcome });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, FallingEntity};
    use crate::tuning::Tuning;

    fn versus() -> GameState {
        let mut state = GameState::new(Mode::Versus, 9, Tuning::default()).unwrap();
        state.scheduler.stop();
        state
    }

    fn falling(id: u32, x: f32) -> FallingEntity {
        FallingEntity {
            id,
            kind: EntityKind::Normal,
            points: 1,
            speed: 100.0,
            x,
            y: 100.0,
            initial_x: x,
            spawned_at: 0.0,
            sway: None,
            width: 40.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_misses_count_up_to_elimination() {
        let mut state = GameState::new(Mode::Single, 9, Tuning::default()).unwrap();
        for expected in 1..=4 {
            penalize(&mut state, 0);
            assert_eq!(state.players[0].misses, expected);
            assert_eq!(state.players[0].lives(5), 5 - expected);
            assert!(!state.is_over());
        }
        penalize(&mut state, 0);
        assert!(state.is_over());
        assert!(!state.players[0].alive);
        assert_eq!(state.result.as_ref().map(|r| r.outcome), Some(Outcome::Solo));
        assert!(!state.scheduler.is_spawning());
    }

    #[test]
    fn test_elimination_purges_half_and_zeroes_impulse() {
        let mut state = versus();
        state.players[1].score = 2;
        state.players[0].score = 2;
        state.players[0].catcher.set_impulse(1.0);
        state.entities.push(falling(1, 10.0));
        state.entities.push(falling(2, 370.0)); // centre 390, left half
        state.entities.push(falling(3, 390.0)); // centre 410, right half
        state.entities.push(falling(4, 700.0));

        eliminate(&mut state, 0);

        assert!(!state.players[0].alive);
        assert_eq!(state.players[0].catcher.impulse, 0.0);
        let ids: Vec<u32> = state.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(!state.is_over(), "tied survivor keeps playing");
    }

    #[test]
    fn test_survivor_with_lead_wins_immediately() {
        let mut state = versus();
        state.players[0].score = 4;
        state.players[1].score = 3;
        eliminate(&mut state, 1);
        assert!(state.is_over());
        assert_eq!(
            state.result.as_ref().map(|r| r.outcome),
            Some(Outcome::Winner { player: 0 })
        );
    }

    #[test]
    fn test_tied_survivor_continues_until_ahead() {
        let mut state = versus();
        state.players[0].score = 3;
        state.players[1].score = 3;
        eliminate(&mut state, 1);
        assert!(!state.is_over());

        state.players[0].score += 1;
        after_catch(&mut state);
        assert!(state.is_over());
        assert_eq!(
            state.result.as_ref().map(|r| r.outcome),
            Some(Outcome::Winner { player: 0 })
        );
    }

    #[test]
    fn test_lead_not_checked_while_both_alive() {
        let mut state = versus();
        state.players[0].score = 50;
        after_catch(&mut state);
        assert!(!state.is_over());
    }

    #[test]
    fn test_trailing_survivor_eliminated_loses() {
        let mut state = versus();
        state.players[0].score = 5;
        state.players[1].score = 2;
        eliminate(&mut state, 0);
        assert!(!state.is_over());
        eliminate(&mut state, 1);
        assert_eq!(
            state.result.as_ref().map(|r| r.outcome),
            Some(Outcome::Winner { player: 0 })
        );
    }

    #[test]
    fn test_double_elimination_on_equal_scores_is_draw() {
        let mut state = versus();
        state.players[0].score = 3;
        state.players[1].score = 3;
        eliminate(&mut state, 1);
        eliminate(&mut state, 0);
        assert_eq!(state.result.as_ref().map(|r| r.outcome), Some(Outcome::Draw));
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::GameOver {
                outcome: Outcome::Draw
            })
        );
    }

    #[test]
    fn test_penalizing_eliminated_player_is_noop() {
        let mut state = versus();
        state.players[0].score = 1;
        state.players[1].score = 1;
        eliminate(&mut state, 1);
        let misses = state.players[1].misses;
        penalize(&mut state, 1);
        assert_eq!(state.players[1].misses, misses);
    }

    #[test]
    fn test_decide_by_score() {
        let mut state = versus();
        assert_eq!(decide_by_score(&state.players), Outcome::Draw);
        state.players[1].score = 2;
        assert_eq!(decide_by_score(&state.players), Outcome::Winner { player: 1 });

        let single = GameState::new(Mode::Single, 9, Tuning::default()).unwrap();
        assert_eq!(decide_by_score(&single.players), Outcome::Solo);
    }
}
