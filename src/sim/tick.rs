//! Fixed timestep simulation tick
//!
//! Order within one tick: owed spawns, catcher movement, entity kinematics,
//! then collision resolution (which drives elimination and the end of the match).

use super::collision::resolve_collisions;
use super::spawn::run_due_spawns;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Signed horizontal impulse per player, clamped to [-1, 1]
    pub impulses: [f32; 2],
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Input with only player 0 moving
    pub fn solo(impulse: f32) -> Self {
        Self {
            impulses: [impulse, 0.0],
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at t={:.2}s", state.time);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at t={:.2}s", state.time);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = dt.max(0.0);

    for (player, impulse) in state.players.iter_mut().zip(input.impulses) {
        if player.alive {
            player.catcher.set_impulse(impulse);
        }
    }

    run_due_spawns(state);

    state.time += dt as f64;

    let speed = state.tuning.catcher_speed;
    for player in state.players.iter_mut().filter(|p| p.alive) {
        player.catcher.step(dt, speed, &state.arena);
        player.elapsed += dt as f64;
    }

    let now = state.time;
    let arena_width = state.arena.width;
    for entity in &mut state.entities {
        entity.advance(dt, now, arena_width);
    }

    resolve_collisions(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mode;
    use crate::consts::SIM_DT;
    use crate::result::Outcome;
    use crate::sim::state::{EntityKind, FallingEntity, GameEvent};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn honeycomb(id: u32, kind: EntityKind, x: f32, y: f32, speed: f32) -> FallingEntity {
        FallingEntity {
            id,
            kind,
            points: if kind == EntityKind::Bonus { 3 } else { 1 },
            speed,
            x,
            y,
            initial_x: x,
            spawned_at: 0.0,
            sway: None,
            width: 40.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_first_tick_spawns_one_entity() {
        let mut state = GameState::new(Mode::Single, 12345, Tuning::default()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.entities.len(), 1);
        let e = &state.entities[0];
        assert!((e.y - (-10.0 + 100.0 * SIM_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(Mode::Single, 12345, Tuning::default()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        let time = state.time;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing moves while paused
        let y = state.entities[0].y;
        tick(&mut state, &TickInput::solo(1.0), SIM_DT);
        assert_eq!(state.time, time);
        assert_eq!(state.entities[0].y, y);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.time > time);
    }

    #[test]
    fn test_catcher_moves_and_clamps() {
        let mut state = GameState::new(Mode::Versus, 1, Tuning::default()).unwrap();
        state.scheduler.stop();

        let input = TickInput {
            impulses: [-1.0, 1.0],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!((state.players[0].catcher.x - (160.0 - 4.0)).abs() < 1e-3);
        assert!((state.players[1].catcher.x - (160.0 + 4.0)).abs() < 1e-3);

        for _ in 0..240 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.players[0].catcher.x, 0.0);
        assert_eq!(state.players[1].catcher.x, 320.0);
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut state = GameState::new(Mode::Versus, 1, Tuning::default()).unwrap();
        state.scheduler.stop();
        state.players[0].alive = false;
        let x = state.players[0].catcher.x;
        tick(
            &mut state,
            &TickInput {
                impulses: [1.0, 0.0],
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.players[0].catcher.x, x);
        assert_eq!(state.players[0].catcher.impulse, 0.0);
    }

    #[test]
    fn test_single_player_ends_on_fifth_miss() {
        let mut state = GameState::new(Mode::Single, 2, Tuning::default()).unwrap();
        state.scheduler.stop();
        // Five honeycombs stacked far from the catcher, each 50px apart
        for i in 0..5 {
            let kind = if i % 2 == 0 { EntityKind::Normal } else { EntityKind::Bonus };
            state
                .entities
                .push(honeycomb(100 + i, kind, 20.0, 590.0 - 50.0 * i as f32, 300.0));
        }

        let mut misses_seen = 0;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let misses = state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Missed { .. }))
                .count();
            misses_seen += misses;
            if misses_seen < 5 {
                assert!(!state.is_over(), "ended early after {misses_seen} misses");
            }
            if state.is_over() {
                break;
            }
        }

        assert_eq!(misses_seen, 5);
        assert!(state.is_over());
        assert_eq!(state.players[0].misses, 5);
        assert_eq!(state.players[0].lives(5), 0);
        assert_eq!(state.result.as_ref().map(|r| r.outcome), Some(Outcome::Solo));
    }

    #[test]
    fn test_versus_elimination_with_lead_ends_match() {
        let mut state = GameState::new(Mode::Versus, 6, Tuning::default()).unwrap();
        state.scheduler.stop();
        state.players[0].score = 4;
        state.players[1].score = 3;
        state.players[1].misses = 4;
        // Right half, away from the right catcher (560..640)
        state.entities.push(honeycomb(50, EntityKind::Normal, 700.0, 598.0, 300.0));

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(!state.players[1].alive);
        assert!(state.is_over());
        assert_eq!(
            state.result.as_ref().map(|r| r.outcome),
            Some(Outcome::Winner { player: 0 })
        );
    }

    #[test]
    fn test_versus_tied_survivor_plays_on() {
        let mut state = GameState::new(Mode::Versus, 6, Tuning::default()).unwrap();
        state.scheduler.stop();
        state.players[0].score = 3;
        state.players[1].score = 3;
        state.players[1].misses = 4;
        state.entities.push(honeycomb(50, EntityKind::Normal, 700.0, 598.0, 300.0));
        // Still falling in the right half; purged by the elimination
        state.entities.push(honeycomb(51, EntityKind::Normal, 450.0, 100.0, 300.0));
        // Left half, lands on the left catcher (160..240, top 510) a few ticks later
        state.entities.push(honeycomb(52, EntityKind::Normal, 180.0, 460.0, 300.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.players[1].alive);
        assert!(!state.is_over());
        assert_eq!(state.entities.iter().map(|e| e.id).collect::<Vec<_>>(), vec![52]);

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.is_over() {
                break;
            }
        }
        assert_eq!(state.players[0].score, 4);
        assert_eq!(
            state.result.as_ref().map(|r| r.outcome),
            Some(Outcome::Winner { player: 0 })
        );
    }

    #[test]
    fn test_elapsed_freezes_on_elimination() {
        let mut state = GameState::new(Mode::Versus, 4, Tuning::default()).unwrap();
        state.scheduler.stop();
        state.players[0].score = 1;
        state.players[1].score = 1;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        crate::sim::match_control::eliminate(&mut state, 1);
        let frozen = state.players[1].elapsed;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!((frozen - 1.0).abs() < 1e-3);
        assert_eq!(state.players[1].elapsed, frozen);
        assert!((state.players[0].elapsed - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_page_spawns_nothing() {
        let mut state = GameState::new(Mode::Single, 8, Tuning::default()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.entities.len(), 1);

        state.set_visible(false);
        for _ in 0..1200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let spawned = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1, "only the initial spawn");

        // Coming back spawns right away with a fresh interval
        state.set_visible(true);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let spawned = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(Mode::Versus, 99999, Tuning::default()).unwrap();
        let mut state2 = GameState::new(Mode::Versus, 99999, Tuning::default()).unwrap();

        let inputs = [
            TickInput {
                impulses: [1.0, -1.0],
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                impulses: [-1.0, 0.0],
                ..Default::default()
            },
        ];

        for step in 0..3000 {
            let input = &inputs[(step / 100) % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.players, state2.players);
        assert_eq!(state1.phase, state2.phase);
    }

    #[test]
    fn test_speed_fixed_at_spawn() {
        let mut state = GameState::new(Mode::Single, 21, Tuning::default()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        let id = state.entities[0].id;
        state.players[0].score = 500;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let e = state.entities.iter().find(|e| e.id == id).unwrap();
        assert_eq!(e.speed, 100.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_catcher_stays_in_half(
            impulses in proptest::collection::vec(-3.0f32..3.0, 1..400),
        ) {
            let mut state = GameState::new(Mode::Versus, 3, Tuning::default()).unwrap();
            state.scheduler.stop();
            for imp in impulses {
                let input = TickInput { impulses: [imp, -imp], ..Default::default() };
                tick(&mut state, &input, SIM_DT);
                for p in &state.players {
                    let max = state.arena.half_width() - p.catcher.width;
                    prop_assert!(p.catcher.x >= 0.0 && p.catcher.x <= max);
                }
            }
        }

        #[test]
        fn prop_misses_never_decrease(seed in any::<u64>()) {
            let mut state = GameState::new(Mode::Versus, seed, Tuning::default()).unwrap();
            let mut last = vec![0u32; 2];
            for _ in 0..2400 {
                tick(&mut state, &TickInput::default(), SIM_DT);
                let max = state.tuning.max_misses;
                for (p, prev) in state.players.iter().zip(last.iter_mut()) {
                    prop_assert!(p.misses >= *prev);
                    prop_assert!(p.misses <= max);
                    prop_assert_eq!(p.lives(max), max - p.misses);
                    *prev = p.misses;
                }
                if state.is_over() {
                    break;
                }
            }
        }
    }
}
