//! Catch The Honey entry point
//!
//! Browser builds drive the simulation from `requestAnimationFrame` and hand
//! each frame to the page's renderer. Native builds run a headless match with
//! a simple autopilot and print the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, VisibilityState};

    use catch_the_honey::consts::*;
    use catch_the_honey::feedback::cues_for;
    use catch_the_honey::sim::{GameState, tick};
    use catch_the_honey::{ConfigError, InputState, Mode, Settings, Snapshot};

    // The page supplies `window.honeyPresent(snapshot, cues)` to draw a frame
    #[wasm_bindgen(inline_js = "
        export function present(snapshot, cues) {
            if (typeof window.honeyPresent === 'function') {
                window.honeyPresent(JSON.parse(snapshot), JSON.parse(cues));
            }
        }
    ")]
    extern "C" {
        fn present(snapshot: &str, cues: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        navigated: bool,
    }

    impl Game {
        fn new(mode: Mode, seed: u64, settings: Settings) -> Result<Self, ConfigError> {
            let tuning = settings.tuning_for(mode);
            Ok(Self {
                state: GameState::new(mode, seed, tuning)?,
                input: InputState::new(mode),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                navigated: false,
            })
        }

        /// Run simulation ticks
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Hand the frame to the page
        fn present(&mut self) {
            let cues: Vec<_> = self
                .state
                .drain_events()
                .iter()
                .flat_map(|e| cues_for(e, &self.settings))
                .collect();
            let snapshot = Snapshot::capture(&self.state);
            match (serde_json::to_string(&snapshot), serde_json::to_string(&cues)) {
                (Ok(snapshot), Ok(cues)) => present(&snapshot, &cues),
                (Err(e), _) | (_, Err(e)) => log::error!("Failed to encode frame: {}", e),
            }
        }

        /// Navigate to the game-over page once the match is decided
        fn finish_if_over(&mut self) {
            if self.navigated {
                return;
            }
            let Some(result) = &self.state.result else {
                return;
            };
            self.navigated = true;
            let url = result.game_over_url();
            log::info!("Navigating to {}", url);
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(&url) {
                    log::error!("Navigation failed: {:?}", e);
                }
            }
        }

        fn set_visible(&mut self, visible: bool) {
            self.state.set_visible(visible);
            // Don't replay the time spent hidden
            self.last_time = 0.0;
            self.accumulator = 0.0;
            if !visible {
                self.input.clear();
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Catch The Honey starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut settings = Settings::load();
        // Pages declare their mode with <body data-mode="versus">
        let mode = document
            .body()
            .and_then(|body| body.get_attribute("data-mode"))
            .and_then(|m| Mode::from_str(&m))
            .unwrap_or(settings.mode);
        if settings.mode != mode {
            settings.mode = mode;
            settings.save();
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(mode, seed, settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(game));

        log::info!("Game initialized: mode={}, seed={}", mode.as_str(), seed);

        setup_input_handlers(&document, game.clone());
        request_animation_frame(game);

        log::info!("Catch The Honey running!");
        Ok(())
    }

    fn setup_input_handlers(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ =
                document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change - stop spawning while hidden
        {
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = doc.visibility_state() != VisibilityState::Hidden;
                log::info!("Visibility changed: visible={}", visible);
                game.borrow_mut().set_visible(visible);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur - release held keys
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let next = frame.clone();

        *frame.borrow_mut() = Some(Closure::new(move |time: f64| {
            {
                let mut g = game.borrow_mut();
                g.update(time);
                g.present();
                g.finish_if_over();
                if g.navigated {
                    return;
                }
            }
            if let (Some(window), Some(cb)) = (web_sys::window(), next.borrow().as_ref()) {
                let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));

        if let (Some(window), Some(cb)) = (web_sys::window(), frame.borrow().as_ref()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use catch_the_honey::Mode;

    env_logger::init();
    log::info!("Catch The Honey (native) starting...");

    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .and_then(|m| Mode::from_str(&m))
        .unwrap_or(Mode::Single);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    match autopilot::play(mode, seed, autopilot::MAX_SECONDS) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode result: {}", e),
        },
        Err(e) => {
            log::error!("Cannot start match: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo player
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use catch_the_honey::consts::SIM_DT;
    use catch_the_honey::sim::match_control::decide_by_score;
    use catch_the_honey::sim::{GameState, TickInput, tick};
    use catch_the_honey::{ConfigError, MatchResult, Mode, Tuning};

    /// Give up after this much simulated time
    pub const MAX_SECONDS: f64 = 600.0;
    /// Stop steering when this close to the target (px)
    const DEADZONE: f32 = 6.0;

    /// Play a match, steering each catcher under the lowest honeycomb in its half
    pub fn play(mode: Mode, seed: u64, max_seconds: f64) -> Result<MatchResult, ConfigError> {
        let mut state = GameState::new(mode, seed, Tuning::default())?;
        // Player 2 plays sloppily so two-player matches end
        let reaction = [1.0, 0.6];

        while !state.is_over() && state.time < max_seconds {
            let mut input = TickInput::default();
            for (i, player) in state.players.iter().enumerate() {
                let half_start = state.arena.half_start(i);
                let centre = half_start + player.catcher.x + player.catcher.width / 2.0;
                let target = state
                    .entities
                    .iter()
                    .filter(|e| !e.kind.is_obstacle() && state.arena.half_of(e.center_x()) == i)
                    .max_by(|a, b| a.y.total_cmp(&b.y))
                    .map(|e| e.center_x());
                if let Some(target) = target {
                    let delta = target - centre;
                    if delta.abs() > DEADZONE {
                        input.impulses[i] = delta.signum() * reaction[i];
                    }
                }
            }
            tick(&mut state, &input, SIM_DT);

            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        Ok(match state.result {
            Some(result) => result,
            None => {
                log::warn!("Match still running after {:.0}s, stopping", max_seconds);
                MatchResult::from_state(&state, decide_by_score(&state.players))
            }
        })
    }

}
