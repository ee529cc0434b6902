//! Swarm Defender entry point
//!
//! On WASM this wires the session to the page: canvas, keyboard, focus and
//! the animation-frame loop. Natively it runs a headless autopilot game.

#[cfg(not(target_arch = "wasm32"))]
use swarm_defender::Tuning;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use swarm_defender::audio::{AudioPrefs, WebAudio};
    use swarm_defender::platform::{FrameClock, Key, LocalStorage};
    use swarm_defender::renderer::CanvasRenderer;
    use swarm_defender::sim::Arena;
    use swarm_defender::{Session, Tuning};

    /// Everything the frame loop touches
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        clock: FrameClock,
        audio_unlocked: bool,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            self.session.update(dt);
            self.renderer.render(self.session.state());
        }

        fn key_down(&mut self, key: Key) {
            if !self.audio_unlocked {
                self.session.unlock_audio();
                self.audio_unlocked = true;
            }
            self.session.key_down(key);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Swarm Defender starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("game")
            .or_else(|| document.get_element_by_id("canvas"))
            .map(|el| el.dyn_into::<HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            _ => {
                log::error!("No <canvas id=\"game\"> element found");
                return;
            }
        };

        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas 2D context unavailable: {:?}", e);
                return;
            }
        };

        let arena = Arena::new(canvas.width() as f32, canvas.height() as f32);
        let storage = LocalStorage::new();
        let prefs = AudioPrefs::load(&storage);
        let seed = js_sys::Date::now() as u64;

        let session = Session::new(
            seed,
            arena,
            Tuning::default(),
            Box::new(storage),
            Box::new(WebAudio::new(prefs)),
        );

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            clock: FrameClock::new(),
            audio_unlocked: false,
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Swarm Defender running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else { return };
                if key.scrolls_page() {
                    event.prevent_default();
                }
                game.borrow_mut().key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().session.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Tab hidden (switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.session.focus_lost();
                } else {
                    // Skip the gap so the first visible frame is not a huge step
                    g.clock.reset();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Swarm Defender (native) starting...");
    log::info!("Native mode runs a headless demo - serve the WASM build for the real game");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    demo::run(seed, tuning, demo::DEMO_TICKS);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use swarm_defender::audio::{AudioPrefs, NullAudio};
    use swarm_defender::platform::{Key, MemoryStorage};
    use swarm_defender::sim::{Arena, GamePhase};
    use swarm_defender::{Session, Tuning};

    /// Two minutes at 60 fps
    pub const DEMO_TICKS: u32 = 7200;
    const FRAME_DT: f32 = 1.0 / 60.0;

    pub fn run(seed: u64, tuning: Tuning, ticks: u32) {
        let mut session = Session::new(
            seed,
            Arena::default(),
            tuning,
            Box::new(MemoryStorage::new()),
            Box::new(NullAudio::new(AudioPrefs::default())),
        );

        let mut frames = 0;
        while frames < ticks && session.state().phase == GamePhase::Playing {
            steer(&mut session);
            session.update(FRAME_DT);
            frames += 1;
        }

        let state = session.state();
        log::info!(
            "Demo finished after {} frames ({:.1}s): {:?}, score {}, level {}, lives {}, {} enemies left",
            frames,
            state.elapsed,
            state.phase,
            state.score,
            state.level,
            state.lives,
            state.live_enemy_count()
        );
    }

    /// Track the lowest enemy horizontally and hold fire
    fn steer(session: &mut Session) {
        let state = session.state();
        let player_x = state.player.pos.x + state.player.size.x / 2.0;
        let target_x = state
            .enemies
            .iter()
            .filter(|e| !e.dead)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x + e.size.x / 2.0);

        let (left, right) = match target_x {
            Some(x) if x < player_x - 4.0 => (true, false),
            Some(x) if x > player_x + 4.0 => (false, true),
            _ => (false, false),
        };

        set_key(session, Key::ArrowLeft, left);
        set_key(session, Key::ArrowRight, right);
        set_key(session, Key::Space, true);
    }

    fn set_key(session: &mut Session, key: Key, down: bool) {
        if down {
            session.key_down(key);
        } else {
            session.key_up(key);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
