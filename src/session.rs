//! Host-side driver
//!
//! Owns the run state plus the injected ports. Once per frame it clamps the
//! frame delta, turns key state into a `TickInput`, ticks the simulation and
//! routes the resulting events to audio and storage.

use crate::audio::{AudioPort, AudioPrefs, SoundEffect};
use crate::consts::HIGH_SCORE_KEY;
use crate::platform::{InputState, Key, KeyBindings, Storage, clamp_frame_dt};
use crate::sim::state::TOAST_AUDIO_TOGGLE;
use crate::sim::{Arena, GameEvent, GamePhase, SessionState, tick};
use crate::tuning::Tuning;

pub struct Session {
    state: SessionState,
    input: InputState,
    bindings: KeyBindings,
    storage: Box<dyn Storage>,
    audio: Box<dyn AudioPort>,
    /// Host asked for a pause (focus lost) since the last update
    pending_pause: bool,
}

impl Session {
    /// Start a run, reading the stored best score
    pub fn new(
        seed: u64,
        arena: Arena,
        tuning: Tuning,
        storage: Box<dyn Storage>,
        audio: Box<dyn AudioPort>,
    ) -> Self {
        let high_score = u64::try_from(storage.load_int(HIGH_SCORE_KEY, 0)).unwrap_or(0);
        log::info!("Session starting (seed {}, best {})", seed, high_score);
        Self {
            state: SessionState::new(seed, arena, tuning, high_score),
            input: InputState::new(),
            bindings: KeyBindings::default(),
            storage,
            audio,
            pending_pause: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn audio(&self) -> &dyn AudioPort {
        self.audio.as_ref()
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// First user gesture: browsers only allow audio from here on
    pub fn unlock_audio(&mut self) {
        self.audio.unlock();
    }

    /// Window lost focus: drop held keys and pause on the next update
    pub fn focus_lost(&mut self) {
        self.input.release_all();
        if self.state.phase == GamePhase::Playing {
            self.pending_pause = true;
            log::info!("Auto-paused (window blur)");
        }
    }

    /// Advance one frame by `real_dt` seconds of wall-clock time
    pub fn update(&mut self, real_dt: f32) {
        let dt = clamp_frame_dt(real_dt);

        let mut cmd = self.bindings.tick_input(&self.input);
        if std::mem::take(&mut self.pending_pause) && self.state.phase == GamePhase::Playing {
            cmd.pause = true;
        }

        tick(&mut self.state, &cmd, dt);

        for event in self.state.drain_events() {
            self.dispatch(event);
        }
        self.input.end_frame();
    }

    fn dispatch(&mut self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(&event) {
            self.audio.play(effect);
            return;
        }

        match event {
            GameEvent::ToggleSfx => {
                let on = self.audio.toggle_sfx();
                self.save_audio_prefs();
                self.state
                    .show_toast(format!("SFX {}", on_off(on)), TOAST_AUDIO_TOGGLE);
            }
            GameEvent::ToggleMusic => {
                let on = self.audio.toggle_music();
                self.save_audio_prefs();
                self.state
                    .show_toast(format!("Music {}", on_off(on)), TOAST_AUDIO_TOGGLE);
            }
            GameEvent::HighScore(score) => {
                self.storage
                    .save_int(HIGH_SCORE_KEY, i64::try_from(score).unwrap_or(i64::MAX));
            }
            GameEvent::GameOver => {
                log::info!(
                    "Run over: score {}, level {}, best {}",
                    self.state.score,
                    self.state.level,
                    self.state.high_score
                );
            }
            GameEvent::Restarted => log::info!("Run restarted"),
            _ => {}
        }
    }

    fn save_audio_prefs(&mut self) {
        let prefs = AudioPrefs {
            sfx: self.audio.sfx_enabled(),
            music: self.audio.music_enabled(),
        };
        prefs.save(self.storage.as_mut());
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
