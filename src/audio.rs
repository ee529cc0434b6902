//! Audio port
//!
//! The simulation never talks to audio directly; the session maps its events
//! to `SoundEffect`s and toggles. On the web, effects are synthesised with
//! Web Audio oscillators (no sample files) and music loops through an
//! `<audio>` element. Headless builds use `NullAudio`.

use crate::consts::{MUSIC_ENABLED_KEY, SFX_ENABLED_KEY};
use crate::platform::Storage;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player lost a life
    Hit,
    /// Triple shot collected
    PowerUp,
    /// New wave spawned
    LevelStart,
    /// Wave cleared
    LevelComplete,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        Some(match event {
            GameEvent::Shoot => SoundEffect::Shoot,
            GameEvent::Explosion => SoundEffect::Explosion,
            GameEvent::Hit => SoundEffect::Hit,
            GameEvent::PowerUp => SoundEffect::PowerUp,
            GameEvent::LevelStart => SoundEffect::LevelStart,
            GameEvent::LevelComplete => SoundEffect::LevelComplete,
            _ => return None,
        })
    }
}

/// Audio backend as seen by the session. Implementations must never fail
/// loudly: a missing backend is a silent no-op.
pub trait AudioPort {
    /// Fire-and-forget cue; ignored while effects are off
    fn play(&mut self, effect: SoundEffect);

    /// Flip effects on/off, returning the new state
    fn toggle_sfx(&mut self) -> bool;

    /// Flip music on/off, returning the new state
    fn toggle_music(&mut self) -> bool;

    fn sfx_enabled(&self) -> bool;

    fn music_enabled(&self) -> bool;

    /// Called on the first user gesture, when browsers allow audio to start
    fn unlock(&mut self) {}
}

/// Persisted audio toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPrefs {
    pub sfx: bool,
    pub music: bool,
}

impl Default for AudioPrefs {
    fn default() -> Self {
        Self {
            sfx: true,
            music: false,
        }
    }
}

impl AudioPrefs {
    pub fn load(storage: &dyn Storage) -> Self {
        let defaults = Self::default();
        Self {
            sfx: storage.load_bool(SFX_ENABLED_KEY, defaults.sfx),
            music: storage.load_bool(MUSIC_ENABLED_KEY, defaults.music),
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        storage.save_bool(SFX_ENABLED_KEY, self.sfx);
        storage.save_bool(MUSIC_ENABLED_KEY, self.music);
    }
}

/// Silent backend that still tracks toggles
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio {
    prefs: AudioPrefs,
}

impl NullAudio {
    pub fn new(prefs: AudioPrefs) -> Self {
        Self { prefs }
    }
}

impl AudioPort for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn toggle_sfx(&mut self) -> bool {
        self.prefs.sfx = !self.prefs.sfx;
        self.prefs.sfx
    }

    fn toggle_music(&mut self) -> bool {
        self.prefs.music = !self.prefs.music;
        self.prefs.music
    }

    fn sfx_enabled(&self) -> bool {
        self.prefs.sfx
    }

    fn music_enabled(&self) -> bool {
        self.prefs.music
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioPort, AudioPrefs, SoundEffect};

    /// Looping background track, served next to the page
    const MUSIC_SRC: &str = "assets/music.mp3";
    const MUSIC_VOLUME: f64 = 0.6;

    /// Web Audio backend
    pub struct WebAudio {
        /// Created on first use; browsers refuse contexts before a gesture
        ctx: Option<AudioContext>,
        /// Context creation already failed once, do not retry every cue
        ctx_failed: bool,
        music: Option<HtmlAudioElement>,
        prefs: AudioPrefs,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(prefs: AudioPrefs) -> Self {
            Self {
                ctx: None,
                ctx_failed: false,
                music: None,
                prefs,
                volume: 0.8,
            }
        }

        fn context(&mut self) -> Option<&AudioContext> {
            if self.ctx.is_none() && !self.ctx_failed {
                match AudioContext::new() {
                    Ok(ctx) => self.ctx = Some(ctx),
                    Err(_) => {
                        self.ctx_failed = true;
                        log::warn!("Failed to create AudioContext - audio disabled");
                    }
                }
            }
            let ctx = self.ctx.as_ref()?;
            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        fn start_music(&mut self) {
            if self.music.is_none() {
                match HtmlAudioElement::new_with_src(MUSIC_SRC) {
                    Ok(el) => {
                        el.set_loop(true);
                        el.set_volume(MUSIC_VOLUME);
                        self.music = Some(el);
                    }
                    Err(_) => {
                        log::warn!("Could not create music element");
                        return;
                    }
                }
            }
            let Some(el) = &self.music else { return };
            match el.play() {
                Ok(promise) => {
                    // Autoplay policy or a missing file rejects asynchronously
                    wasm_bindgen_futures::spawn_local(async move {
                        if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                            log::warn!("Music playback failed: {:?}", e);
                        }
                    });
                }
                Err(e) => log::warn!("Music playback failed: {:?}", e),
            }
        }

        fn stop_music(&self) {
            if let Some(el) = &self.music {
                let _ = el.pause();
            }
        }
    }

    impl AudioPort for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            if !self.prefs.sfx {
                return;
            }
            let vol = self.volume;
            let Some(ctx) = self.context() else { return };

            match effect {
                SoundEffect::Shoot => play_shoot(ctx, vol),
                SoundEffect::Explosion => play_explosion(ctx, vol),
                SoundEffect::Hit => play_hit(ctx, vol),
                SoundEffect::PowerUp => play_power_up(ctx, vol),
                SoundEffect::LevelStart => play_level_start(ctx, vol),
                SoundEffect::LevelComplete => play_level_complete(ctx, vol),
            }
        }

        fn toggle_sfx(&mut self) -> bool {
            self.prefs.sfx = !self.prefs.sfx;
            self.prefs.sfx
        }

        fn toggle_music(&mut self) -> bool {
            self.prefs.music = !self.prefs.music;
            if self.prefs.music {
                self.start_music();
            } else {
                self.stop_music();
            }
            self.prefs.music
        }

        fn sfx_enabled(&self) -> bool {
            self.prefs.sfx
        }

        fn music_enabled(&self) -> bool {
            self.prefs.music
        }

        fn unlock(&mut self) {
            let _ = self.context();
            if self.prefs.music {
                self.start_music();
            }
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short note with a fast attack and exponential release, starting at `t`
    fn pluck(ctx: &AudioContext, freq: f32, osc_type: OscillatorType, peak: f32, t: f64, len: f64) {
        let Some((osc, gain)) = create_osc(ctx, freq, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(peak, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + len)
            .ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }

    /// Laser - square sweep down
    fn play_shoot(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 520.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.3, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Enemy destroyed - low rumble with a crackle on top
    fn play_explosion(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        if let Some((osc, gain)) = create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.12, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(700.0, t + 0.06).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.09).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Life lost - dull triangle drop
    fn play_hit(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.6, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.13)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Pickup - rising arpeggio (E5, A5, B5)
    fn play_power_up(ctx: &AudioContext, vol: f32) {
        let t0 = ctx.current_time();
        for (i, freq) in [659.25, 880.0, 987.77].iter().enumerate() {
            let t = t0 + i as f64 * 0.08;
            pluck(ctx, *freq, OscillatorType::Sine, vol * 0.7, t, 0.16);
        }
    }

    /// New wave - major triad (C5, E5, G5)
    fn play_level_start(ctx: &AudioContext, vol: f32) {
        let t0 = ctx.current_time();
        for (i, freq) in [523.25, 659.25, 783.99].iter().enumerate() {
            let t = t0 + i as f64 * 0.12;
            pluck(ctx, *freq, OscillatorType::Triangle, vol * 0.6, t, 0.22);
        }
    }

    /// Wave cleared - quick fanfare ending on a held octave
    fn play_level_complete(ctx: &AudioContext, vol: f32) {
        let t0 = ctx.current_time();
        for (i, freq) in [392.0, 523.25, 659.25, 783.99].iter().enumerate() {
            let t = t0 + i as f64 * 0.09;
            pluck(ctx, *freq, OscillatorType::Square, vol * 0.25, t, 0.14);
        }
        pluck(ctx, 1046.5, OscillatorType::Triangle, vol * 0.5, t0 + 0.36, 0.6);
    }
}
