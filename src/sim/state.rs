//! Session state and core simulation types
//!
//! One `SessionState` per run. The tick function is its only writer; the
//! renderer reads it once per frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Enemy, Explosion, Player, PowerUp, Projectile};
use super::geometry::Arena;
use super::wave::generate_wave;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until the pause key is pressed again
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Things that happened during a tick that the host cares about.
/// Drained by the session after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shoot,
    Explosion,
    Hit,
    PowerUp,
    LevelStart,
    LevelComplete,
    ToggleSfx,
    ToggleMusic,
    /// Score beat the stored best; carries the new best
    HighScore(u64),
    GameOver,
    Restarted,
}

/// Short-lived status line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub text: String,
    /// Seconds left on screen
    pub remaining: f32,
}

/// Toast durations (seconds)
pub const TOAST_AUDIO_TOGGLE: f32 = 1.2;
pub const TOAST_EXTRA_LIFE: f32 = 1.5;
pub const TOAST_TRIPLE_SHOT: f32 = 1.6;
pub const TOAST_HIGH_SCORE: f32 = 1.8;

/// Complete state of a run
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: i32,
    /// 1-based level
    pub level: u32,
    /// Simulated seconds since the run started (animation clock)
    pub elapsed: f32,
    /// Best score seen across runs
    pub high_score: u64,
    /// The "new high score" toast has fired this run
    pub new_high_announced: bool,
    pub toast: Option<Toast>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<PowerUp>,
    /// Shared timer for the wave's next shot
    pub enemy_fire_cooldown: f32,
    pub arena: Arena,
    pub tuning: Tuning,
    /// Emitted during the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl SessionState {
    /// Start a fresh run
    pub fn new(seed: u64, arena: Arena, tuning: Tuning, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let enemies = generate_wave(1, arena, &tuning, &mut rng);
        Self {
            phase: GamePhase::Playing,
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            elapsed: 0.0,
            high_score,
            new_high_announced: false,
            toast: None,
            player: Player::new(arena, &tuning),
            enemies,
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            explosions: Vec::new(),
            powerups: Vec::new(),
            enemy_fire_cooldown: 0.0,
            arena,
            tuning,
            events: Vec::new(),
            rng,
        }
    }

    /// Throw the current run away and start over at level 1.
    /// The best score, tuning and RNG stream carry over.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.level = 1;
        self.elapsed = 0.0;
        self.new_high_announced = false;
        self.toast = None;
        self.player = Player::new(self.arena, &self.tuning);
        self.player_shots.clear();
        self.enemy_shots.clear();
        self.explosions.clear();
        self.powerups.clear();
        self.enemy_fire_cooldown = 0.0;
        self.enemies = generate_wave(1, self.arena, &self.tuning, &mut self.rng);
        log::info!("Run reset ({} enemies)", self.enemies.len());
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn show_toast(&mut self, text: impl Into<String>, duration: f32) {
        self.toast = Some(Toast {
            text: text.into(),
            remaining: duration,
        });
    }

    /// Count down the toast and drop it once expired
    pub(crate) fn decay_toast(&mut self, dt: f32) {
        if let Some(toast) = &mut self.toast {
            toast.remaining -= dt;
            if toast.remaining <= 0.0 {
                self.toast = None;
            }
        }
    }

    /// Raise the best score if the current score beats it
    pub(crate) fn check_high_score(&mut self) {
        if self.score <= self.high_score {
            return;
        }
        self.high_score = self.score;
        self.events.push(GameEvent::HighScore(self.score));
        if !self.new_high_announced {
            self.new_high_announced = true;
            self.show_toast("New high score!", TOAST_HIGH_SCORE);
        }
    }

    /// Take a life; ends the run when none remain
    pub(crate) fn lose_life(&mut self) {
        self.lives -= 1;
        self.events.push(GameEvent::Hit);
        if self.lives <= 0 && self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over at level {} with score {}", self.level, self.score);
        }
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.dead).count()
    }

    /// The run ended on a score that set the record
    pub fn is_record_run(&self) -> bool {
        self.high_score > 0 && self.score == self.high_score
    }
}
