//! Swarm Defender - a single-screen arcade shooter against clustered swarms
//!
//! Core modules:
//! - `sim`: Deterministic simulation (waves, steering, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `platform`: Input edges, storage and frame timing
//! - `audio`: Audio port with Web Audio and null backends
//! - `session`: Per-frame driver wiring the simulation to the ports
//! - `renderer`: Canvas 2D drawing (layout helpers everywhere, canvas on WASM)

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Longest frame the simulation will step in one go (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Default playfield size (pixels)
    pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;

    /// Storage keys
    pub const HIGH_SCORE_KEY: &str = "highScore";
    pub const SFX_ENABLED_KEY: &str = "sfxEnabled";
    pub const MUSIC_ENABLED_KEY: &str = "musicEnabled";
}
