//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing
//! - Keyboard input edges
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputState, Key, KeyBindings};
pub use storage::{MemoryStorage, Storage};
pub use time::{FrameClock, clamp_frame_dt};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
