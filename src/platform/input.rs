//! Keyboard input edge tracking
//!
//! Key listeners feed `key_down`/`key_up`; the session folds the state into a
//! `TickInput` and calls `end_frame` once per frame so each physical press
//! yields exactly one `just_pressed` edge.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Keys the game listens to, named after DOM `KeyboardEvent.code` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyA,
    KeyD,
    KeyW,
    KeyS,
    KeyJ,
    KeyP,
    KeyR,
    KeyN,
    KeyM,
    Space,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "KeyA" => Key::KeyA,
            "KeyD" => Key::KeyD,
            "KeyW" => Key::KeyW,
            "KeyS" => Key::KeyS,
            "KeyJ" => Key::KeyJ,
            "KeyP" => Key::KeyP,
            "KeyR" => Key::KeyR,
            "KeyN" => Key::KeyN,
            "KeyM" => Key::KeyM,
            "Space" => Key::Space,
            _ => return None,
        })
    }

    /// Keys whose browser default (page scrolling) must be suppressed
    pub fn scrolls_page(&self) -> bool {
        matches!(
            self,
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown | Key::Space
        )
    }
}

/// Held keys plus this frame's press/release edges
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown. Auto-repeat while held does not add another edge.
    pub fn key_down(&mut self, key: Key) {
        if self.down.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.down.remove(&key);
        self.released.insert(key);
    }

    /// Drop every held key (window lost focus, so keyups will never arrive)
    pub fn release_all(&mut self) {
        self.released.extend(self.down.drain());
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn just_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Clear this frame's edges
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

/// Which keys drive which command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub up: Vec<Key>,
    pub down: Vec<Key>,
    pub fire: Vec<Key>,
    pub pause: Vec<Key>,
    pub restart: Vec<Key>,
    pub toggle_sfx: Vec<Key>,
    pub toggle_music: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![Key::ArrowLeft, Key::KeyA],
            right: vec![Key::ArrowRight, Key::KeyD],
            up: vec![Key::ArrowUp, Key::KeyW],
            down: vec![Key::ArrowDown, Key::KeyS],
            fire: vec![Key::Space, Key::KeyJ],
            pause: vec![Key::KeyP],
            restart: vec![Key::KeyR],
            // KeyS already moves down
            toggle_sfx: vec![Key::KeyN],
            toggle_music: vec![Key::KeyM],
        }
    }
}

impl KeyBindings {
    /// Fold the current key state into this tick's commands
    pub fn tick_input(&self, input: &InputState) -> TickInput {
        let held = |keys: &[Key]| keys.iter().any(|k| input.is_down(*k));
        let pressed = |keys: &[Key]| keys.iter().any(|k| input.just_pressed(*k));

        TickInput {
            left: held(&self.left),
            right: held(&self.right),
            up: held(&self.up),
            down: held(&self.down),
            fire: held(&self.fire),
            pause: pressed(&self.pause),
            restart: pressed(&self.restart),
            toggle_sfx: pressed(&self.toggle_sfx),
            toggle_music: pressed(&self.toggle_music),
        }
    }
}
