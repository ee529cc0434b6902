//! Frame layout and animation curves
//!
//! Everything here is a pure function of the session state so the canvas
//! code only has to paint.

use glam::Vec2;

use crate::sim::{Arena, EnemyKind, GamePhase, Player, SessionState};

pub const BACKGROUND: &str = "#0b0e18";
pub const HUD_COLOR: &str = "#cfd6ff";
pub const PLAYER_SHOT_COLOR: &str = "#ffd65a";
pub const ENEMY_SHOT_COLOR: &str = "#ff6a6a";
pub const STAR_COLOR: &str = "#a0b9ff";

pub const STAR_COUNT: u32 = 60;
/// Left edge of each HUD field
pub const HUD_COLUMNS: [f64; 4] = [16.0, 140.0, 240.0, 340.0];
pub const HUD_TOP: f64 = 12.0;
/// Toast anchor, measured from the bottom-right corner
pub const TOAST_INSET: f64 = 16.0;

/// Sprite colors for one enemy hull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub body: &'static str,
    pub accent: &'static str,
    pub engine: &'static str,
}

pub fn enemy_palette(kind: EnemyKind) -> Palette {
    match kind {
        EnemyKind::Fighter => Palette {
            body: "#ff7979",
            accent: "#ffd1a1",
            engine: "#ffb74d",
        },
        EnemyKind::Cruiser => Palette {
            body: "#b47cff",
            accent: "#e3c7ff",
            engine: "#c59eff",
        },
        EnemyKind::Scout => Palette {
            body: "#6ee7ff",
            accent: "#c7f8ff",
            engine: "#86efff",
        },
    }
}

/// Scrolling backdrop stars (deterministic, no state)
pub fn stars(elapsed: f32, arena: Arena) -> impl Iterator<Item = Vec2> {
    let scroll = (elapsed * 50.0).floor();
    let (w, h) = (arena.width.max(1.0), arena.height.max(1.0));
    (0..STAR_COUNT).map(move |i| {
        let i = i as f32;
        let speed = (i % 3.0) + 1.0;
        Vec2::new((i * 127.0 + scroll * speed) % w, (i * 53.0) % h)
    })
}

/// Opacity of the player ship; flickers while invulnerable
pub fn player_alpha(player: &Player, elapsed: f32) -> f32 {
    if player.invulnerable > 0.0 {
        0.5 + 0.5 * (elapsed * 20.0).sin()
    } else {
        1.0
    }
}

/// Engine glow intensity, phase-shifted per enemy position
pub fn engine_flicker(elapsed: f32, pos: Vec2) -> f32 {
    0.6 + 0.4 * (elapsed * 20.0 + (pos.x + pos.y) * 0.05).sin()
}

/// Ring radius and opacity for an explosion of `age` seconds
pub fn explosion_ring(age: f32, lifetime: f32) -> (f32, f32) {
    let radius = 6.0 + age * 50.0;
    let alpha = if lifetime > 0.0 {
        (1.0 - age / lifetime).max(0.0)
    } else {
        0.0
    };
    (radius, alpha)
}

pub fn powerup_pulse(age: f32) -> f32 {
    0.8 + 0.2 * (age * 6.0).sin()
}

/// Toasts fade out over their final second
pub fn toast_alpha(remaining: f32) -> f32 {
    remaining.min(1.0).max(0.0)
}

pub fn hud_fields(state: &SessionState) -> [String; 4] {
    [
        format!("Score: {}", state.score),
        format!("Lives: {}", state.lives),
        format!("Level: {}", state.level),
        format!("Best: {}", state.high_score),
    ]
}

/// Full-screen message drawn over a frozen game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: &'static str,
    pub hint: &'static str,
    /// Show the "new high score" line under the hint
    pub record: bool,
}

pub fn overlay(state: &SessionState) -> Option<Overlay> {
    let hint = "R: Restart  \u{2022}  P: Resume";
    match state.phase {
        GamePhase::Playing => None,
        GamePhase::Paused => Some(Overlay {
            title: "PAUSE",
            hint,
            record: false,
        }),
        GamePhase::GameOver => Some(Overlay {
            title: "GAME OVER",
            hint,
            record: state.is_record_run(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state() -> SessionState {
        SessionState::new(3, Arena::default(), Tuning::default(), 0)
    }

    #[test]
    fn test_stars_stay_on_screen() {
        let arena = Arena::default();
        for t in [0.0, 1.3, 250.0] {
            let all: Vec<_> = stars(t, arena).collect();
            assert_eq!(all.len(), STAR_COUNT as usize);
            for s in all {
                assert!(s.x >= 0.0 && s.x < arena.width);
                assert!(s.y >= 0.0 && s.y < arena.height);
            }
        }
    }

    #[test]
    fn test_explosion_fades_out() {
        assert_eq!(explosion_ring(0.0, 0.35), (6.0, 1.0));
        let (r, a) = explosion_ring(0.35, 0.35);
        assert!((r - 23.5).abs() < 1e-4);
        assert_eq!(a, 0.0);
        assert_eq!(explosion_ring(1.0, 0.35).1, 0.0);
    }

    #[test]
    fn test_toast_alpha() {
        assert_eq!(toast_alpha(1.8), 1.0);
        assert_eq!(toast_alpha(0.25), 0.25);
        assert_eq!(toast_alpha(-0.1), 0.0);
    }

    #[test]
    fn test_player_flicker_only_when_invulnerable() {
        let mut s = state();
        assert_eq!(player_alpha(&s.player, 0.4), 1.0);
        s.player.invulnerable = 1.0;
        let a = player_alpha(&s.player, 0.4);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn test_hud_and_overlay() {
        let mut s = state();
        s.score = 120;
        s.high_score = 120;
        assert_eq!(hud_fields(&s)[0], "Score: 120");
        assert_eq!(hud_fields(&s)[3], "Best: 120");
        assert!(overlay(&s).is_none());

        s.phase = GamePhase::Paused;
        assert_eq!(overlay(&s).map(|o| o.title), Some("PAUSE"));

        s.phase = GamePhase::GameOver;
        let o = overlay(&s).unwrap();
        assert_eq!(o.title, "GAME OVER");
        assert!(o.record);

        s.high_score = 500;
        assert!(!overlay(&s).unwrap().record);
    }

    #[test]
    fn test_palettes_differ_per_kind() {
        let bodies: Vec<_> = EnemyKind::ALL.iter().map(|k| enemy_palette(*k).body).collect();
        assert_ne!(bodies[0], bodies[1]);
        assert_ne!(bodies[1], bodies[2]);
    }
}
