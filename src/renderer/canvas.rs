//! Canvas 2D painter

use std::f64::consts::{FRAC_PI_4, TAU};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::layout::{self, Overlay};
use crate::sim::{Enemy, EnemyKind, Explosion, Player, PowerUp, Projectile, SessionState};

const FONT: &str = "system-ui, Segoe UI, Arial";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    /// Draw one frame. Drawing errors only lose pixels, so they are ignored.
    pub fn render(&self, state: &SessionState) {
        let c = &self.ctx;
        c.set_fill_style_str(layout::BACKGROUND);
        c.fill_rect(0.0, 0.0, self.width, self.height);

        self.draw_stars(state);
        draw_player(c, &state.player, state.elapsed);
        for enemy in &state.enemies {
            draw_enemy(c, enemy, state.elapsed);
        }

        c.set_fill_style_str(layout::PLAYER_SHOT_COLOR);
        for shot in &state.player_shots {
            draw_shot(c, shot);
        }
        c.set_fill_style_str(layout::ENEMY_SHOT_COLOR);
        for shot in &state.enemy_shots {
            draw_shot(c, shot);
        }

        for explosion in &state.explosions {
            draw_explosion(c, explosion, state.tuning.explosion_lifetime);
        }
        for powerup in &state.powerups {
            draw_powerup(c, powerup);
        }

        self.draw_hud(state);
        if let Some(overlay) = layout::overlay(state) {
            self.draw_overlay(&overlay);
        }
    }

    fn draw_stars(&self, state: &SessionState) {
        let c = &self.ctx;
        c.save();
        c.set_global_alpha(0.2);
        c.set_fill_style_str(layout::STAR_COLOR);
        for star in layout::stars(state.elapsed, state.arena) {
            c.fill_rect(f64::from(star.x), f64::from(star.y), 2.0, 2.0);
        }
        c.restore();
    }

    fn draw_hud(&self, state: &SessionState) {
        let c = &self.ctx;
        c.set_fill_style_str(layout::HUD_COLOR);
        c.set_font(&format!("16px {FONT}"));
        c.set_text_align("left");
        c.set_text_baseline("top");
        for (text, x) in layout::hud_fields(state).iter().zip(layout::HUD_COLUMNS) {
            let _ = c.fill_text(text, x, layout::HUD_TOP);
        }

        // Toast in the lower right corner
        if let Some(toast) = &state.toast {
            c.save();
            c.set_global_alpha(f64::from(layout::toast_alpha(toast.remaining)));
            c.set_font(&format!("bold 16px {FONT}"));
            c.set_text_align("right");
            c.set_text_baseline("alphabetic");
            let _ = c.fill_text(
                &toast.text,
                self.width - layout::TOAST_INSET,
                self.height - layout::TOAST_INSET,
            );
            c.restore();
        }
    }

    fn draw_overlay(&self, overlay: &Overlay) {
        let c = &self.ctx;
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);

        c.save();
        c.set_global_alpha(0.85);
        c.set_fill_style_str(layout::BACKGROUND);
        c.fill_rect(0.0, 0.0, self.width, self.height);
        c.restore();

        c.set_fill_style_str(layout::HUD_COLOR);
        c.set_text_align("center");
        c.set_text_baseline("alphabetic");
        c.set_font(&format!("bold 48px {FONT}"));
        let _ = c.fill_text(overlay.title, cx, cy - 20.0);
        c.set_font(&format!("18px {FONT}"));
        let _ = c.fill_text(overlay.hint, cx, cy + 20.0);

        if overlay.record {
            c.set_fill_style_str(layout::PLAYER_SHOT_COLOR);
            c.set_font(&format!("bold 22px {FONT}"));
            let _ = c.fill_text("New high score!", cx, cy + 54.0);
        }
    }
}

fn draw_shot(c: &CanvasRenderingContext2d, shot: &Projectile) {
    c.fill_rect(
        f64::from(shot.pos.x),
        f64::from(shot.pos.y),
        f64::from(shot.size.x),
        f64::from(shot.size.y),
    );
}

/// Saucer with nacelles
fn draw_player(c: &CanvasRenderingContext2d, player: &Player, elapsed: f32) {
    let w = f64::from(player.size.x);
    let h = f64::from(player.size.y);
    let cx = f64::from(player.pos.x) + w / 2.0;
    let cy = f64::from(player.pos.y) + h / 2.0 + 2.0;

    c.save();
    c.set_global_alpha(f64::from(layout::player_alpha(player, elapsed)));

    // Hull
    c.set_fill_style_str("#bfe3ff");
    c.set_stroke_style_str("#6aa9d8");
    c.set_line_width(1.5);
    c.begin_path();
    let _ = c.ellipse(cx, cy, w * 0.38, h * 0.55, 0.0, 0.0, TAU);
    c.fill();
    c.stroke();

    // Bridge dome
    c.begin_path();
    c.set_fill_style_str("#e9f6ff");
    let _ = c.arc(cx, cy - h * 0.25, 3.5, 0.0, TAU);
    c.fill();

    // Pylons
    c.set_fill_style_str("#a9d5f5");
    c.fill_rect(cx - w * 0.42, cy + 1.0, w * 0.22, 2.0);
    c.fill_rect(cx + w * 0.20, cy + 1.0, w * 0.22, 2.0);

    // Nacelles with red tips
    let (nacelle_w, nacelle_h) = (w * 0.25, 6.0);
    for (x, tip_x) in [
        (cx - w * 0.62, cx - w * 0.62 - 3.0),
        (cx + w * 0.37, cx + w * 0.37 + nacelle_w),
    ] {
        c.set_fill_style_str("#9fd0f3");
        c.fill_rect(x, cy - nacelle_h / 2.0, nacelle_w, nacelle_h);
        c.set_fill_style_str("#ff6a6a");
        c.fill_rect(tip_x, cy - nacelle_h / 2.0, 3.0, nacelle_h);
    }

    // Deflector
    c.set_fill_style_str("#ffd65a");
    c.begin_path();
    let _ = c.arc(cx, cy + h * 0.35, 3.0, 0.0, TAU);
    c.fill();

    c.restore();
}

fn draw_enemy(c: &CanvasRenderingContext2d, enemy: &Enemy, elapsed: f32) {
    let p = layout::enemy_palette(enemy.kind);
    let flicker = f64::from(layout::engine_flicker(elapsed, enemy.pos));
    let (x, y) = (f64::from(enemy.pos.x), f64::from(enemy.pos.y));
    let (w, h) = (f64::from(enemy.size.x), f64::from(enemy.size.y));

    c.save();
    c.set_fill_style_str(p.body);

    match enemy.kind {
        EnemyKind::Fighter => {
            // Pointed nose, short wings, twin engines
            c.begin_path();
            c.move_to(x + w * 0.5, y);
            c.line_to(x + w * 0.9, y + h * 0.45);
            c.line_to(x + w * 0.7, y + h * 0.55);
            c.line_to(x + w * 0.7, y + h * 0.8);
            c.line_to(x + w * 0.3, y + h * 0.8);
            c.line_to(x + w * 0.3, y + h * 0.55);
            c.line_to(x + w * 0.1, y + h * 0.45);
            c.close_path();
            c.fill();
            c.fill_rect(x + w * 0.05, y + h * 0.5, w * 0.25, 3.0);
            c.fill_rect(x + w * 0.70, y + h * 0.5, w * 0.25, 3.0);

            c.set_fill_style_str(p.accent);
            c.fill_rect(x + w * 0.45, y + h * 0.2, w * 0.10, h * 0.18);

            c.set_global_alpha(flicker);
            c.set_fill_style_str(p.engine);
            c.fill_rect(x + w * 0.34, y + h * 0.80, 4.0, 4.0);
            c.fill_rect(x + w * 0.62, y + h * 0.80, 4.0, 4.0);
        }
        EnemyKind::Cruiser => {
            // Wide hull, side pods, three engines
            c.fill_rect(x + w * 0.18, y + h * 0.15, w * 0.64, h * 0.55);
            c.set_fill_style_str(p.accent);
            c.begin_path();
            let _ = c.arc(x + w * 0.5, y + h * 0.18, 3.0, 0.0, TAU);
            c.fill();
            c.set_fill_style_str(p.body);
            c.fill_rect(x, y + h * 0.40, w * 0.2, 3.0);
            c.fill_rect(x + w * 0.80, y + h * 0.40, w * 0.2, 3.0);

            c.set_global_alpha(flicker);
            c.set_fill_style_str(p.engine);
            for fx in [0.30, 0.48, 0.66] {
                c.fill_rect(x + w * fx, y + h * 0.70, 4.0, 4.0);
            }
        }
        EnemyKind::Scout => {
            // Small saucer with prongs
            c.begin_path();
            let _ = c.ellipse(x + w * 0.5, y + h * 0.45, w * 0.32, h * 0.28, 0.0, 0.0, TAU);
            c.fill();
            c.fill_rect(x + w * 0.1, y + h * 0.45, 3.0, 3.0);
            c.fill_rect(x + w * 0.87, y + h * 0.45, 3.0, 3.0);
            c.set_fill_style_str(p.accent);
            c.fill_rect(x + w * 0.47, y + h * 0.3, 4.0, 4.0);

            c.set_global_alpha(flicker);
            c.set_fill_style_str(p.engine);
            c.fill_rect(x + w * 0.48, y + h * 0.70, 5.0, 4.0);
        }
    }

    c.restore();
}

fn draw_explosion(c: &CanvasRenderingContext2d, explosion: &Explosion, lifetime: f32) {
    let (radius, alpha) = layout::explosion_ring(explosion.age, lifetime);
    c.save();
    c.set_global_alpha(f64::from(alpha));
    c.set_stroke_style_str("#ffd65a");
    c.set_line_width(2.0);
    c.begin_path();
    let _ = c.arc(
        f64::from(explosion.pos.x),
        f64::from(explosion.pos.y),
        f64::from(radius),
        0.0,
        TAU,
    );
    c.stroke();
    c.restore();
}

/// Rotated tile with a bolt
fn draw_powerup(c: &CanvasRenderingContext2d, powerup: &PowerUp) {
    let center = powerup.pos + powerup.size / 2.0;
    let half = f64::from(powerup.size.x) / 2.0;

    c.save();
    c.set_global_alpha(f64::from(layout::powerup_pulse(powerup.age)));
    let _ = c.translate(f64::from(center.x), f64::from(center.y));
    let _ = c.rotate(FRAC_PI_4);
    c.set_fill_style_str("#5af0ff");
    c.set_stroke_style_str("#1aa7c4");
    c.set_line_width(2.0);
    c.fill_rect(-half, -half, half * 2.0, half * 2.0);
    c.stroke_rect(-half, -half, half * 2.0, half * 2.0);
    let _ = c.rotate(-FRAC_PI_4);

    c.set_fill_style_str(layout::BACKGROUND);
    c.begin_path();
    let (bx, by) = (-4.0, -6.0);
    c.move_to(bx, by);
    c.line_to(bx + 6.0, by + 2.0);
    c.line_to(bx + 2.0, by + 2.0);
    c.line_to(bx + 8.0, by + 10.0);
    c.line_to(bx - 2.0, by + 4.0);
    c.line_to(bx + 2.0, by + 4.0);
    c.close_path();
    c.fill();
    c.restore();
}
