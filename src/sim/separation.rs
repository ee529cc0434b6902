//! Enemy separation
//!
//! A fixed number of relaxation passes over every pair of live enemies.
//! Overlaps are resolved along the shallower axis: horizontally in full,
//! vertically only by a small capped nudge so the descent rate stays steady.
//! This does not converge; dense formations may keep a little residual overlap.

use super::entities::Enemy;
use super::geometry::{Bounded, HorizontalBounds};
use crate::tuning::SeparationTuning;

/// Push overlapping enemies apart in place
pub fn separate(enemies: &mut [Enemy], bounds: HorizontalBounds, params: &SeparationTuning) {
    let len = enemies.len();
    if len < 2 {
        return;
    }

    for _ in 0..params.passes {
        for i in 0..len {
            if enemies[i].dead {
                continue;
            }
            for j in (i + 1)..len {
                let (head, tail) = enemies.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                if a.dead || b.dead {
                    continue;
                }
                resolve_pair(a, b, bounds, params);
            }
        }
    }
}

fn resolve_pair(a: &mut Enemy, b: &mut Enemy, bounds: HorizontalBounds, params: &SeparationTuning) {
    let a_box = a.bounds();
    let b_box = b.bounds();
    if !a_box.overlaps_with_margin(&b_box, params.margin) {
        return;
    }

    let pen = a_box.penetration(&b_box, params.margin);
    if pen.x < pen.y {
        let push = pen.x / 2.0;
        if a.pos.x < b.pos.x {
            a.pos.x -= push;
            b.pos.x += push;
        } else {
            a.pos.x += push;
            b.pos.x -= push;
        }
    } else {
        let push = (pen.y / 2.0).min(params.max_vertical_push);
        if a.pos.y < b.pos.y {
            a.pos.y -= push;
            b.pos.y += push;
        } else {
            a.pos.y += push;
            b.pos.y -= push;
        }
    }

    a.pos.x = bounds.clamp_x(a.pos.x, a.size.x);
    b.pos.x = bounds.clamp_x(b.pos.x, b.size.x);
}
