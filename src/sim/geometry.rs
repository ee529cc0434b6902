//! Axis-aligned box geometry
//!
//! Every gameplay entity is a rectangle anchored at its top-left corner, so
//! overlap tests are plain interval checks on both axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_with_margin(other, 0.0)
    }

    /// Overlap test with both boxes grown by `margin` on their far sides
    pub fn overlaps_with_margin(&self, other: &Aabb, margin: f32) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x + margin
            && a_max.x + margin > other.min.x
            && self.min.y < b_max.y + margin
            && a_max.y + margin > other.min.y
    }

    /// Smallest horizontal and vertical push that separates the two boxes
    /// once both are padded by `margin`
    pub fn penetration(&self, other: &Aabb, margin: f32) -> Vec2 {
        let a_max = self.max();
        let b_max = other.max();
        let pen_x = (b_max.x + margin - self.min.x).min(a_max.x + margin - other.min.x);
        let pen_y = (b_max.y + margin - self.min.y).min(a_max.y + margin - other.min.y);
        Vec2::new(pen_x, pen_y)
    }
}

/// Anything with a collision box
pub trait Bounded {
    fn bounds(&self) -> Aabb;

    fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: crate::consts::DEFAULT_ARENA_WIDTH,
            height: crate::consts::DEFAULT_ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal corridor with `margin` kept free on each side
    pub fn horizontal_bounds(&self, margin: f32) -> HorizontalBounds {
        HorizontalBounds {
            left: margin,
            right: self.width - margin,
        }
    }
}

/// Left/right limits for an entity's x coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalBounds {
    pub left: f32,
    pub right: f32,
}

impl HorizontalBounds {
    /// Clamp a left edge so a box of `width` stays inside.
    /// The left bound wins when the corridor is narrower than the box.
    #[inline]
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.min(self.right - width).max(self.left)
    }
}
