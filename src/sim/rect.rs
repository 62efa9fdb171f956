//! Axis-aligned rectangle geometry
//!
//! Screen space: origin at the top-left of the arena, y grows downward.
//! Overlap is strict, so rectangles that only share an edge don't collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box defined by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (never negative)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w.max(0.0), h.max(0.0)),
        }
    }

    /// Square box with the given top-left corner
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self::new(pos.x, pos.y, side, side)
    }

    /// Square box centered on a point
    pub fn centered(center: Vec2, side: f32) -> Self {
        let half = side / 2.0;
        Self::new(center.x - half, center.y - half, side, side)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Shrink by `margin` on every side, keeping the center.
    ///
    /// A margin larger than half the size collapses the box to a point at the center.
    pub fn shrink(&self, margin: f32) -> Self {
        let margin = margin.max(0.0);
        let size = (self.size - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);
        Self {
            pos: self.center() - size / 2.0,
            size,
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }

    /// True if `other` lies entirely inside this rect (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.pos.x >= self.pos.x
            && other.pos.y >= self.pos.y
            && other.max().x <= self.max().x
            && other.max().y <= self.max().y
    }

    /// Center-to-center distance
    #[inline]
    pub fn center_distance(&self, other: &Rect) -> f32 {
        self.center().distance(other.center())
    }

    /// Same size, moved so it lies inside `bounds` (top-left wins if it can't fit)
    pub fn clamped_within(&self, bounds: &Rect) -> Self {
        let max_pos = (bounds.max() - self.size).max(bounds.pos);
        Self {
            pos: self.pos.clamp(bounds.pos, max_pos),
            size: self.size,
        }
    }

    /// Same size, shifted by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }
}

/// Index of the first rect in `others` that overlaps `rect`
pub fn first_overlap<'a, I>(rect: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().position(|other| rect.intersects(other))
}
