//! Rectangle geometry shared between host and target coordinate spaces.
//!
//! [`Rect`] mirrors the shape of a DOM bounding client rect: origin, size,
//! and the four edges. Edges are stored (not derived on access) so a rect
//! serialized over the wire carries the same fields a structural clone of a
//! `DOMRect` would.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in CSS pixels.
///
/// Used both for target-local element bounds (as captured by the probe)
/// and for host-local overlay geometry (after translation by the preview
/// surface offset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Rect {
    /// Build a rect from origin and size, deriving the edge fields.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
        }
    }

    /// A zero-sized rect at the origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Area in square pixels. Degenerate (negative-size) rects clamp to 0.
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Translate by an offset, producing a new rect with recomputed edges.
    ///
    /// This is the target-local → host-local conversion: the offset is the
    /// preview surface's own origin in host coordinates.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether `other` lies entirely within this rect.
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Whether a point lies within this rect (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}
