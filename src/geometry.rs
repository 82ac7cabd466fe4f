//! Rectangle and grid-snapping primitives.
//!
//! All coordinates are world (canvas) coordinates with `y` growing downward.
//! Rectangles are axis-aligned and anchored at their top-left corner.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// The zero-area rectangle at the origin.
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Area.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Returns true if the two rectangles overlap with positive area.
    ///
    /// Edge-touching rectangles do not count as overlapping.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns this rectangle enlarged by `pad` on every side.
    ///
    /// A negative pad shrinks the rectangle; width and height are floored at
    /// zero so the result stays well-formed.
    pub fn expand(&self, pad: f64) -> Rect {
        Rect {
            x: self.x - pad,
            y: self.y - pad,
            w: (self.w + pad * 2.0).max(0.0),
            h: (self.h + pad * 2.0).max(0.0),
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Returns true if the point lies inside the rectangle (edges inclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Bounding rectangle of `count`-sized item rects anchored at `positions`.
    ///
    /// Returns [`Rect::ZERO`] for an empty position list.
    pub fn bounding(positions: &[Point], item_w: f64, item_h: f64) -> Rect {
        let mut iter = positions.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        let mut block = Rect::new(first.x, first.y, item_w, item_h);
        for p in iter {
            block = block.union(&Rect::new(p.x, p.y, item_w, item_h));
        }
        block
    }
}

/// Snaps a value to the nearest multiple of `unit`.
///
/// A non-positive unit disables snapping and returns the value unchanged.
pub fn snap(value: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        value
    } else {
        (value / unit).round() * unit
    }
}

/// Squared Euclidean distance between two points.
pub fn dist2(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
