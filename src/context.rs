//! Per-call placement snapshot.
//!
//! A [`PlacementContext`] is an immutable snapshot of everything the engine
//! needs to know about the canvas for one planning call: existing card
//! positions, group frames, canvas bounds and the item/grid metrics. The
//! engine never mutates or retains it; every call rebuilds its working
//! structures (obstacle index, occupancy grid) from the snapshot it is given,
//! so concurrent calls on independent snapshots are safe by construction.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, snap};

/// Immutable snapshot of the canvas for one planning call.
#[derive(Debug, Clone)]
pub struct PlacementContext {
    /// Top-left positions of existing cards. Every card occupies an
    /// item-sized rectangle at its position.
    pub cards: Vec<Point>,
    /// Frames of existing groups, keyed by group id. A `BTreeMap` keeps
    /// iteration order deterministic.
    pub groups: BTreeMap<String, Rect>,
    /// Canvas bounds; all results are clamped inside.
    pub bounds: Rect,
    /// Snap grid unit. All returned positions are multiples of this.
    pub grid_unit: f64,
    /// Item width.
    pub item_w: f64,
    /// Item height.
    pub item_h: f64,
    /// Horizontal gap between items.
    pub gap_x: f64,
    /// Vertical gap between items.
    pub gap_y: f64,
    /// Preferred placement location, e.g. the viewport center.
    pub seed: Option<Point>,
}

impl PlacementContext {
    /// Creates a context for the given canvas bounds and item size.
    ///
    /// Gaps default to 4 units and the grid unit to 4.
    pub fn new(bounds: Rect, item_w: f64, item_h: f64) -> Self {
        Self {
            cards: Vec::new(),
            groups: BTreeMap::new(),
            bounds,
            grid_unit: 4.0,
            item_w,
            item_h,
            gap_x: 4.0,
            gap_y: 4.0,
            seed: None,
        }
    }

    /// Sets the existing card positions.
    pub fn with_cards(mut self, cards: Vec<Point>) -> Self {
        self.cards = cards;
        self
    }

    /// Adds one existing card.
    pub fn with_card(mut self, position: Point) -> Self {
        self.cards.push(position);
        self
    }

    /// Adds one existing group frame.
    pub fn with_group(mut self, id: impl Into<String>, frame: Rect) -> Self {
        self.groups.insert(id.into(), frame);
        self
    }

    /// Sets the snap grid unit.
    pub fn with_grid_unit(mut self, unit: f64) -> Self {
        self.grid_unit = unit;
        self
    }

    /// Sets the horizontal and vertical gaps.
    pub fn with_gaps(mut self, gap_x: f64, gap_y: f64) -> Self {
        self.gap_x = gap_x;
        self.gap_y = gap_y;
        self
    }

    /// Sets the preferred placement location.
    pub fn with_seed(mut self, seed: Point) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Horizontal spacing of the item lattice (item width plus gap).
    pub fn spacing_x(&self) -> f64 {
        self.item_w + self.gap_x
    }

    /// Vertical spacing of the item lattice (item height plus gap).
    pub fn spacing_y(&self) -> f64 {
        self.item_h + self.gap_y
    }

    /// The seed to place near: the explicit seed, or the bounds center.
    pub fn default_seed(&self) -> Point {
        self.seed.unwrap_or_else(|| self.bounds.center())
    }

    /// Item-sized rectangle occupied by a card at `position`.
    pub fn card_rect(&self, position: Point) -> Rect {
        Rect::new(position.x, position.y, self.item_w, self.item_h)
    }

    /// Centroid of the existing card rects, or `None` if there are no cards.
    pub fn cards_centroid(&self) -> Option<Point> {
        if self.cards.is_empty() {
            return None;
        }
        let n = self.cards.len() as f64;
        let sum = self.cards.iter().fold((0.0, 0.0), |(sx, sy), p| {
            let c = self.card_rect(*p).center();
            (sx + c.x, sy + c.y)
        });
        Some(Point::new(sum.0 / n, sum.1 / n))
    }

    /// Clamps a `w`x`h` rectangle's top-left corner so it lies within bounds.
    ///
    /// Rectangles larger than the bounds are pinned to the bounds origin.
    pub fn clamp_into_bounds(&self, x: f64, y: f64, w: f64, h: f64) -> Point {
        let max_x = (self.bounds.right() - w).max(self.bounds.x);
        let max_y = (self.bounds.bottom() - h).max(self.bounds.y);
        Point::new(x.clamp(self.bounds.x, max_x), y.clamp(self.bounds.y, max_y))
    }

    /// Clamps like [`Self::clamp_into_bounds`], then snaps to the grid
    /// without leaving the clamp range.
    ///
    /// Plain snapping after a clamp can round back out of bounds when a
    /// bounds edge is not a grid-unit multiple; here the snap pulls inward
    /// instead. When an axis range holds no grid point at all, the clamped
    /// value is kept and staying in bounds wins over snapping.
    pub fn clamp_snapped(&self, x: f64, y: f64, w: f64, h: f64) -> Point {
        let clamped = self.clamp_into_bounds(x, y, w, h);
        let max_x = (self.bounds.right() - w).max(self.bounds.x);
        let max_y = (self.bounds.bottom() - h).max(self.bounds.y);
        Point::new(
            snap_in_range(clamped.x, self.grid_unit, self.bounds.x, max_x),
            snap_in_range(clamped.y, self.grid_unit, self.bounds.y, max_y),
        )
    }

    /// Validates the snapshot.
    pub fn validate(&self) -> Result<()> {
        if self.item_w <= 0.0 || self.item_h <= 0.0 {
            return Err(Error::InvalidItemSize {
                width: self.item_w,
                height: self.item_h,
            });
        }
        if self.grid_unit <= 0.0 {
            return Err(Error::InvalidGridUnit(self.grid_unit));
        }
        if self.bounds.w <= 0.0 || self.bounds.h <= 0.0 {
            return Err(Error::InvalidBounds {
                width: self.bounds.w,
                height: self.bounds.h,
            });
        }
        if self.gap_x < 0.0 || self.gap_y < 0.0 {
            return Err(Error::NegativeGap {
                x: self.gap_x,
                y: self.gap_y,
            });
        }
        Ok(())
    }
}

/// Snaps `value` to the grid, stepping to the next in-range grid point when
/// the nearest one falls outside `[lo, hi]`.
fn snap_in_range(value: f64, unit: f64, lo: f64, hi: f64) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    let snapped = snap(value, unit);
    if snapped >= lo && snapped <= hi {
        return snapped;
    }
    let inward = if snapped < lo {
        (lo / unit).ceil() * unit
    } else {
        (hi / unit).floor() * unit
    };
    if inward >= lo && inward <= hi {
        inward
    } else {
        value
    }
}
