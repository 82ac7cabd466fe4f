//! Planning result representation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Result of a planning call.
///
/// `positions` is aligned 1:1 with the request order; `block` is the bounding
/// rectangle of everything placed (zero-area for empty requests). Callers
/// apply the positions and typically frame the camera on the block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanResult {
    /// Top-left positions, one per requested item, in request order.
    pub positions: Vec<Point>,
    /// Bounding rectangle of all placed items.
    pub block: Rect,
}

impl PlanResult {
    /// The empty result with a zero-area block.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from item positions, deriving the block from the
    /// uniform item size.
    pub fn from_positions(positions: Vec<Point>, item_w: f64, item_h: f64) -> Self {
        let block = Rect::bounding(&positions, item_w, item_h);
        Self { positions, block }
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
