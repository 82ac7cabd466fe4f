//! Grid-dimension optimizer for blocks of identical items.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chosen grid dimensions for a block of identical items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridFit {
    /// Number of columns.
    pub cols: usize,
    /// Number of rows.
    pub rows: usize,
    /// Block width in world units.
    pub w: f64,
    /// Block height in world units.
    pub h: f64,
}

/// Weight of last-row underfill relative to the smaller item dimension.
const UNDERFILL_WEIGHT: f64 = 0.2;

/// Picks `(cols, rows)` for `n` identical items, minimizing a squareness plus
/// last-row-underfill cost. O(n); the first minimum wins so the result is
/// deterministic.
pub fn best_grid(n: usize, item_w: f64, item_h: f64, gap_x: f64, gap_y: f64) -> GridFit {
    if n == 0 {
        return GridFit::default();
    }

    let mut best = GridFit::default();
    let mut best_cost = f64::INFINITY;
    for cols in 1..=n {
        let rows = n.div_ceil(cols);
        let w = cols as f64 * item_w + (cols - 1) as f64 * gap_x;
        let h = rows as f64 * item_h + (rows - 1) as f64 * gap_y;

        let last_row = n - (rows - 1) * cols;
        let underfill = (cols - last_row) as f64 / cols as f64;
        let cost = (w - h).abs() + underfill * UNDERFILL_WEIGHT * item_w.min(item_h);

        if cost < best_cost {
            best_cost = cost;
            best = GridFit { cols, rows, w, h };
        }
    }
    best
}
