//! Occupancy grid with summed-area table.
//!
//! The canvas is rasterized onto cells the size of one item plus its gap.
//! Only cells that hold a whole item count; a partial strip at the far edge
//! of an unaligned canvas carries no cells, so cell assignments never spill
//! past the bounds. Every cell touched by a pad-dilated obstacle bounding box
//! is marked occupied, and a prefix-sum table over the bitmap answers "how
//! many occupied cells in this cell range" with four lookups.

use crate::config::PlanConfig;
use crate::context::PlacementContext;
use crate::geometry::{Point, Rect, snap};

/// Item-cell rasterization of the canvas for one planning call.
#[derive(Debug)]
pub struct OccupancyGrid {
    origin: Point,
    cols: usize,
    rows: usize,
    spacing_x: f64,
    spacing_y: f64,
    grid_unit: f64,
    occupied: Vec<bool>,
    // (cols + 1) x (rows + 1) summed-area table.
    sums: Vec<u32>,
}

impl OccupancyGrid {
    /// Rasterizes the context's obstacles onto item-sized cells.
    pub fn build(context: &PlacementContext, config: &PlanConfig) -> Self {
        let spacing_x = context.spacing_x();
        let spacing_y = context.spacing_y();
        let cols = full_cells(context.bounds.w, context.item_w, spacing_x);
        let rows = full_cells(context.bounds.h, context.item_h, spacing_y);

        let mut grid = Self {
            origin: Point::new(context.bounds.x, context.bounds.y),
            cols,
            rows,
            spacing_x,
            spacing_y,
            grid_unit: context.grid_unit,
            occupied: vec![false; cols * rows],
            sums: Vec::new(),
        };

        for frame in context.groups.values() {
            grid.mark(frame.expand(config.pad));
        }
        for card in &context.cards {
            grid.mark(context.card_rect(*card).expand(config.pad));
        }
        grid.build_sums();
        grid
    }

    /// Marks every cell touched by the rectangle as occupied.
    fn mark(&mut self, rect: Rect) {
        let i0 = ((rect.x - self.origin.x) / self.spacing_x).floor() as isize;
        let i1 = ((rect.right() - self.origin.x) / self.spacing_x).ceil() as isize - 1;
        let j0 = ((rect.y - self.origin.y) / self.spacing_y).floor() as isize;
        let j1 = ((rect.bottom() - self.origin.y) / self.spacing_y).ceil() as isize - 1;

        let i0 = i0.max(0) as usize;
        let j0 = j0.max(0) as usize;
        if i1 < 0 || j1 < 0 || i0 >= self.cols || j0 >= self.rows {
            return;
        }
        let i1 = (i1 as usize).min(self.cols - 1);
        let j1 = (j1 as usize).min(self.rows - 1);
        for j in j0..=j1 {
            for i in i0..=i1 {
                self.occupied[j * self.cols + i] = true;
            }
        }
    }

    fn build_sums(&mut self) {
        let w = self.cols + 1;
        let h = self.rows + 1;
        let mut sums = vec![0u32; w * h];
        for j in 0..self.rows {
            for i in 0..self.cols {
                let cell = u32::from(self.occupied[j * self.cols + i]);
                sums[(j + 1) * w + (i + 1)] =
                    cell + sums[j * w + (i + 1)] + sums[(j + 1) * w + i] - sums[j * w + i];
            }
        }
        self.sums = sums;
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns true if the cell is occupied.
    pub fn is_occupied(&self, i: usize, j: usize) -> bool {
        self.occupied[j * self.cols + i]
    }

    /// Occupied-cell count over the inclusive cell range.
    pub fn rect_sum(&self, i0: usize, j0: usize, i1: usize, j1: usize) -> u32 {
        debug_assert!(i0 <= i1 && j0 <= j1 && i1 < self.cols && j1 < self.rows);
        let w = self.cols + 1;
        self.sums[(j1 + 1) * w + (i1 + 1)] + self.sums[j0 * w + i0]
            - self.sums[j0 * w + (i1 + 1)]
            - self.sums[(j1 + 1) * w + i0]
    }

    /// Free-cell count over the inclusive cell range.
    pub fn free_in(&self, i0: usize, j0: usize, i1: usize, j1: usize) -> usize {
        let area = (i1 - i0 + 1) * (j1 - j0 + 1);
        area - self.rect_sum(i0, j0, i1, j1) as usize
    }

    /// Total occupied cells in the grid.
    pub fn total_occupied(&self) -> u32 {
        self.rect_sum(0, 0, self.cols - 1, self.rows - 1)
    }

    /// World position of the cell's top-left corner, grid-snapped.
    pub fn cell_origin(&self, i: usize, j: usize) -> Point {
        Point::new(
            snap(self.origin.x + i as f64 * self.spacing_x, self.grid_unit),
            snap(self.origin.y + j as f64 * self.spacing_y, self.grid_unit),
        )
    }

    /// Cell containing the world point, clamped to the grid.
    pub fn cell_of(&self, p: Point) -> (usize, usize) {
        let i = ((p.x - self.origin.x) / self.spacing_x).floor();
        let j = ((p.y - self.origin.y) / self.spacing_y).floor();
        (
            (i.max(0.0) as usize).min(self.cols - 1),
            (j.max(0.0) as usize).min(self.rows - 1),
        )
    }
}

/// Number of spacing-stepped cells whose item fully fits within `extent`.
fn full_cells(extent: f64, item: f64, spacing: f64) -> usize {
    if extent < item {
        return 1;
    }
    ((extent - item) / spacing).floor() as usize + 1
}
