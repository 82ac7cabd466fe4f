//! Import/batch planner for N identical items.
//!
//! Prefers a fully empty block near the existing content; otherwise seeds the
//! flow-around planner at the lowest-overlap window. The empty-canvas case
//! packs a block directly around the default seed.

use tracing::debug;

use crate::config::PlanConfig;
use crate::context::PlacementContext;
use crate::flow::plan_flow;
use crate::free_spot::find_nearest_free_spot;
use crate::geometry::{Point, snap};
use crate::grid_fit::{GridFit, best_grid};
use crate::occupancy::OccupancyGrid;
use crate::result::PlanResult;
use crate::spatial_index::ObstacleIndex;

/// Plans positions for `n` identical items near the existing content.
pub fn plan_import_positions(
    n: usize,
    context: &PlacementContext,
    config: &PlanConfig,
) -> PlanResult {
    if n == 0 {
        return PlanResult::empty();
    }

    if context.cards.is_empty() {
        return pack_block_near(n, context, config, context.default_seed());
    }

    let fit = best_grid(n, context.item_w, context.item_h, context.gap_x, context.gap_y);
    let grid = OccupancyGrid::build(context, config);

    // Window size in cells equals the target item grid; clamp to the canvas.
    let win_cols = fit.cols.min(grid.cols()).max(1);
    let win_rows = fit.rows.min(grid.rows()).max(1);

    let centroid = context
        .cards_centroid()
        .map(|p| grid.cell_of(p))
        .unwrap_or((grid.cols() / 2, grid.rows() / 2));

    let mut best: Option<(f64, (usize, usize))> = None;
    for j in 0..=(grid.rows() - win_rows) {
        for i in 0..=(grid.cols() - win_cols) {
            let occupied = grid.rect_sum(i, j, i + win_cols - 1, j + win_rows - 1);
            let ci = (i + win_cols / 2) as f64 - centroid.0 as f64;
            let cj = (j + win_rows / 2) as f64 - centroid.1 as f64;
            let score = f64::from(occupied) * config.overlap_weight
                + (ci * ci + cj * cj) * config.distance_weight;
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, (i, j)));
            }
        }
    }

    let Some((_, (bi, bj))) = best else {
        // No valid window at all; let the flow planner sort it out.
        return plan_flow(n, context, None, config);
    };

    if grid.rect_sum(bi, bj, bi + win_cols - 1, bj + win_rows - 1) == 0 {
        debug!(n, "import found an empty window, packing block directly");
        let anchor = grid.cell_origin(bi, bj);
        return pack_block_at(n, context, &fit, anchor);
    }

    debug!(n, "no empty window, seeding flow-around planner");
    plan_flow(
        n,
        context,
        Some((bi + win_cols / 2, bj + win_rows / 2)),
        config,
    )
}

/// Packs a cols x rows block of `n` items with its center near `seed`,
/// anchored at the nearest free spot for the whole block.
pub(crate) fn pack_block_near(
    n: usize,
    context: &PlacementContext,
    config: &PlanConfig,
    seed: Point,
) -> PlanResult {
    let fit = best_grid(n, context.item_w, context.item_h, context.gap_x, context.gap_y);
    let index = ObstacleIndex::build(context, &[]);
    let desired = Point::new(seed.x - fit.w / 2.0, seed.y - fit.h / 2.0);
    let anchor = find_nearest_free_spot(
        context,
        desired,
        fit.w,
        fit.h,
        &index,
        config.pad,
        config,
    )
    .unwrap_or_else(|| {
        // Exact block packing at the clamped seed as the last resort.
        context.clamp_snapped(desired.x, desired.y, fit.w, fit.h)
    });
    pack_block_at(n, context, &fit, anchor)
}

/// Fills a cols x rows grid of item positions starting at `anchor`.
pub(crate) fn pack_block_at(
    n: usize,
    context: &PlacementContext,
    fit: &GridFit,
    anchor: Point,
) -> PlanResult {
    let cols = fit.cols.max(1);
    let unit = context.grid_unit;
    let positions: Vec<Point> = (0..n)
        .map(|k| {
            let col = (k % cols) as f64;
            let row = (k / cols) as f64;
            Point::new(
                snap(anchor.x + col * context.spacing_x(), unit),
                snap(anchor.y + row * context.spacing_y(), unit),
            )
        })
        .collect();
    PlanResult::from_positions(positions, context.item_w, context.item_h)
}
