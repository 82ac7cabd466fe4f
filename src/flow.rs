//! Flow-around planner.
//!
//! Places N identical items into the gaps of the existing layout: grow a
//! cell-rectangle around a seed until it holds enough free cells, then assign
//! cells nearest-first. New items reflow around existing content instead of
//! jumping to a far empty area, which keeps a growing layout visually
//! coherent.

use std::collections::HashSet;

use tracing::debug;

use crate::config::PlanConfig;
use crate::context::PlacementContext;
use crate::geometry::Point;
use crate::grid_fit::best_grid;
use crate::import_plan::pack_block_near;
use crate::occupancy::OccupancyGrid;
use crate::result::PlanResult;

/// Plans `n` identical item positions flowing around existing content.
///
/// The seed cell is the given cell, else the context seed, else the centroid
/// of existing cards, else the grid center.
pub fn plan_flow(
    n: usize,
    context: &PlacementContext,
    seed_cell: Option<(usize, usize)>,
    config: &PlanConfig,
) -> PlanResult {
    if n == 0 {
        return PlanResult::empty();
    }

    let grid = OccupancyGrid::build(context, config);
    let (si, sj) = seed_cell
        .or_else(|| context.seed.map(|p| grid.cell_of(p)))
        .or_else(|| context.cards_centroid().map(|p| grid.cell_of(p)))
        .unwrap_or((grid.cols() / 2, grid.rows() / 2));
    // Callers may hand in a seed cell past the grid edge.
    let (si, sj) = (si.min(grid.cols() - 1), sj.min(grid.rows() - 1));

    let fit = best_grid(n, context.item_w, context.item_h, context.gap_x, context.gap_y);
    let (i0, j0, i1, j1) = grow_region(&grid, (si, sj), n, fit.cols.max(1), fit.rows.max(1));

    if grid.free_in(i0, j0, i1, j1) == 0 {
        // Even full growth found nothing free: hand over to block packing
        // near the seed.
        debug!(n, "flow region fully occupied, falling back to block packing");
        let origin = grid.cell_origin(si, sj);
        let seed = Point::new(
            origin.x + context.spacing_x() / 2.0,
            origin.y + context.spacing_y() / 2.0,
        );
        return pack_block_near(n, context, config, seed);
    }

    let mut chosen: Vec<(usize, usize)> = Vec::with_capacity(n);
    let mut used: HashSet<(usize, usize)> = HashSet::new();

    // Free cells inside the region, nearest to the seed first.
    let mut region_free: Vec<(usize, usize)> = Vec::new();
    for j in j0..=j1 {
        for i in i0..=i1 {
            if !grid.is_occupied(i, j) {
                region_free.push((i, j));
            }
        }
    }
    sort_by_chebyshev(&mut region_free, (si, sj));
    for cell in region_free.into_iter().take(n) {
        used.insert(cell);
        chosen.push(cell);
    }

    // Ring expansion outside the region, skipping the interior already
    // considered.
    if chosen.len() < n {
        let max_r = ring_limit(&grid, (si, sj));
        for r in 1..=max_r {
            if chosen.len() >= n {
                break;
            }
            let mut ring = ring_cells(&grid, (si, sj), r);
            ring.retain(|&(i, j)| {
                !(i >= i0 && i <= i1 && j >= j0 && j <= j1) && !grid.is_occupied(i, j)
            });
            ring.sort_by_key(|&(i, j)| (j, i));
            for cell in ring {
                if chosen.len() >= n {
                    break;
                }
                if used.insert(cell) {
                    chosen.push(cell);
                }
            }
        }
    }

    // Full-grid scan to top up: free cells first, then occupied cells as the
    // overlapping last resort so the returned count never shrinks.
    if chosen.len() < n {
        debug!(
            placed = chosen.len(),
            n, "flow ring expansion short, scanning full grid"
        );
        let mut all: Vec<(usize, usize)> = (0..grid.rows())
            .flat_map(|j| (0..grid.cols()).map(move |i| (i, j)))
            .collect();
        sort_by_chebyshev(&mut all, (si, sj));
        for &cell in &all {
            if chosen.len() >= n {
                break;
            }
            if !grid.is_occupied(cell.0, cell.1) && used.insert(cell) {
                chosen.push(cell);
            }
        }
        for &cell in &all {
            if chosen.len() >= n {
                break;
            }
            if used.insert(cell) {
                chosen.push(cell);
            }
        }
        // Requests larger than the whole grid wrap around it.
        let mut k = 0;
        while chosen.len() < n {
            chosen.push(all[k % all.len()]);
            k += 1;
        }
    }

    let positions: Vec<Point> = chosen
        .into_iter()
        .map(|(i, j)| {
            let p = grid.cell_origin(i, j);
            context.clamp_snapped(p.x, p.y, context.item_w, context.item_h)
        })
        .collect();
    PlanResult::from_positions(positions, context.item_w, context.item_h)
}

/// Grows a cell-rectangle centered on the seed, alternately widening or
/// heightening toward the target aspect, until it holds `n` free cells or
/// covers the grid. Returns the inclusive region `(i0, j0, i1, j1)`.
fn grow_region(
    grid: &OccupancyGrid,
    seed: (usize, usize),
    n: usize,
    target_cols: usize,
    target_rows: usize,
) -> (usize, usize, usize, usize) {
    let (si, sj) = seed;
    let (mut i0, mut i1, mut j0, mut j1) = (si, si, sj, sj);
    let target_aspect = target_cols as f64 / target_rows as f64;

    loop {
        if grid.free_in(i0, j0, i1, j1) >= n {
            break;
        }
        let can_widen = i0 > 0 || i1 < grid.cols() - 1;
        let can_heighten = j0 > 0 || j1 < grid.rows() - 1;
        if !can_widen && !can_heighten {
            break;
        }

        let w = (i1 - i0 + 1) as f64;
        let h = (j1 - j0 + 1) as f64;
        let widen_err = ((w + 1.0) / h - target_aspect).abs();
        let heighten_err = (w / (h + 1.0) - target_aspect).abs();
        if can_widen && (!can_heighten || widen_err <= heighten_err) {
            // Keep the region centered: extend the side closer to the seed.
            if i0 > 0 && (i1 == grid.cols() - 1 || si - i0 <= i1 - si) {
                i0 -= 1;
            } else {
                i1 += 1;
            }
        } else if j0 > 0 && (j1 == grid.rows() - 1 || sj - j0 <= j1 - sj) {
            j0 -= 1;
        } else {
            j1 += 1;
        }
    }
    (i0, j0, i1, j1)
}

/// Sorts cells by Chebyshev distance to the seed, ties by row then column.
fn sort_by_chebyshev(cells: &mut [(usize, usize)], seed: (usize, usize)) {
    cells.sort_by_key(|&(i, j)| (chebyshev((i, j), seed), j, i));
}

fn chebyshev(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

/// Largest ring radius that still touches the grid from the seed.
fn ring_limit(grid: &OccupancyGrid, seed: (usize, usize)) -> usize {
    let (si, sj) = seed;
    si.max(grid.cols() - 1 - si).max(sj).max(grid.rows() - 1 - sj)
}

/// In-grid cells at exactly Chebyshev distance `r` from the seed.
fn ring_cells(grid: &OccupancyGrid, seed: (usize, usize), r: usize) -> Vec<(usize, usize)> {
    let (si, sj) = seed;
    let mut cells = Vec::new();
    let in_grid = |i: isize, j: isize| {
        i >= 0 && j >= 0 && (i as usize) < grid.cols() && (j as usize) < grid.rows()
    };
    let (si, sj) = (si as isize, sj as isize);
    let r = r as isize;
    for i in (si - r)..=(si + r) {
        for &j in &[sj - r, sj + r] {
            if in_grid(i, j) {
                cells.push((i as usize, j as usize));
            }
        }
    }
    for j in (sj - r + 1)..(sj + r) {
        for &i in &[si - r, si + r] {
            if in_grid(i, j) {
                cells.push((i as usize, j as usize));
            }
        }
    }
    cells
}
