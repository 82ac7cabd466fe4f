//! Best-first multi-resolution search for the nearest free rectangle.
//!
//! The search walks outward from the desired point over a lattice of
//! grid-snapped candidates, closest first. It starts at a coarse step of
//! roughly one item so sparse regions resolve in a handful of expansions,
//! and halves the step whenever a resolution level exhausts its expansion
//! budget, down to the grid unit, so tight gaps in dense regions are still
//! found.

use std::collections::HashSet;

use tracing::trace;

use crate::config::PlanConfig;
use crate::context::PlacementContext;
use crate::geometry::{Point, Rect, dist2, snap};
use crate::heap::StableMinHeap;
use crate::spatial_index::ObstacleIndex;

/// Finds the nearest free `w`x`h` rectangle around `desired` (top-left).
///
/// Returns `None` only when even the finest resolution fails within its
/// expansion budget; callers treat that as "proceed to the next fallback".
pub fn find_nearest_free_spot(
    context: &PlacementContext,
    desired: Point,
    w: f64,
    h: f64,
    index: &ObstacleIndex,
    pad: f64,
    config: &PlanConfig,
) -> Option<Point> {
    let unit = context.grid_unit;
    let start = context.clamp_snapped(desired.x, desired.y, w, h);
    let target_center = Point::new(start.x + w / 2.0, start.y + h / 2.0);

    let mut step_x = snap(context.item_w, unit).max(unit);
    let mut step_y = snap(context.item_h, unit).max(unit);

    loop {
        if let Some(found) = search_at_step(
            context,
            start,
            target_center,
            w,
            h,
            index,
            pad,
            step_x,
            step_y,
            config.max_expansions,
        ) {
            return Some(found);
        }

        let finer_x = snap(step_x / 2.0, unit).max(unit);
        let finer_y = snap(step_y / 2.0, unit).max(unit);
        if finer_x == step_x && finer_y == step_y {
            return None;
        }
        trace!(step_x = finer_x, step_y = finer_y, "free-spot search dropping to finer step");
        step_x = finer_x;
        step_y = finer_y;
    }
}

/// One resolution level of the outward search.
#[allow(clippy::too_many_arguments)]
fn search_at_step(
    context: &PlacementContext,
    start: Point,
    target_center: Point,
    w: f64,
    h: f64,
    index: &ObstacleIndex,
    pad: f64,
    step_x: f64,
    step_y: f64,
    max_expansions: usize,
) -> Option<Point> {
    let mut frontier: StableMinHeap<Point> = StableMinHeap::new();
    let mut seen: HashSet<(i64, i64)> = HashSet::new();

    seen.insert(coord_key(start));
    frontier.push(0.0, start);

    let mut expansions = 0usize;
    while let Some(candidate) = frontier.pop() {
        expansions += 1;
        if expansions > max_expansions {
            return None;
        }

        if !index.overlaps(Rect::new(candidate.x, candidate.y, w, h), pad) {
            return Some(candidate);
        }

        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = candidate.x + dx as f64 * step_x;
                let ny = candidate.y + dy as f64 * step_y;
                let next = context.clamp_snapped(nx, ny, w, h);
                if !seen.insert(coord_key(next)) {
                    continue;
                }
                let center = Point::new(next.x + w / 2.0, next.y + h / 2.0);
                frontier.push(dist2(center, target_center), next);
            }
        }
    }
    None
}

/// Deduplication key with 1/16-unit resolution.
fn coord_key(p: Point) -> (i64, i64) {
    ((p.x * 16.0).round() as i64, (p.y * 16.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> PlacementContext {
        PlacementContext::new(Rect::new(-2000.0, -2000.0, 4000.0, 4000.0), 100.0, 140.0)
    }

    #[test]
    fn test_empty_canvas_returns_desired() {
        let ctx = test_context();
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default();
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(100.0, 100.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        )
        .unwrap();
        assert_eq!(spot, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_desired_is_grid_snapped() {
        let ctx = test_context();
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default();
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(101.0, 102.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        )
        .unwrap();
        assert_eq!(spot.x % ctx.grid_unit, 0.0);
        assert_eq!(spot.y % ctx.grid_unit, 0.0);
    }

    #[test]
    fn test_off_grid_bounds_edge_snaps_inward() {
        // Clamp limits are 898 and 858; snapping must not round back out.
        let ctx = PlacementContext::new(Rect::new(0.0, 0.0, 998.0, 998.0), 100.0, 140.0);
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default();
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(5000.0, 5000.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        )
        .unwrap();
        assert_eq!(spot, Point::new(896.0, 856.0));
        assert_eq!(spot.x % ctx.grid_unit, 0.0);
        assert_eq!(spot.y % ctx.grid_unit, 0.0);
        assert!(spot.x + 100.0 <= 998.0 && spot.y + 140.0 <= 998.0);
    }

    #[test]
    fn test_avoids_obstacle() {
        let ctx = test_context().with_group("g", Rect::new(0.0, 0.0, 300.0, 300.0));
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default();
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(100.0, 100.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        )
        .unwrap();
        let rect = Rect::new(spot.x, spot.y, 100.0, 140.0).expand(cfg.pad);
        assert!(!rect.intersects(&Rect::new(0.0, 0.0, 300.0, 300.0)));
    }

    #[test]
    fn test_finds_tight_gap_at_fine_resolution() {
        // Two walls with a gap barely wide enough for the item plus padding.
        let ctx = test_context()
            .with_group("left", Rect::new(-1000.0, -2000.0, 880.0, 4000.0))
            .with_group("right", Rect::new(0.0, -2000.0, 1000.0, 4000.0));
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default();
        // Gap is x in [-120, 0), item is 100 wide with 8 padding: x must be
        // in [-112, -108]; only fine steps can land there.
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(-60.0, 0.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        )
        .unwrap();
        assert!(spot.x >= -112.0 && spot.x <= -108.0, "x = {}", spot.x);
    }

    #[test]
    fn test_fully_blocked_returns_none() {
        let ctx = PlacementContext::new(Rect::new(0.0, 0.0, 400.0, 400.0), 100.0, 140.0)
            .with_group("wall", Rect::new(-100.0, -100.0, 600.0, 600.0));
        let index = ObstacleIndex::build(&ctx, &[]);
        let cfg = PlanConfig::default().with_max_expansions(500);
        let spot = find_nearest_free_spot(
            &ctx,
            Point::new(200.0, 200.0),
            100.0,
            140.0,
            &index,
            cfg.pad,
            &cfg,
        );
        assert!(spot.is_none());
    }

    #[test]
    fn test_deterministic() {
        let ctx = test_context()
            .with_group("a", Rect::new(-200.0, -200.0, 400.0, 400.0))
            .with_card(Point::new(300.0, 0.0));
        let cfg = PlanConfig::default();
        let run = || {
            let index = ObstacleIndex::build(&ctx, &[]);
            find_nearest_free_spot(&ctx, Point::new(0.0, 0.0), 100.0, 140.0, &index, cfg.pad, &cfg)
        };
        assert_eq!(run(), run());
    }
}
