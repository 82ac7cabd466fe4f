//! Generic multi-rectangle planner.
//!
//! Places an arbitrary list of differently-sized rectangles (typically group
//! frames) one at a time via the best-first finder against a growing obstacle
//! index. Items sharing a label cluster together: each one's desired point is
//! blended toward the running centroid of its already-placed siblings.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::PlanConfig;
use crate::context::PlacementContext;
use crate::free_spot::find_nearest_free_spot;
use crate::geometry::{Point, Rect, dist2};
use crate::result::PlanResult;
use crate::spatial_index::{ObstacleIndex, ObstacleMode};

/// One rectangle of a multi-rect request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectItem {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Optional clustering label; items sharing a label land together.
    pub label: Option<String>,
}

impl RectItem {
    /// Creates an unlabeled item.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h, label: None }
    }

    /// Sets the clustering label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Options for [`plan_rectangles`].
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Call-level desired point; defaults to the context seed.
    pub seed: Option<Point>,
    /// Per-item desired-point overrides, keyed by request index.
    pub desired_seeds: BTreeMap<usize, Point>,
    /// How strongly labeled items are pulled toward their siblings, in [0, 1].
    pub attract_strength: f64,
    /// Place items in input order instead of the label/area ordering.
    pub preserve_order: bool,
    /// Which context obstacles to honor.
    pub obstacle_mode: ObstacleMode,
    /// Group ids that are being re-placed by this call and therefore are not
    /// obstacles to themselves.
    pub exclude_groups: BTreeSet<String>,
    /// Indices into the context's card list to ignore as obstacles.
    pub exclude_cards: BTreeSet<usize>,
}

impl PlanOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the call-level desired point.
    pub fn with_seed(mut self, seed: Point) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets a per-item desired point.
    pub fn with_desired_seed(mut self, index: usize, seed: Point) -> Self {
        self.desired_seeds.insert(index, seed);
        self
    }

    /// Sets the label attraction strength.
    pub fn with_attract_strength(mut self, strength: f64) -> Self {
        self.attract_strength = strength.clamp(0.0, 1.0);
        self
    }

    /// Keeps the input placement order.
    pub fn with_preserve_order(mut self, preserve: bool) -> Self {
        self.preserve_order = preserve;
        self
    }

    /// Sets the obstacle mode.
    pub fn with_obstacle_mode(mut self, mode: ObstacleMode) -> Self {
        self.obstacle_mode = mode;
        self
    }

    /// Excludes a group id from the obstacle set.
    pub fn with_excluded_group(mut self, id: impl Into<String>) -> Self {
        self.exclude_groups.insert(id.into());
        self
    }

    /// Excludes a card index from the obstacle set.
    pub fn with_excluded_card(mut self, index: usize) -> Self {
        self.exclude_cards.insert(index);
        self
    }
}

/// Plans positions for an arbitrary list of rectangles.
///
/// Positions come back aligned 1:1 with the input order regardless of the
/// internal placement order. Fallbacks per item: best-first search, coarse
/// exhaustive scan, and finally a clamp to the desired position, which may
/// overlap.
pub fn plan_rectangles(
    items: &[RectItem],
    context: &PlacementContext,
    options: &PlanOptions,
    config: &PlanConfig,
) -> PlanResult {
    if items.is_empty() {
        return PlanResult::empty();
    }

    let mut index = ObstacleIndex::build_filtered(
        context,
        &[],
        options.obstacle_mode,
        &options.exclude_groups,
        &options.exclude_cards,
    );

    let order = placement_order(items, options.preserve_order);
    let base_seed = options.seed.unwrap_or_else(|| context.default_seed());
    let attract = options.attract_strength.clamp(0.0, 1.0);

    // Running centroid of placed rect centers per label: (sum_x, sum_y, count).
    let mut centroids: BTreeMap<&str, (f64, f64, f64)> = BTreeMap::new();
    let mut positions = vec![Point::default(); items.len()];
    let mut block: Option<Rect> = None;

    for idx in order {
        let item = &items[idx];
        let mut desired_center = options
            .desired_seeds
            .get(&idx)
            .copied()
            .unwrap_or(base_seed);
        if let Some(label) = item.label.as_deref()
            && let Some(&(sx, sy, count)) = centroids.get(label)
        {
            let centroid = Point::new(sx / count, sy / count);
            desired_center = Point::new(
                desired_center.x + (centroid.x - desired_center.x) * attract,
                desired_center.y + (centroid.y - desired_center.y) * attract,
            );
        }

        let desired = Point::new(
            desired_center.x - item.w / 2.0,
            desired_center.y - item.h / 2.0,
        );
        let position = find_nearest_free_spot(
            context,
            desired,
            item.w,
            item.h,
            &index,
            config.pad,
            config,
        )
        .or_else(|| {
            debug!(idx, "best-first search failed, falling back to coarse scan");
            coarse_scan(context, desired, item.w, item.h, &index, config.pad)
        })
        .unwrap_or_else(|| {
            // Documented last resort: clamp to the desired position even if
            // it overlaps.
            debug!(idx, "no free spot anywhere, clamping to desired position");
            context.clamp_snapped(desired.x, desired.y, item.w, item.h)
        });

        positions[idx] = position;
        let rect = Rect::new(position.x, position.y, item.w, item.h);
        index.insert(rect);
        if let Some(label) = item.label.as_deref() {
            let center = rect.center();
            let entry = centroids.entry(label).or_insert((0.0, 0.0, 0.0));
            entry.0 += center.x;
            entry.1 += center.y;
            entry.2 += 1.0;
        }
        block = Some(match block {
            Some(b) => b.union(&rect),
            None => rect,
        });
    }

    PlanResult {
        positions,
        block: block.unwrap_or(Rect::ZERO),
    }
}

/// Placement order: input order when preserved; otherwise labeled items
/// grouped contiguously ordered by label, then unlabeled items by descending
/// area with the original index as the deterministic tie-break (bigger items
/// are harder to fit later).
fn placement_order(items: &[RectItem], preserve_order: bool) -> Vec<usize> {
    if preserve_order {
        return (0..items.len()).collect();
    }
    let mut labeled: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut unlabeled: Vec<usize> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match item.label.as_deref() {
            Some(label) => labeled.entry(label).or_default().push(idx),
            None => unlabeled.push(idx),
        }
    }
    unlabeled.sort_by(|&a, &b| {
        let area_a = items[a].w * items[a].h;
        let area_b = items[b].w * items[b].h;
        area_b
            .partial_cmp(&area_a)
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut order: Vec<usize> = labeled.into_values().flatten().collect();
    order.extend(unlabeled);
    order
}

/// Exhaustive scan over spacing-stepped positions, nearest to `desired` first.
fn coarse_scan(
    context: &PlacementContext,
    desired: Point,
    w: f64,
    h: f64,
    index: &ObstacleIndex,
    pad: f64,
) -> Option<Point> {
    let step_x = context.spacing_x();
    let step_y = context.spacing_y();
    let cols = ((context.bounds.w / step_x).ceil() as usize).max(1);
    let rows = ((context.bounds.h / step_y).ceil() as usize).max(1);
    let desired_center = Point::new(desired.x + w / 2.0, desired.y + h / 2.0);

    let mut best: Option<(f64, f64, f64, Point)> = None;
    for j in 0..rows {
        for i in 0..cols {
            let x = context.bounds.x + i as f64 * step_x;
            let y = context.bounds.y + j as f64 * step_y;
            let p = context.clamp_snapped(x, y, w, h);
            if index.overlaps(Rect::new(p.x, p.y, w, h), pad) {
                continue;
            }
            let d = dist2(Point::new(p.x + w / 2.0, p.y + h / 2.0), desired_center);
            let key = (d, p.y, p.x);
            if best.is_none_or(|(bd, by, bx, _)| key < (bd, by, bx)) {
                best = Some((d, p.y, p.x, p));
            }
        }
    }
    best.map(|(_, _, _, p)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> PlacementContext {
        PlacementContext::new(Rect::new(-2080.0, -2160.0, 4160.0, 4320.0), 100.0, 140.0)
    }

    #[test]
    fn test_empty_request() {
        let result = plan_rectangles(&[], &test_context(), &PlanOptions::new(), &PlanConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_placement_order_area_desc() {
        let items = vec![
            RectItem::new(10.0, 10.0),
            RectItem::new(100.0, 100.0),
            RectItem::new(50.0, 50.0),
        ];
        assert_eq!(placement_order(&items, false), vec![1, 2, 0]);
        assert_eq!(placement_order(&items, true), vec![0, 1, 2]);
    }

    #[test]
    fn test_placement_order_labels_first() {
        let items = vec![
            RectItem::new(10.0, 10.0),
            RectItem::new(500.0, 500.0).with_label("b"),
            RectItem::new(20.0, 20.0).with_label("a"),
            RectItem::new(30.0, 30.0).with_label("a"),
        ];
        // Label groups in label order, then unlabeled by area.
        assert_eq!(placement_order(&items, false), vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_equal_areas_tie_break_by_index() {
        let items = vec![
            RectItem::new(40.0, 10.0),
            RectItem::new(20.0, 20.0),
            RectItem::new(10.0, 40.0),
        ];
        assert_eq!(placement_order(&items, false), vec![0, 1, 2]);
    }

    #[test]
    fn test_no_mutual_overlap() {
        let ctx = test_context().with_group("existing", Rect::new(-150.0, -150.0, 300.0, 300.0));
        let cfg = PlanConfig::default();
        let items = vec![
            RectItem::new(200.0, 120.0),
            RectItem::new(300.0, 180.0),
            RectItem::new(120.0, 260.0),
            RectItem::new(100.0, 140.0),
        ];
        let result = plan_rectangles(&items, &ctx, &PlanOptions::new(), &cfg);
        assert_eq!(result.len(), 4);

        let rects: Vec<Rect> = result
            .positions
            .iter()
            .zip(&items)
            .map(|(p, it)| Rect::new(p.x, p.y, it.w, it.h))
            .collect();
        for (a, ra) in rects.iter().enumerate() {
            // Clear of the pre-existing group.
            assert!(
                !ra.expand(cfg.pad)
                    .intersects(&Rect::new(-150.0, -150.0, 300.0, 300.0)),
                "rect {} overlaps the group",
                a
            );
            for (b, rb) in rects.iter().enumerate().skip(a + 1) {
                assert!(!ra.expand(cfg.pad).intersects(rb), "rects {} and {} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_positions_align_with_input_order() {
        let ctx = test_context();
        let items = vec![
            RectItem::new(50.0, 50.0),
            RectItem::new(400.0, 400.0),
        ];
        let result = plan_rectangles(&items, &ctx, &PlanOptions::new(), &PlanConfig::default());
        // The big rect is placed first but must come back at index 1; the
        // first-placed item always sits at the (clamped, snapped) seed.
        let big = Rect::new(result.positions[1].x, result.positions[1].y, 400.0, 400.0);
        assert!(big.center().x.abs() <= 8.0);
        assert!(big.center().y.abs() <= 8.0);
    }

    #[test]
    fn test_labeled_items_cluster() {
        let ctx = test_context();
        let opts = PlanOptions::new().with_attract_strength(0.8);
        let items: Vec<RectItem> = (0..6)
            .map(|i| {
                let label = if i % 2 == 0 { "even" } else { "odd" };
                RectItem::new(120.0, 80.0).with_label(label)
            })
            .collect();
        let result = plan_rectangles(&items, &ctx, &opts, &PlanConfig::default());

        // Mean within-cluster distance should not exceed the overall spread.
        let centers: Vec<Point> = result
            .positions
            .iter()
            .map(|p| Rect::new(p.x, p.y, 120.0, 80.0).center())
            .collect();
        let spread = result.block.w.max(result.block.h);
        for cluster in [[0usize, 2, 4], [1, 3, 5]] {
            for w in cluster.windows(2) {
                let d = dist2(centers[w[0]], centers[w[1]]).sqrt();
                assert!(d <= spread, "cluster members {} apart, spread {}", d, spread);
            }
        }
    }

    #[test]
    fn test_excluded_group_not_an_obstacle() {
        let ctx = test_context().with_group("self", Rect::new(-100.0, -100.0, 200.0, 200.0));
        let opts = PlanOptions::new().with_excluded_group("self");
        let items = vec![RectItem::new(200.0, 200.0)];
        let result = plan_rectangles(&items, &ctx, &opts, &PlanConfig::default());
        // With the group excluded the item can take its own old spot.
        assert_eq!(result.positions[0], Point::new(-100.0, -100.0));
    }

    #[test]
    fn test_deterministic() {
        let ctx = test_context()
            .with_group("g", Rect::new(0.0, 0.0, 300.0, 300.0))
            .with_card(Point::new(-400.0, -400.0));
        let items = vec![
            RectItem::new(200.0, 120.0).with_label("x"),
            RectItem::new(200.0, 120.0).with_label("x"),
            RectItem::new(80.0, 80.0),
        ];
        let opts = PlanOptions::new().with_attract_strength(0.5);
        let cfg = PlanConfig::default();
        let a = plan_rectangles(&items, &ctx, &opts, &cfg);
        let b = plan_rectangles(&items, &ctx, &opts, &cfg);
        assert_eq!(a, b);
    }
}
