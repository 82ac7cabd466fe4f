//! Spatial indexing of canvas obstacles using an R*-tree.
//!
//! The index is rebuilt for every planning call from the placement context:
//! group frames, card rects (expanded to item size) and any rectangles already
//! placed earlier in the same call. Entry ids come from a counter local to the
//! build, so the index carries no state across calls.

use std::collections::BTreeSet;

use rstar::{AABB, RTree, RTreeObject};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::PlacementContext;
use crate::geometry::Rect;

/// Which context obstacles participate in a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObstacleMode {
    /// Groups and cards are obstacles.
    #[default]
    All,
    /// Only cards are obstacles; group frames are ignored.
    CardsOnly,
}

/// An entry in the obstacle index.
#[derive(Debug, Clone)]
pub struct ObstacleEntry {
    /// Id local to the build that produced this entry.
    pub id: usize,
    /// Axis-aligned bounding box (min_x, min_y, max_x, max_y).
    pub aabb: [f64; 4],
}

impl ObstacleEntry {
    fn from_rect(id: usize, rect: Rect) -> Self {
        Self {
            id,
            aabb: [rect.x, rect.y, rect.right(), rect.bottom()],
        }
    }
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.aabb[0], self.aabb[1]], [self.aabb[2], self.aabb[3]])
    }
}

/// R*-tree over the occupied rectangles of one planning call.
#[derive(Debug)]
pub struct ObstacleIndex {
    tree: RTree<ObstacleEntry>,
    next_id: usize,
}

impl ObstacleIndex {
    /// Builds an index over every group, every card and the extra rects.
    pub fn build(context: &PlacementContext, extra: &[Rect]) -> Self {
        Self::build_filtered(
            context,
            extra,
            ObstacleMode::All,
            &BTreeSet::new(),
            &BTreeSet::new(),
        )
    }

    /// Builds an index honoring the obstacle mode and exclusion sets.
    ///
    /// Exclusions cover the items being re-placed by the current call so they
    /// are not obstacles to themselves: `exclude_groups` by group id,
    /// `exclude_cards` by index into the context's card list.
    pub fn build_filtered(
        context: &PlacementContext,
        extra: &[Rect],
        mode: ObstacleMode,
        exclude_groups: &BTreeSet<String>,
        exclude_cards: &BTreeSet<usize>,
    ) -> Self {
        let mut next_id = 0;
        let mut entries = Vec::new();
        if mode == ObstacleMode::All {
            for (id, frame) in &context.groups {
                if exclude_groups.contains(id) {
                    continue;
                }
                entries.push(ObstacleEntry::from_rect(next_id, *frame));
                next_id += 1;
            }
        }
        for (i, card) in context.cards.iter().enumerate() {
            if exclude_cards.contains(&i) {
                continue;
            }
            entries.push(ObstacleEntry::from_rect(next_id, context.card_rect(*card)));
            next_id += 1;
        }
        for rect in extra {
            entries.push(ObstacleEntry::from_rect(next_id, *rect));
            next_id += 1;
        }
        Self {
            tree: RTree::bulk_load(entries),
            next_id,
        }
    }

    /// Inserts a rectangle placed earlier in the same call.
    pub fn insert(&mut self, rect: Rect) {
        let entry = ObstacleEntry::from_rect(self.next_id, rect);
        self.next_id += 1;
        self.tree.insert(entry);
    }

    /// Returns true if the query rect, enlarged by `pad` on the query side
    /// only, intersects at least one entry.
    pub fn overlaps(&self, rect: Rect, pad: f64) -> bool {
        let padded = rect.expand(pad);
        let envelope = AABB::from_corners(
            [padded.x, padded.y],
            [padded.right(), padded.bottom()],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .next()
            .is_some()
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
