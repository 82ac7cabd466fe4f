//! # canvas-nest
//!
//! Non-overlapping, grid-aligned placement for rectangular items on an
//! effectively unbounded 2D canvas.
//!
//! The engine answers one question fast enough to run inside a UI
//! interaction: given a snapshot of the occupied rectangles (cards and card
//! groups) and a request for N new rectangles, where do they go so that
//! nothing overlaps, everything snaps to the grid, and the layout stays
//! visually compact near the requested location?
//!
//! ## Planners
//!
//! - [`plan_import_positions`] — N identical items; prefers a fully empty
//!   block near existing content, otherwise flows items around it.
//! - [`plan_flow`] — N identical items filling the gaps around a seed.
//! - [`plan_rectangles`] — an arbitrary list of differently-sized rectangles
//!   with optional label-based clustering.
//!
//! Every call is synchronous, deterministic and side-effect-free: the engine
//! rebuilds its spatial index and occupancy grid from the snapshot it is
//! handed and never caches across calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use canvas_nest::{PlacementContext, PlanConfig, Point, Rect, plan_import_positions};
//!
//! let context = PlacementContext::new(Rect::new(-2000.0, -2000.0, 4000.0, 4000.0), 100.0, 140.0)
//!     .with_gaps(4.0, 4.0)
//!     .with_card(Point::new(0.0, 0.0));
//! context.validate().unwrap();
//!
//! let result = plan_import_positions(5, &context, &PlanConfig::default());
//! assert_eq!(result.positions.len(), 5);
//! println!("placed 5 cards inside {:?}", result.block);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization of the public types.

pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod free_spot;
pub mod geometry;
pub mod grid_fit;
pub mod heap;
pub mod import_plan;
pub mod multi_rect;
pub mod occupancy;
pub mod result;
pub mod spatial_index;

// Re-exports
pub use config::PlanConfig;
pub use context::PlacementContext;
pub use error::{Error, Result};
pub use flow::plan_flow;
pub use free_spot::find_nearest_free_spot;
pub use geometry::{Point, Rect, dist2, snap};
pub use grid_fit::{GridFit, best_grid};
pub use heap::StableMinHeap;
pub use import_plan::plan_import_positions;
pub use multi_rect::{PlanOptions, RectItem, plan_rectangles};
pub use occupancy::OccupancyGrid;
pub use result::PlanResult;
pub use spatial_index::{ObstacleEntry, ObstacleIndex, ObstacleMode};
