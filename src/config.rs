//! Planner tuning parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning parameters shared by all planners.
///
/// The defaults reproduce the behavior the engine was tuned for (card-sized
/// items on an 8-unit padded canvas); they are exposed so callers with very
/// different item sizes or grid units can adjust them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanConfig {
    /// Padding kept between a placed rectangle and any obstacle.
    pub pad: f64,

    /// Maximum frontier expansions per resolution level of the best-first
    /// free-spot search. Guarantees termination under pathological density.
    pub max_expansions: usize,

    /// Weight of occupied-cell count when scoring candidate block windows.
    /// Must dominate [`PlanConfig::distance_weight`] so overlap avoidance
    /// always wins over locality.
    pub overlap_weight: f64,

    /// Weight of squared distance to the content centroid when scoring
    /// candidate block windows. Breaks ties between equally-free windows.
    pub distance_weight: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            pad: 8.0,
            max_expansions: 20_000,
            overlap_weight: 1.0e7,
            distance_weight: 1.0,
        }
    }
}

impl PlanConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the obstacle padding.
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = pad.max(0.0);
        self
    }

    /// Sets the per-resolution expansion cap of the free-spot search.
    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = max.max(1);
        self
    }

    /// Sets the window-scoring weights.
    pub fn with_window_weights(mut self, overlap: f64, distance: f64) -> Self {
        self.overlap_weight = overlap;
        self.distance_weight = distance;
        self
    }
}
