//! Error types for the placement engine.
//!
//! Planning operations never fail on the normal path: fallback chains always
//! produce a complete result. Errors are reserved for context validation,
//! i.e. snapshots that cannot describe a canvas at all.

use thiserror::Error;

/// Errors raised by [`crate::PlacementContext::validate`].
#[derive(Debug, Error)]
pub enum Error {
    /// Item dimensions must be strictly positive.
    #[error("invalid item size: {width}x{height}")]
    InvalidItemSize {
        /// Requested item width.
        width: f64,
        /// Requested item height.
        height: f64,
    },

    /// The snap grid unit must be strictly positive.
    #[error("invalid grid unit: {0}")]
    InvalidGridUnit(f64),

    /// Canvas bounds must have positive area.
    #[error("invalid canvas bounds: {width}x{height}")]
    InvalidBounds {
        /// Bounds width.
        width: f64,
        /// Bounds height.
        height: f64,
    },

    /// Gaps between items cannot be negative.
    #[error("negative item gap: {x}x{y}")]
    NegativeGap {
        /// Horizontal gap.
        x: f64,
        /// Vertical gap.
        y: f64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
