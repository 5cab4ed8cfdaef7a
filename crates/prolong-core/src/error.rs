//! Error types for view construction and level geometry.
//!
//! Transfer kernels never fail at runtime; precondition violations are the
//! caller's responsibility. These errors are only produced when building the
//! inputs to a kernel: boxes, ratios, views over caller storage, and
//! geometry contexts.

use std::error::Error;
use std::fmt;

use crate::index::{Axis, IntVect};
use crate::Real;

/// Errors from constructing index boxes, ratios, or array views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A box has `lo > hi` on at least one axis.
    InvertedBox {
        /// Requested lower corner.
        lo: IntVect,
        /// Requested upper corner.
        hi: IntVect,
    },
    /// A refinement ratio entry is below 1.
    InvalidRatio {
        /// Axis carrying the bad entry.
        axis: Axis,
        /// The rejected value.
        value: i32,
    },
    /// The backing slice is shorter than `num_pts * ncomp`.
    StorageTooSmall {
        /// Length of the slice supplied by the caller.
        len: usize,
        /// Number of elements the view needs.
        required: usize,
    },
    /// A view was requested with zero components.
    ZeroComponents,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedBox { lo, hi } => {
                write!(f, "box lower corner {lo} exceeds upper corner {hi}")
            }
            Self::InvalidRatio { axis, value } => {
                write!(f, "refinement ratio along {axis:?} must be >= 1, got {value}")
            }
            Self::StorageTooSmall { len, required } => {
                write!(f, "storage holds {len} elements, view needs {required}")
            }
            Self::ZeroComponents => write!(f, "view must have at least one component"),
        }
    }
}

impl Error for LayoutError {}

/// Errors from constructing a [`GeometryContext`](crate::GeometryContext).
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// Cell size is zero, negative, NaN or infinite.
    InvalidCellSize {
        /// Axis carrying the bad size.
        axis: Axis,
        /// The rejected value.
        value: Real,
    },
    /// Domain lower corner is NaN or infinite.
    NonFiniteOrigin {
        /// Axis carrying the bad coordinate.
        axis: Axis,
        /// The rejected value.
        value: Real,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { axis, value } => {
                write!(f, "cell size along {axis:?} must be finite and positive, got {value}")
            }
            Self::NonFiniteOrigin { axis, value } => {
                write!(f, "domain origin along {axis:?} must be finite, got {value}")
            }
        }
    }
}

impl Error for GeometryError {}
