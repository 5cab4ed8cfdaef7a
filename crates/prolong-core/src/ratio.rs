//! Refinement ratios between adjacent levels.

use crate::error::LayoutError;
use crate::index::{coarsen, Axis, IntVect};
use crate::Real;

/// Fine cells per coarse cell along each axis.
///
/// Every entry is at least 1. 2-D ratios carry `z == 1` so that
/// coarsening leaves `k == 0` untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ratio(IntVect);

impl Ratio {
    /// Ratio 2 in x and y, 1 in z: the common 2-D case and the only ratio
    /// the quartic and divergence-preserving operators accept.
    pub const TWO: Ratio = Ratio(IntVect::new(2, 2, 1));

    /// Create a 3-D ratio.
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self, LayoutError> {
        let v = IntVect::new(x, y, z);
        for axis in Axis::ALL {
            if v[axis] < 1 {
                return Err(LayoutError::InvalidRatio {
                    axis,
                    value: v[axis],
                });
            }
        }
        Ok(Self(v))
    }

    /// Create a 2-D ratio (`z == 1`).
    pub fn new_2d(x: i32, y: i32) -> Result<Self, LayoutError> {
        Self::new(x, y, 1)
    }

    /// Entry for `axis`.
    #[inline]
    pub fn get(self, axis: Axis) -> i32 {
        self.0[axis]
    }

    /// Entry for x.
    #[inline]
    pub fn x(self) -> i32 {
        self.0.x()
    }

    /// Entry for y.
    #[inline]
    pub fn y(self) -> i32 {
        self.0.y()
    }

    /// Entry for z.
    #[inline]
    pub fn z(self) -> i32 {
        self.0.z()
    }

    /// `1 / ratio[axis]`.
    #[inline]
    pub fn inv(self, axis: Axis) -> Real {
        1.0 / self.get(axis) as Real
    }

    /// Whether x and y both equal `r`.
    pub fn is_2d(self, r: i32) -> bool {
        self.x() == r && self.y() == r
    }

    /// Coarse index containing fine index `iv`.
    #[inline]
    pub fn coarsen(self, iv: IntVect) -> IntVect {
        IntVect::new(
            coarsen(iv.x(), self.x()),
            coarsen(iv.y(), self.y()),
            coarsen(iv.z(), self.z()),
        )
    }

    /// Lowest fine index covered by coarse index `iv`.
    #[inline]
    pub fn refine(self, iv: IntVect) -> IntVect {
        IntVect::new(iv.x() * self.x(), iv.y() * self.y(), iv.z() * self.z())
    }

    /// Number of fine cells per coarse cell.
    pub fn volume(self) -> usize {
        self.x() as usize * self.y() as usize * self.z() as usize
    }
}
