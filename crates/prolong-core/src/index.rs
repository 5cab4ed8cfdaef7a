//! Integer index vectors, inclusive index boxes, and coarsening.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::LayoutError;
use crate::ratio::Ratio;

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First axis (radial in RZ geometry).
    X,
    /// Second axis.
    Y,
    /// Third axis. Unused (`k == 0`) for 2-D data.
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in an [`IntVect`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The two other axes, in ascending order.
    #[inline]
    pub const fn transverse(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Coarsen a single index: floor division by `r` (`r >= 1`).
///
/// Negative indices round toward negative infinity, so `coarsen(-1, 2) == -1`.
#[inline]
pub fn coarsen(i: i32, r: i32) -> i32 {
    i.div_euclid(r)
}

/// Three integer components `(i, j, k)`. 2-D data uses `k == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVect([i32; 3]);

impl IntVect {
    /// The origin `(0, 0, 0)`.
    pub const ZERO: IntVect = IntVect([0; 3]);

    /// Build from three components.
    #[inline]
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self([i, j, k])
    }

    /// Build a 2-D vector (`k == 0`).
    #[inline]
    pub const fn new_2d(i: i32, j: i32) -> Self {
        Self([i, j, 0])
    }

    /// First component.
    #[inline]
    pub const fn x(self) -> i32 {
        self.0[0]
    }

    /// Second component.
    #[inline]
    pub const fn y(self) -> i32 {
        self.0[1]
    }

    /// Third component.
    #[inline]
    pub const fn z(self) -> i32 {
        self.0[2]
    }

    /// Copy with one component replaced.
    #[inline]
    pub fn with(mut self, axis: Axis, value: i32) -> Self {
        self[axis] = value;
        self
    }

    /// Component-wise `self <= other` on every axis.
    #[inline]
    pub fn all_le(self, other: IntVect) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }
}

impl Index<Axis> for IntVect {
    type Output = i32;

    #[inline]
    fn index(&self, axis: Axis) -> &i32 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for IntVect {
    #[inline]
    fn index_mut(&mut self, axis: Axis) -> &mut i32 {
        &mut self.0[axis.index()]
    }
}

impl From<[i32; 3]> for IntVect {
    fn from(v: [i32; 3]) -> Self {
        Self(v)
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// An axis-aligned inclusive index rectangle `[lo, hi]`.
///
/// Boxes are never empty: construction rejects `lo > hi` on any axis.
/// Operations that could produce an empty result (such as
/// [`intersect`](Self::intersect)) return `Option`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    lo: IntVect,
    hi: IntVect,
}

impl IndexBox {
    /// Create a box, checking `lo <= hi` on every axis.
    pub fn new(lo: IntVect, hi: IntVect) -> Result<Self, LayoutError> {
        if !lo.all_le(hi) {
            return Err(LayoutError::InvertedBox { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Create a 2-D box (`k` range is `0..=0`).
    ///
    /// # Examples
    ///
    /// ```
    /// use prolong_core::IndexBox;
    ///
    /// let bx = IndexBox::new_2d([0, 0], [3, 1]).unwrap();
    /// assert_eq!(bx.num_pts(), 8);
    /// assert!(IndexBox::new_2d([2, 0], [1, 0]).is_err());
    /// ```
    pub fn new_2d(lo: [i32; 2], hi: [i32; 2]) -> Result<Self, LayoutError> {
        Self::new(IntVect::new_2d(lo[0], lo[1]), IntVect::new_2d(hi[0], hi[1]))
    }

    /// Lower corner (inclusive).
    #[inline]
    pub fn lo(&self) -> IntVect {
        self.lo
    }

    /// Upper corner (inclusive).
    #[inline]
    pub fn hi(&self) -> IntVect {
        self.hi
    }

    /// Number of indices along each axis.
    #[inline]
    pub fn length(&self) -> IntVect {
        IntVect::new(
            self.hi.x() - self.lo.x() + 1,
            self.hi.y() - self.lo.y() + 1,
            self.hi.z() - self.lo.z() + 1,
        )
    }

    /// Total number of indices in the box.
    #[inline]
    pub fn num_pts(&self) -> usize {
        let len = self.length();
        len.x() as usize * len.y() as usize * len.z() as usize
    }

    /// Whether `iv` lies inside the box.
    #[inline]
    pub fn contains(&self, iv: IntVect) -> bool {
        self.lo.all_le(iv) && iv.all_le(self.hi)
    }

    /// Overlap of two boxes, or `None` when they are disjoint.
    pub fn intersect(&self, other: &IndexBox) -> Option<IndexBox> {
        let mut lo = self.lo;
        let mut hi = self.hi;
        for axis in Axis::ALL {
            lo[axis] = lo[axis].max(other.lo[axis]);
            hi[axis] = hi[axis].min(other.hi[axis]);
        }
        Self::new(lo, hi).ok()
    }

    /// The coarse box covering every index of `self`.
    pub fn coarsen(&self, ratio: Ratio) -> IndexBox {
        Self {
            lo: ratio.coarsen(self.lo),
            hi: ratio.coarsen(self.hi),
        }
    }

    /// The fine box covered by `self`.
    pub fn refine(&self, ratio: Ratio) -> IndexBox {
        let mut hi = self.hi;
        for axis in Axis::ALL {
            hi[axis] = (hi[axis] + 1) * ratio.get(axis) - 1;
        }
        Self {
            lo: ratio.refine(self.lo),
            hi,
        }
    }

    /// Grow by `n >= 0` on both sides of `axis`.
    pub fn grow(&self, axis: Axis, n: i32) -> IndexBox {
        debug_assert!(n >= 0, "grow expects a non-negative amount, got {n}");
        let mut out = *self;
        out.lo[axis] -= n;
        out.hi[axis] += n;
        out
    }

    /// Extend the upper corner by `n >= 0` along `axis`.
    ///
    /// `extend_hi(axis, 1)` converts a cell box to its face box normal to
    /// `axis`; applying it along x and y gives the surrounding nodes.
    pub fn extend_hi(&self, axis: Axis, n: i32) -> IndexBox {
        debug_assert!(n >= 0, "extend_hi expects a non-negative amount, got {n}");
        let mut out = *self;
        out.hi[axis] += n;
        out
    }

    /// Split into `[lo, at - 1]` and `[at, hi]` along `axis`.
    ///
    /// Requires `lo[axis] < at <= hi[axis]`.
    pub fn split(&self, axis: Axis, at: i32) -> (IndexBox, IndexBox) {
        debug_assert!(
            self.lo[axis] < at && at <= self.hi[axis],
            "split point {at} outside ({}, {}]",
            self.lo[axis],
            self.hi[axis]
        );
        let lower = Self {
            lo: self.lo,
            hi: self.hi.with(axis, at - 1),
        };
        let upper = Self {
            lo: self.lo.with(axis, at),
            hi: self.hi,
        };
        (lower, upper)
    }

    /// Iterate the indices of the box, x fastest.
    pub fn iter(&self) -> BoxIter {
        BoxIter {
            bx: *self,
            cursor: Some(self.lo),
        }
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

impl IntoIterator for &IndexBox {
    type Item = IntVect;
    type IntoIter = BoxIter;

    fn into_iter(self) -> BoxIter {
        self.iter()
    }
}

/// Iterator over the indices of an [`IndexBox`], x fastest.
#[derive(Clone, Debug)]
pub struct BoxIter {
    bx: IndexBox,
    cursor: Option<IntVect>,
}

impl Iterator for BoxIter {
    type Item = IntVect;

    fn next(&mut self) -> Option<IntVect> {
        let current = self.cursor?;
        let mut next = current;
        self.cursor = None;
        for axis in Axis::ALL {
            if next[axis] < self.bx.hi[axis] {
                next[axis] += 1;
                self.cursor = Some(next);
                break;
            }
            next[axis] = self.bx.lo[axis];
        }
        Some(current)
    }
}
