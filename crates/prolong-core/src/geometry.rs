//! Per-level coordinate metadata for volume-weighted operators.

use crate::error::GeometryError;
use crate::index::Axis;
use crate::ratio::Ratio;
use crate::Real;

/// Coordinate system of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordSys {
    /// Planar x/y.
    Cartesian,
    /// Axisymmetric: x is the radius, y the axial coordinate.
    Rz,
}

/// Cell size, domain lower corner and coordinate system of one level.
///
/// # Examples
///
/// ```
/// use prolong_core::{CoordSys, GeometryContext, Ratio};
///
/// let crse = GeometryContext::new([0.5, 0.25], [0.0, 0.0], CoordSys::Cartesian).unwrap();
/// let fine = crse.refine(Ratio::TWO);
/// assert_eq!(fine.cell_size(), [0.25, 0.125]);
/// assert_eq!(crse.cell_volume(3), 0.125);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryContext {
    cell_size: [Real; 2],
    prob_lo: [Real; 2],
    coord: CoordSys,
}

impl GeometryContext {
    /// Create a context, rejecting non-positive or non-finite cell sizes and
    /// non-finite origins.
    pub fn new(
        cell_size: [Real; 2],
        prob_lo: [Real; 2],
        coord: CoordSys,
    ) -> Result<Self, GeometryError> {
        for (axis, (&dx, &lo)) in [Axis::X, Axis::Y]
            .into_iter()
            .zip(cell_size.iter().zip(prob_lo.iter()))
        {
            if !(dx.is_finite() && dx > 0.0) {
                return Err(GeometryError::InvalidCellSize { axis, value: dx });
            }
            if !lo.is_finite() {
                return Err(GeometryError::NonFiniteOrigin { axis, value: lo });
            }
        }
        Ok(Self {
            cell_size,
            prob_lo,
            coord,
        })
    }

    /// Cartesian context with its origin at zero.
    pub fn cartesian(cell_size: [Real; 2]) -> Result<Self, GeometryError> {
        Self::new(cell_size, [0.0; 2], CoordSys::Cartesian)
    }

    /// Cell size per axis.
    #[inline]
    pub fn cell_size(&self) -> [Real; 2] {
        self.cell_size
    }

    /// Domain lower corner per axis.
    #[inline]
    pub fn prob_lo(&self) -> [Real; 2] {
        self.prob_lo
    }

    /// Coordinate system tag.
    #[inline]
    pub fn coord(&self) -> CoordSys {
        self.coord
    }

    /// `dx / dy`.
    #[inline]
    pub fn aspect_ratio(&self) -> Real {
        self.cell_size[0] / self.cell_size[1]
    }

    /// Context of the level refined by `ratio` from this one.
    pub fn refine(&self, ratio: Ratio) -> Self {
        Self {
            cell_size: [
                self.cell_size[0] * ratio.inv(Axis::X),
                self.cell_size[1] * ratio.inv(Axis::Y),
            ],
            prob_lo: self.prob_lo,
            coord: self.coord,
        }
    }

    /// Volume weight of cell column `i`.
    ///
    /// Cartesian: `dx * dy`. RZ: `(r+^2 - r-^2) * dy` with
    /// `r± = prob_lo_x + (i ± 0.5) * dx`, without the `π` factor; the factor
    /// cancels in every ratio of volumes the operators form.
    #[inline]
    pub fn cell_volume(&self, i: i32) -> Real {
        let [dx, dy] = self.cell_size;
        match self.coord {
            CoordSys::Cartesian => dx * dy,
            CoordSys::Rz => {
                let rp = self.prob_lo[0] + (i as Real + 0.5) * dx;
                let rm = self.prob_lo[0] + (i as Real - 0.5) * dx;
                (rp * rp - rm * rm) * dy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_cell_sizes() {
        assert_eq!(
            GeometryContext::cartesian([0.0, 1.0]),
            Err(GeometryError::InvalidCellSize {
                axis: Axis::X,
                value: 0.0
            })
        );
        assert!(GeometryContext::cartesian([1.0, Real::NAN]).is_err());
        assert!(GeometryContext::new([1.0, 1.0], [Real::INFINITY, 0.0], CoordSys::Rz).is_err());
    }

    #[test]
    fn cartesian_volume_is_constant() {
        let g = GeometryContext::cartesian([0.5, 2.0]).unwrap();
        assert_eq!(g.cell_volume(-4), 1.0);
        assert_eq!(g.cell_volume(9), 1.0);
        assert_eq!(g.aspect_ratio(), 0.25);
    }

    #[test]
    fn rz_volume_grows_with_radius() {
        let g = GeometryContext::new([1.0, 3.0], [0.0, 0.0], CoordSys::Rz).unwrap();
        // (i + 0.5)^2 - (i - 0.5)^2 == 2i
        assert_eq!(g.cell_volume(0), 0.0);
        assert_eq!(g.cell_volume(1), 6.0);
        assert_eq!(g.cell_volume(4), 24.0);

        let shifted = GeometryContext::new([1.0, 1.0], [2.0, 0.0], CoordSys::Rz).unwrap();
        assert_eq!(shifted.cell_volume(0), 4.0);
    }

    #[test]
    fn refine_divides_cell_size() {
        let g = GeometryContext::new([1.0, 1.0], [0.5, -1.0], CoordSys::Rz).unwrap();
        let f = g.refine(Ratio::new_2d(2, 4).unwrap());
        assert_eq!(f.cell_size(), [0.5, 0.25]);
        assert_eq!(f.prob_lo(), [0.5, -1.0]);
        assert_eq!(f.coord(), CoordSys::Rz);
    }
}
