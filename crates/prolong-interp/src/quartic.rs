//! Conservative quartic prolongation of cell-centered data (2-D, ratio 2).
//!
//! A five-tap stencil over coarse cells `-2..=2` gives the average of the
//! quartic reconstruction over the lower half of the centre cell. The upper
//! half follows by reflection about the coarse value, `2 c - lower`, so the
//! two children always average back to the coarse cell. Applying this along
//! y and then x reproduces cell averages of any polynomial of degree four
//! or less per axis.

use std::ops::{Index, IndexMut};

use prolong_core::{coarsen, Array4, Array4Mut, IndexBox, Real};

use crate::exec::Backend;

/// Five values addressed by offsets `-2..=2`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Taps([Real; 5]);

impl Taps {
    /// Offsets in ascending order.
    pub const OFFSETS: std::ops::RangeInclusive<i32> = -2..=2;

    /// Build from values at offsets `-2, -1, 0, 1, 2`.
    pub const fn new(values: [Real; 5]) -> Self {
        Self(values)
    }

    /// `Σ self[o] * other[o]`, accumulated from offset `-2` upwards.
    #[inline]
    pub fn dot(&self, other: &Taps) -> Real {
        Self::OFFSETS.fold(0.0, |acc, o| acc + self[o] * other[o])
    }
}

impl Index<i32> for Taps {
    type Output = Real;

    #[inline]
    fn index(&self, offset: i32) -> &Real {
        &self.0[(offset + 2) as usize]
    }
}

impl IndexMut<i32> for Taps {
    #[inline]
    fn index_mut(&mut self, offset: i32) -> &mut Real {
        &mut self.0[(offset + 2) as usize]
    }
}

/// Stencil weights for the lower child, halved.
pub const QUARTIC_WEIGHTS: Taps =
    Taps::new([-0.01171875, 0.0859375, 0.5, -0.0859375, 0.01171875]);

/// Fine cell `(i, j)` of component `n` from the 5x5 coarse neighbourhood
/// of its parent.
#[inline]
pub fn ccquartic_interp(
    i: i32,
    j: i32,
    n: usize,
    crse: &Array4<'_, Real>,
    fine: &mut Array4Mut<'_, Real>,
) {
    let ic = coarsen(i, 2);
    let jc = coarsen(j, 2);
    let irx = i - 2 * ic;
    let jry = j - 2 * jc;

    let mut ctmp = Taps::default();
    for ii in Taps::OFFSETS {
        let mut column = Taps::default();
        for jj in Taps::OFFSETS {
            column[jj] = crse[(ic + ii, jc + jj, 0, n)];
        }
        let mut v = 2.0 * QUARTIC_WEIGHTS.dot(&column);
        if jry != 0 {
            v = 2.0 * column[0] - v;
        }
        ctmp[ii] = v;
    }

    let mut f = 2.0 * QUARTIC_WEIGHTS.dot(&ctmp);
    if irx != 0 {
        f = 2.0 * ctmp[0] - f;
    }
    fine[(i, j, 0, n)] = f;
}

/// [`ccquartic_interp`] over every fine cell of `bx` and every component of
/// `fine`. `crse` must cover the coarsened box grown by two cells.
pub fn ccquartic_fill(bx: IndexBox, crse: &Array4<'_, Real>, fine: &mut Array4Mut<'_, Real>) {
    for n in fine.comp_range() {
        for iv in bx.iter() {
            ccquartic_interp(iv.x(), iv.y(), n, crse, fine);
        }
    }
}

/// [`ccquartic_fill`] tiled by `backend`.
pub fn ccquartic_launch<B: Backend>(
    backend: &B,
    bx: IndexBox,
    crse: Array4<'_, Real>,
    fine: Array4Mut<'_, Real>,
) {
    backend.for_each_band(fine, 1, |mut tile| {
        if let Some(region) = bx.intersect(&tile.bounds()) {
            ccquartic_fill(region, &crse, &mut tile);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Serial;
    use prolong_core::{IntVect, Ratio};
    use prolong_test_utils::{assert_fab_close, fixtures::cell_averaged, Fab};
    use proptest::prelude::*;

    fn boxes() -> (IndexBox, IndexBox) {
        let fbx = IndexBox::new_2d([0, 0], [5, 3]).unwrap();
        let cbx = fbx.coarsen(Ratio::TWO);
        let grown = cbx.grow(prolong_core::Axis::X, 2).grow(prolong_core::Axis::Y, 2);
        (fbx, grown)
    }

    #[test]
    fn taps_are_offset_addressed() {
        let mut t = Taps::new([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(t[-2], 1.0);
        assert_eq!(t[0], 3.0);
        t[2] = 10.0;
        assert_eq!(t.dot(&Taps::new([1.0; 5])), 20.0);
    }

    #[test]
    fn weights_sum_to_half() {
        assert_eq!(QUARTIC_WEIGHTS.dot(&Taps::new([1.0; 5])), 0.5);
    }

    #[test]
    fn constant_field_is_reproduced() {
        let (fbx, cbx) = boxes();
        let crse = Fab::filled(cbx, 2, 3.5);
        let mut fine = Fab::new(fbx, 2);
        ccquartic_launch(&Serial, fbx, crse.array(), fine.array_mut());
        assert!(fine.as_slice().iter().all(|&v| v == 3.5));
    }

    #[test]
    fn linear_field_splits_about_the_mean() {
        // Cell averages of x on coarse spacing 2 are 2i + 1.
        let (fbx, cbx) = boxes();
        let crse = Fab::from_fn(cbx, 1, |iv, _| (2 * iv.x() + 1) as Real);
        let mut fine = Fab::new(fbx, 1);
        ccquartic_fill(fbx, &crse.array(), &mut fine.array_mut());
        assert_fab_close(&fine, |iv, _| iv.x() as Real + 0.5, fbx, 0..1, 1e-13);
    }

    proptest! {
        #[test]
        fn quartic_cell_averages_are_exact(
            px in prop::collection::vec(-1.0f64..1.0, 5),
            py in prop::collection::vec(-1.0f64..1.0, 5),
        ) {
            let (fbx, cbx) = boxes();
            let crse = cell_averaged(cbx, [2.0, 2.0], &px, &py);
            let want = cell_averaged(fbx, [1.0, 1.0], &px, &py);
            let scale = crse.as_slice().iter().fold(1.0f64, |m, v| m.max(v.abs()));
            let mut fine = Fab::new(fbx, 1);
            ccquartic_fill(fbx, &crse.array(), &mut fine.array_mut());
            for iv in fbx.iter() {
                let (got, w) = (fine.get(iv, 0), want.get(iv, 0));
                prop_assert!((got - w).abs() <= 1e-11 * scale, "{iv}: {got} vs {w}");
            }
        }

        #[test]
        fn children_average_to_parent(
            vals in prop::collection::vec(-10.0f64..10.0, 7 * 6),
        ) {
            let (fbx, cbx) = boxes();
            let mut it = vals.into_iter();
            let crse = Fab::from_fn(cbx, 1, |_, _| it.next().unwrap_or(0.0));
            let mut fine = Fab::new(fbx, 1);
            ccquartic_fill(fbx, &crse.array(), &mut fine.array_mut());
            for c in fbx.coarsen(Ratio::TWO).iter() {
                let base = Ratio::TWO.refine(c);
                let mean = [(0, 0), (1, 0), (0, 1), (1, 1)]
                    .iter()
                    .map(|&(a, b)| fine.get(IntVect::new_2d(base.x() + a, base.y() + b), 0))
                    .sum::<Real>()
                    / 4.0;
                prop_assert!((mean - crse.get(c, 0)).abs() <= 1e-12);
            }
        }
    }
}
