//! Bilinear prolongation of node-centered data.
//!
//! Two passes. [`nodebilin_slopes`] stores, for each coarse node, the three
//! coefficients of the bilinear patch spanning the coarse cell whose lower
//! corner is that node. [`nodebilin_interp`] evaluates the patch at every
//! fine node. Both are 2-D (`k == 0`).
//!
//! The slope buffer holds `3 * ncomp` components laid out as
//! `n + ncomp * slope`, see [`Slope::component`].

use prolong_core::{coarsen, Array4, Array4Mut, IndexBox, Ratio, Real};

use crate::exec::Backend;

/// Which coefficient of the bilinear patch a slope component holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slope {
    /// Change per fine index along x.
    X = 0,
    /// Change per fine index along y.
    Y = 1,
    /// Cross term per fine index squared.
    Xy = 2,
}

impl Slope {
    /// All slope kinds in buffer order.
    pub const ALL: [Slope; 3] = [Slope::X, Slope::Y, Slope::Xy];

    /// Components the slope buffer needs per field component.
    pub const COUNT: usize = 3;

    /// Slope-buffer component for field component `n` of `ncomp`.
    #[inline]
    pub const fn component(self, n: usize, ncomp: usize) -> usize {
        n + ncomp * self as usize
    }
}

/// Fill the slope buffer over the coarse box `bx`.
///
/// Reads `u` at `(i, j)`, `(i + 1, j)`, `(i, j + 1)` and `(i + 1, j + 1)`,
/// so `u` must cover `bx` grown by one node on the upper x and y sides.
pub fn nodebilin_slopes(
    bx: IndexBox,
    slope: &mut Array4Mut<'_, Real>,
    u: &Array4<'_, Real>,
    icomp: usize,
    ncomp: usize,
    ratio: Ratio,
) {
    let (lo, hi) = (bx.lo(), bx.hi());
    let rx = 1.0 / ratio.x() as Real;
    let ry = 1.0 / ratio.y() as Real;

    for n in 0..ncomp {
        let c = n + icomp;
        for j in lo.y()..=hi.y() {
            for i in lo.x()..=hi.x() {
                let dx0 = u[(i + 1, j, 0, c)] - u[(i, j, 0, c)];
                let d0x = u[(i, j + 1, 0, c)] - u[(i, j, 0, c)];
                let dx1 = u[(i + 1, j + 1, 0, c)] - u[(i, j + 1, 0, c)];

                slope[(i, j, 0, Slope::X.component(n, ncomp))] = rx * dx0;
                slope[(i, j, 0, Slope::Y.component(n, ncomp))] = ry * d0x;
                slope[(i, j, 0, Slope::Xy.component(n, ncomp))] = rx * ry * (dx1 - dx0);
            }
        }
    }
}

/// Evaluate the bilinear patches at every fine node of `bx`.
///
/// The anchor node is the coarsened index clamped to the upper corner of
/// `slope`, so fine nodes on the last coarse node line reuse the patch of
/// the cell below them (with a fractional offset equal to the ratio).
#[allow(clippy::too_many_arguments)]
pub fn nodebilin_interp(
    bx: IndexBox,
    fine: &mut Array4Mut<'_, Real>,
    fcomp: usize,
    ncomp: usize,
    slope: &Array4<'_, Real>,
    crse: &Array4<'_, Real>,
    ccomp: usize,
    ratio: Ratio,
) {
    let (lo, hi) = (bx.lo(), bx.hi());
    let chi = slope.hi();

    for n in 0..ncomp {
        let (sx, sy, sxy) = (
            Slope::X.component(n, ncomp),
            Slope::Y.component(n, ncomp),
            Slope::Xy.component(n, ncomp),
        );
        for j in lo.y()..=hi.y() {
            let jc = coarsen(j, ratio.y()).min(chi.y());
            let fy = (j - jc * ratio.y()) as Real;
            for i in lo.x()..=hi.x() {
                let ic = coarsen(i, ratio.x()).min(chi.x());
                let fx = (i - ic * ratio.x()) as Real;
                fine[(i, j, 0, n + fcomp)] = crse[(ic, jc, 0, n + ccomp)]
                    + fx * slope[(ic, jc, 0, sx)]
                    + fy * slope[(ic, jc, 0, sy)]
                    + fx * fy * slope[(ic, jc, 0, sxy)];
            }
        }
    }
}

/// [`nodebilin_slopes`] over `bx`, tiled by `backend`.
pub fn nodebilin_slopes_launch<B: Backend>(
    backend: &B,
    bx: IndexBox,
    slope: Array4Mut<'_, Real>,
    u: Array4<'_, Real>,
    icomp: usize,
    ncomp: usize,
    ratio: Ratio,
) {
    backend.for_each_band(slope, 1, |mut tile| {
        if let Some(region) = bx.intersect(&tile.bounds()) {
            nodebilin_slopes(region, &mut tile, &u, icomp, ncomp, ratio);
        }
    });
}

/// [`nodebilin_interp`] over `bx`, tiled by `backend`.
#[allow(clippy::too_many_arguments)]
pub fn nodebilin_interp_launch<B: Backend>(
    backend: &B,
    bx: IndexBox,
    fine: Array4Mut<'_, Real>,
    fcomp: usize,
    ncomp: usize,
    slope: Array4<'_, Real>,
    crse: Array4<'_, Real>,
    ccomp: usize,
    ratio: Ratio,
) {
    backend.for_each_band(fine, 1, |mut tile| {
        if let Some(region) = bx.intersect(&tile.bounds()) {
            nodebilin_interp(region, &mut tile, fcomp, ncomp, &slope, &crse, ccomp, ratio);
        }
    });
}
