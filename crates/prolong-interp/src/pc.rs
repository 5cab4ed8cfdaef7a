//! Piecewise-constant prolongation.

use prolong_core::{coarsen, Array4, Array4Mut, IndexBox, Ratio, Real};

use crate::exec::Backend;

/// Copy the covering coarse value into every fine cell of `bx`.
///
/// Writes components `fcomp..fcomp + ncomp` of `fine` from
/// `ccomp..ccomp + ncomp` of `crse`. All three axes are coarsened, so 3-D
/// boxes work unchanged; 2-D data has `k == 0` and a z ratio of 1.
pub fn pc_interp(
    bx: IndexBox,
    fine: &mut Array4Mut<'_, Real>,
    fcomp: usize,
    ncomp: usize,
    crse: &Array4<'_, Real>,
    ccomp: usize,
    ratio: Ratio,
) {
    let (lo, hi) = (bx.lo(), bx.hi());
    for n in 0..ncomp {
        for k in lo.z()..=hi.z() {
            let kc = coarsen(k, ratio.z());
            for j in lo.y()..=hi.y() {
                let jc = coarsen(j, ratio.y());
                for i in lo.x()..=hi.x() {
                    let ic = coarsen(i, ratio.x());
                    fine[(i, j, k, n + fcomp)] = crse[(ic, jc, kc, n + ccomp)];
                }
            }
        }
    }
}

/// [`pc_interp`] over `bx`, tiled by `backend`.
#[allow(clippy::too_many_arguments)]
pub fn pc_interp_launch<B: Backend>(
    backend: &B,
    bx: IndexBox,
    fine: Array4Mut<'_, Real>,
    fcomp: usize,
    ncomp: usize,
    crse: Array4<'_, Real>,
    ccomp: usize,
    ratio: Ratio,
) {
    backend.for_each_band(fine, 1, |mut tile| {
        if let Some(region) = bx.intersect(&tile.bounds()) {
            pc_interp(region, &mut tile, fcomp, ncomp, &crse, ccomp, ratio);
        }
    });
}
