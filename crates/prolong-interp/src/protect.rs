//! Conservative positivity repair of an interpolated correction (2-D).
//!
//! After a coarse correction has been interpolated onto the fine level,
//! adding it to the fine state can drive some species negative. For each
//! coarse cell, [`ccprotect`] inspects the fine sub-cells it covers (its
//! *footprint*) and, per species that would go negative, rewrites the
//! correction so that
//!
//! - the volume-weighted total of the correction over the footprint is
//!   kept where the case allows it, and
//! - negative states are repaired as far as that total permits.
//!
//! Component 0 is the aggregate of the species `1..nvar - 1` and is
//! recomputed as their sum over the whole footprint afterwards. Component
//! `nvar - 1` is never touched.
//!
//! The five repair branches are named by [`ProtectCase`]; [`classify`]
//! picks one from three volume-weighted sums over the footprint:
//!
//! | sum | definition |
//! |-----|------------|
//! | `crse_tot` | `Σ vol · correction` |
//! | `sum_n` | `Σ vol · state` over cells with `state <= 0` |
//! | `sum_p` | `Σ vol · state` over cells with `state > 0` |
//!
//! Every per-cell decision reads only the footprint it writes, so one task
//! must own a whole footprint; [`ccprotect_launch`] bands the fine view on
//! multiples of the y ratio to guarantee that.

use prolong_core::{Array4, Array4Mut, GeometryContext, IndexBox, IntVect, Ratio, Real};

use crate::exec::Backend;

/// Repair branch chosen for one species in one footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtectCase {
    /// `crse_tot > |sum_n|`: raise negative states to zero, then share the
    /// remainder among positive states in proportion to their value (or
    /// uniformly per volume when there are none).
    FillThenSpread,
    /// `0 < crse_tot < |sum_n|`: share `crse_tot` among negative states in
    /// proportion to their magnitude; positive states get nothing.
    PartialFill,
    /// `crse_tot < 0` and `|crse_tot| > sum_p`: drive every cell to the
    /// same negative post-state `(sum_p + sum_n + crse_tot) / cvol`.
    UniformDeficit,
    /// `|crse_tot| < sum_p` and `sum_p + sum_n + crse_tot > 0`: raise
    /// negative states to zero and take the deficit from positive states in
    /// proportion to their value.
    AbsorbAndFill,
    /// `|crse_tot| < sum_p` and `sum_p + sum_n + crse_tot < 0`: positive
    /// cells get `-state`, non-positive cells get
    /// `(crse_tot + sum_p) / sum_n · state`.
    ProportionalCut,
}

impl ProtectCase {
    /// All cases in dispatch order.
    pub const ALL: [ProtectCase; 5] = [
        ProtectCase::FillThenSpread,
        ProtectCase::PartialFill,
        ProtectCase::UniformDeficit,
        ProtectCase::AbsorbAndFill,
        ProtectCase::ProportionalCut,
    ];

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Pick the repair branch for one species.
///
/// Returns `None` when no branch applies: `crse_tot == 0`, or an exact
/// tie on a branch boundary (`crse_tot == |sum_n|`, `|crse_tot| == sum_p`,
/// `sum_p + sum_n + crse_tot == 0`). The correction is then kept as is.
///
/// # Examples
///
/// ```
/// use prolong_interp::protect::{classify, ProtectCase};
///
/// assert_eq!(classify(3.0, -2.0, 6.0), Some(ProtectCase::FillThenSpread));
/// assert_eq!(classify(-5.0, -2.0, 6.0), Some(ProtectCase::ProportionalCut));
/// assert_eq!(classify(0.0, -2.0, 6.0), None);
/// ```
pub fn classify(crse_tot: Real, sum_n: Real, sum_p: Real) -> Option<ProtectCase> {
    let residual = sum_p + sum_n + crse_tot;
    if crse_tot > 0.0 && crse_tot > sum_n.abs() {
        Some(ProtectCase::FillThenSpread)
    } else if crse_tot > 0.0 && crse_tot < sum_n.abs() {
        Some(ProtectCase::PartialFill)
    } else if crse_tot < 0.0 && crse_tot.abs() > sum_p {
        Some(ProtectCase::UniformDeficit)
    } else if crse_tot < 0.0 && crse_tot.abs() < sum_p && residual > 0.0 {
        Some(ProtectCase::AbsorbAndFill)
    } else if crse_tot < 0.0 && crse_tot.abs() < sum_p && residual < 0.0 {
        Some(ProtectCase::ProportionalCut)
    } else {
        None
    }
}

/// Per-species outcome counts of one or more [`ccprotect`] calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtectTally {
    /// Species footprints left untouched because no state went negative.
    pub clean: u64,
    /// Repaired species footprints per [`ProtectCase::index`].
    pub cases: [u64; 5],
    /// Species footprints needing repair that matched no case.
    pub unclassified: u64,
}

impl ProtectTally {
    /// Sum of two tallies.
    pub fn merge(self, other: Self) -> Self {
        let mut cases = self.cases;
        for (c, o) in cases.iter_mut().zip(other.cases) {
            *c += o;
        }
        Self {
            clean: self.clean + other.clean,
            cases,
            unclassified: self.unclassified + other.unclassified,
        }
    }

    /// Count for one case.
    pub fn count(&self, case: ProtectCase) -> u64 {
        self.cases[case.index()]
    }

    /// Species footprints whose correction was rewritten.
    pub fn repaired(&self) -> u64 {
        self.cases.iter().sum()
    }

    fn record(&mut self, case: Option<ProtectCase>) {
        match case {
            Some(c) => self.cases[c.index()] += 1,
            None => self.unclassified += 1,
        }
    }
}

/// Volume-weighted sums over one species footprint.
#[derive(Clone, Copy, Debug, Default)]
struct FootprintSums {
    crse_tot: Real,
    sum_n: Real,
    sum_p: Real,
}

/// Repair the correction `fine` over the footprint of coarse cell
/// `(ic, jc)` clipped to `fine_bx`.
///
/// `fine_state` is the fine state the correction will be added to; it is
/// only read. Cell volumes come from `crse_geom` (for the coarse cell) and
/// `fine_geom` (per fine column). Returns what happened per species.
///
/// A coarse cell without positive volume (the RZ axis cell when
/// `prob_lo_x == 0`) cannot take the branches that spread per unit volume
/// ([`ProtectCase::UniformDeficit`], and [`ProtectCase::FillThenSpread`]
/// with no positive state). Those species keep their correction and are
/// counted as unclassified.
#[allow(clippy::too_many_arguments)]
pub fn ccprotect(
    ic: i32,
    jc: i32,
    nvar: usize,
    fine_bx: IndexBox,
    ratio: Ratio,
    crse_geom: &GeometryContext,
    fine_geom: &GeometryContext,
    fine: &mut Array4Mut<'_, Real>,
    fine_state: &Array4<'_, Real>,
) -> ProtectTally {
    let mut tally = ProtectTally::default();
    let lo = IntVect::new_2d(ratio.x() * ic, ratio.y() * jc);
    let hi = IntVect::new_2d(lo.x() + ratio.x() - 1, lo.y() + ratio.y() - 1);
    let Some(foot) = IndexBox::new(lo, hi)
        .ok()
        .and_then(|b| b.intersect(&fine_bx))
    else {
        return tally;
    };

    for n in 1..nvar.saturating_sub(1) {
        let needs_repair = foot
            .iter()
            .any(|iv| fine_state[(iv, n)] + fine[(iv, n)] < 0.0);
        if !needs_repair {
            tally.clean += 1;
            continue;
        }

        let cvol = crse_geom.cell_volume(ic);
        let mut sums = FootprintSums::default();
        for iv in foot.iter() {
            let fvol = fine_geom.cell_volume(iv.x());
            let state = fine_state[(iv, n)];
            sums.crse_tot += fvol * fine[(iv, n)];
            if state <= 0.0 {
                sums.sum_n += fvol * state;
            } else {
                sums.sum_p += fvol * state;
            }
        }

        let case = classify(sums.crse_tot, sums.sum_n, sums.sum_p)
            .filter(|&c| cvol > 0.0 || !divides_by_volume(c, &sums));
        tally.record(case);
        if let Some(case) = case {
            apply(case, &sums, cvol, foot, n, fine, fine_state);
        }
    }

    for iv in foot.iter() {
        let mut total = 0.0;
        for n in 1..nvar.saturating_sub(1) {
            total += fine[(iv, n)];
        }
        fine[(iv, 0)] = total;
    }

    tally
}

/// Branches that spread a total per unit coarse volume.
fn divides_by_volume(case: ProtectCase, sums: &FootprintSums) -> bool {
    match case {
        ProtectCase::UniformDeficit => true,
        ProtectCase::FillThenSpread => sums.sum_p <= 0.0,
        _ => false,
    }
}

fn apply(
    case: ProtectCase,
    sums: &FootprintSums,
    cvol: Real,
    foot: IndexBox,
    n: usize,
    fine: &mut Array4Mut<'_, Real>,
    fine_state: &Array4<'_, Real>,
) {
    let FootprintSums {
        crse_tot,
        sum_n,
        sum_p,
    } = *sums;

    for iv in foot.iter() {
        let state = fine_state[(iv, n)];
        let corr = &mut fine[(iv, n)];
        match case {
            ProtectCase::FillThenSpread => {
                if state < 0.0 {
                    *corr = -state;
                }
                if sum_p > 0.0 {
                    if state > 0.0 {
                        let alpha = (crse_tot - sum_n.abs()) / sum_p;
                        *corr = alpha * state;
                    }
                } else {
                    *corr += (crse_tot - sum_n.abs()) / cvol;
                }
            }
            ProtectCase::PartialFill => {
                let alpha = crse_tot / sum_n.abs();
                *corr = if state < 0.0 { alpha * state.abs() } else { 0.0 };
            }
            ProtectCase::UniformDeficit => {
                let neg_val = (sum_p + sum_n + crse_tot) / cvol;
                *corr = neg_val - state;
            }
            ProtectCase::AbsorbAndFill => {
                if state < 0.0 {
                    *corr = -state;
                } else {
                    let alpha = (crse_tot + sum_n) / sum_p;
                    *corr = alpha * state;
                }
            }
            ProtectCase::ProportionalCut => {
                if state > 0.0 {
                    *corr = -state;
                } else {
                    let alpha = (crse_tot + sum_p) / sum_n;
                    *corr = alpha * state;
                }
            }
        }
    }
}

/// [`ccprotect`] for every coarse cell in `cbx`, tiled by `backend`.
///
/// Bands are cut on multiples of `ratio.y()`, so every footprint lands in
/// exactly one band. Returns the merged tally.
#[allow(clippy::too_many_arguments)]
pub fn ccprotect_launch<B: Backend>(
    backend: &B,
    cbx: IndexBox,
    nvar: usize,
    fine_bx: IndexBox,
    ratio: Ratio,
    crse_geom: &GeometryContext,
    fine_geom: &GeometryContext,
    fine: Array4Mut<'_, Real>,
    fine_state: Array4<'_, Real>,
) -> ProtectTally {
    let tally = backend.reduce_bands(
        fine,
        ratio.y(),
        |mut tile| {
            let mut tally = ProtectTally::default();
            let Some(region) = fine_bx.intersect(&tile.bounds()) else {
                return tally;
            };
            let Some(cells) = cbx.intersect(&region.coarsen(ratio)) else {
                return tally;
            };
            for c in cells.iter() {
                let t = ccprotect(
                    c.x(),
                    c.y(),
                    nvar,
                    region,
                    ratio,
                    crse_geom,
                    fine_geom,
                    &mut tile,
                    &fine_state,
                );
                tally = tally.merge(t);
            }
            tally
        },
        ProtectTally::merge,
    );
    log::trace!(
        "ccprotect over {cbx}: {} clean, {} repaired {:?}, {} unclassified",
        tally.clean,
        tally.repaired(),
        tally.cases,
        tally.unclassified
    );
    tally
}
