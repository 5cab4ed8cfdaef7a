//! Benchmark profiles and fixtures for the prolongation operators.
//!
//! Provides pre-built [`Profile`]s for benchmarks:
//!
//! - [`reference_profile`]: 64x64 coarse cells, ratio 2, 4 components
//! - [`stress_profile`]: 256x256 coarse cells (~262K fine cells per component)
//!
//! and deterministic fixture data sized to each profile.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use prolong_core::{Axis, IndexBox, IntVect, Ratio, Real};
use prolong_test_utils::Fab;

/// Problem size for one benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Coarse cells to prolong.
    pub cells: IndexBox,
    /// Refinement ratio.
    pub ratio: Ratio,
    /// Components per field.
    pub ncomp: usize,
}

/// 64x64 coarse cells (16K fine cells per component).
pub fn reference_profile() -> Profile {
    square_profile(64)
}

/// 256x256 coarse cells.
///
/// Same layout as [`reference_profile`] at 16x the cell count.
pub fn stress_profile() -> Profile {
    square_profile(256)
}

fn square_profile(n: i32) -> Profile {
    Profile {
        cells: IndexBox::new_2d([0, 0], [n - 1, n - 1]).expect("non-empty profile box"),
        ratio: Ratio::TWO,
        ncomp: 4,
    }
}

impl Profile {
    /// Fine cells covering [`cells`](Self::cells).
    pub fn fine_cells(&self) -> IndexBox {
        self.cells.refine(self.ratio)
    }

    /// Coarse cells plus the two-cell halo the quartic stencil reads.
    pub fn halo_cells(&self) -> IndexBox {
        self.cells.grow(Axis::X, 2).grow(Axis::Y, 2)
    }

    /// Coarse nodes of [`cells`](Self::cells).
    pub fn coarse_nodes(&self) -> IndexBox {
        self.cells.extend_hi(Axis::X, 1).extend_hi(Axis::Y, 1)
    }

    /// Fine nodes of [`fine_cells`](Self::fine_cells).
    pub fn fine_nodes(&self) -> IndexBox {
        self.fine_cells().extend_hi(Axis::X, 1).extend_hi(Axis::Y, 1)
    }

    /// Smooth coarse data over `bounds`.
    pub fn smooth(&self, bounds: IndexBox) -> Fab {
        Fab::from_fn(bounds, self.ncomp, smooth_value)
    }

    /// Fine state and correction for positivity repair, with `ncomp`
    /// components laid out as aggregate, species, passive tail.
    ///
    /// Roughly one fine cell in five ends up negative after the correction.
    pub fn species(&self) -> (Fab, Fab) {
        let bounds = self.fine_cells();
        let state = Fab::from_fn(bounds, self.ncomp, |iv, n| {
            if n == 0 {
                0.0
            } else {
                1.0 + smooth_value(iv, n)
            }
        });
        let corr = Fab::from_fn(bounds, self.ncomp, |iv, n| {
            let h = hash(iv, n);
            if h % 5 == 0 {
                -3.0
            } else {
                0.25 * (h % 7) as Real - 0.5
            }
        });
        (state, corr)
    }
}

fn smooth_value(iv: IntVect, n: usize) -> Real {
    let x = iv.x() as Real * 0.05;
    let y = iv.y() as Real * 0.07;
    (x + n as Real).sin() * (y - n as Real).cos()
}

fn hash(iv: IntVect, n: usize) -> u64 {
    let a = iv.x() as u64;
    let b = iv.y() as u64;
    a.wrapping_mul(6364136223846793005)
        .wrapping_add(b.wrapping_mul(1442695040888963407))
        .wrapping_add(n as u64)
        >> 33
}
