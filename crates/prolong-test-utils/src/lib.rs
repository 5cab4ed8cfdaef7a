//! Test utilities for prolong development.
//!
//! Provides [`Fab`], an owned field buffer that hands out the borrowed
//! views the operators consume, plus polynomial [`fixtures`] and float
//! assertions.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use prolong_core::{Array4, Array4Mut, IndexBox, IntVect, Real};

/// Owned storage for `ncomp` components over an index box.
///
/// Layout matches the views: x fastest, component slowest.
#[derive(Clone, Debug, PartialEq)]
pub struct Fab<T = Real> {
    data: Vec<T>,
    bounds: IndexBox,
    ncomp: usize,
}

impl<T: Copy + Default> Fab<T> {
    /// Zero-initialized (`T::default()`) storage.
    pub fn new(bounds: IndexBox, ncomp: usize) -> Self {
        Self::filled(bounds, ncomp, T::default())
    }
}

impl<T: Copy> Fab<T> {
    pub fn filled(bounds: IndexBox, ncomp: usize, value: T) -> Self {
        Self {
            data: vec![value; bounds.num_pts() * ncomp],
            bounds,
            ncomp,
        }
    }

    /// Storage with every entry produced by `f(index, component)`.
    pub fn from_fn(bounds: IndexBox, ncomp: usize, mut f: impl FnMut(IntVect, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(bounds.num_pts() * ncomp);
        for n in 0..ncomp {
            for iv in bounds.iter() {
                data.push(f(iv, n));
            }
        }
        Self {
            data,
            bounds,
            ncomp,
        }
    }

    pub fn bounds(&self) -> IndexBox {
        self.bounds
    }

    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn array(&self) -> Array4<'_, T> {
        Array4::new(&self.data, self.bounds, self.ncomp).expect("Fab storage matches its box")
    }

    pub fn array_mut(&mut self) -> Array4Mut<'_, T> {
        Array4Mut::new(&mut self.data, self.bounds, self.ncomp)
            .expect("Fab storage matches its box")
    }

    pub fn get(&self, iv: IntVect, n: usize) -> T {
        self.array()[(iv, n)]
    }

    pub fn set(&mut self, iv: IntVect, n: usize, value: T) {
        self.array_mut()[(iv, n)] = value;
    }
}

/// Assert `|actual - expected| <= tol`, reporting the caller's location.
#[track_caller]
pub fn assert_close(actual: Real, expected: Real, tol: Real) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (|diff| = {:e}, tol = {tol:e})",
        (actual - expected).abs()
    );
}

/// [`assert_close`] over every component of every index in `bx`.
#[track_caller]
pub fn assert_fab_close(
    actual: &Fab,
    expected: impl Fn(IntVect, usize) -> Real,
    bx: IndexBox,
    comps: std::ops::Range<usize>,
    tol: Real,
) {
    for n in comps {
        for iv in bx.iter() {
            let got = actual.get(iv, n);
            let want = expected(iv, n);
            assert!(
                (got - want).abs() <= tol,
                "at {iv} comp {n}: expected {want}, got {got}"
            );
        }
    }
}
