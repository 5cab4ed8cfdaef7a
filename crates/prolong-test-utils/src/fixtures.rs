//! Polynomial and discretely divergence-free field fixtures.
//!
//! Coordinates are index-based: cell `(i, j)` of a level with spacing `h`
//! covers `[i*h0, (i+1)*h0] x [j*h1, (j+1)*h1]`, and node `(i, j)` sits at
//! `(i*h0, j*h1)`.

use prolong_core::{IndexBox, IntVect, Real};

use crate::Fab;

/// Evaluate `Σ coeffs[p] * x^p`.
pub fn poly_eval(coeffs: &[Real], x: Real) -> Real {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Mean of the polynomial over `[a, b]`.
pub fn poly_cell_average(coeffs: &[Real], a: Real, b: Real) -> Real {
    let integral: Real = coeffs
        .iter()
        .enumerate()
        .map(|(p, &c)| {
            let e = (p + 1) as i32;
            c * (b.powi(e) - a.powi(e)) / e as Real
        })
        .sum();
    integral / (b - a)
}

/// Cell averages of the separable polynomial `px(x) * py(y)`.
pub fn cell_averaged(bounds: IndexBox, h: [Real; 2], px: &[Real], py: &[Real]) -> Fab {
    Fab::from_fn(bounds, 1, |iv, _| {
        let (x0, y0) = (iv.x() as Real * h[0], iv.y() as Real * h[1]);
        poly_cell_average(px, x0, x0 + h[0]) * poly_cell_average(py, y0, y0 + h[1])
    })
}

/// Node samples of `f(x, y, n)`.
pub fn node_sampled(
    bounds: IndexBox,
    ncomp: usize,
    h: [Real; 2],
    f: impl Fn(Real, Real, usize) -> Real,
) -> Fab {
    Fab::from_fn(bounds, ncomp, |iv, n| {
        f(iv.x() as Real * h[0], iv.y() as Real * h[1], n)
    })
}

/// Face fluxes derived from a stream function `psi` sampled at nodes.
///
/// `u` on x-faces is `Δ_y psi / dy` and `v` on y-faces is `-Δ_x psi / dx`,
/// so every cell covered by both boxes has zero discrete divergence.
pub fn stream_function_faces(
    xfaces: IndexBox,
    yfaces: IndexBox,
    h: [Real; 2],
    psi: impl Fn(Real, Real) -> Real,
) -> (Fab, Fab) {
    let [dx, dy] = h;
    let at = |i: i32, j: i32| psi(i as Real * dx, j as Real * dy);
    let u = Fab::from_fn(xfaces, 1, |iv, _| {
        (at(iv.x(), iv.y() + 1) - at(iv.x(), iv.y())) / dy
    });
    let v = Fab::from_fn(yfaces, 1, |iv, _| {
        -(at(iv.x() + 1, iv.y()) - at(iv.x(), iv.y())) / dx
    });
    (u, v)
}

/// Discrete divergence of cell `(i, j)` from its four faces.
pub fn face_divergence(u: &Fab, v: &Fab, i: i32, j: i32, h: [Real; 2]) -> Real {
    let du = u.get(IntVect::new_2d(i + 1, j), 0) - u.get(IntVect::new_2d(i, j), 0);
    let dv = v.get(IntVect::new_2d(i, j + 1), 0) - v.get(IntVect::new_2d(i, j), 0);
    du / h[0] + dv / h[1]
}
