//! Divergence-preserving prolongation of face-centered data (2-D, ratio 2).
//!
//! The fine faces on the boundary of a coarse cell come from a quadratic
//! reconstruction along the face ([`facediv_face_interp`]). The four fine
//! faces inside the cell are then reconstructed from those boundary faces
//! ([`facediv_int`]) so that each of the four fine cells carries the
//! divergence of the coarse cell.

use prolong_core::{mask_allows, Array4, Array4Mut, Axis, IndexBox, MaskView, Ratio, Real};

/// Fill the two fine faces overlapping coarse face `(ci, cj)` normal to
/// `axis`.
///
/// With `cen` the coarse value and `neg`/`pos` its neighbours along the
/// face, the lower fine face gets `(8 cen + neg - pos) / 8` and the upper
/// one `(8 cen + pos - neg) / 8`. Their mean is `cen`, so the coarse flux
/// is kept. Nothing is written where `mask` is present and zero at the
/// coarse face.
#[allow(clippy::too_many_arguments)]
pub fn facediv_face_interp(
    ci: i32,
    cj: i32,
    nc: usize,
    nf: usize,
    axis: Axis,
    crse: &Array4<'_, Real>,
    fine: &mut Array4Mut<'_, Real>,
    mask: Option<&MaskView<'_>>,
    ratio: Ratio,
) {
    if !mask_allows(mask, ci, cj, 0, nc) {
        return;
    }

    let fi = ci * ratio.x();
    let fj = cj * ratio.y();

    match axis {
        Axis::X => {
            let neg = crse[(ci, cj - 1, 0, nc)];
            let cen = crse[(ci, cj, 0, nc)];
            let pos = crse[(ci, cj + 1, 0, nc)];

            fine[(fi, fj, 0, nf)] = 0.125 * (8.0 * cen + neg - pos);
            fine[(fi, fj + 1, 0, nf)] = 0.125 * (8.0 * cen + pos - neg);
        }
        Axis::Y => {
            let neg = crse[(ci - 1, cj, 0, nc)];
            let cen = crse[(ci, cj, 0, nc)];
            let pos = crse[(ci + 1, cj, 0, nc)];

            fine[(fi, fj, 0, nf)] = 0.125 * (8.0 * cen + neg - pos);
            fine[(fi + 1, fj, 0, nf)] = 0.125 * (8.0 * cen + pos - neg);
        }
        // 2-D data has no z faces.
        Axis::Z => {}
    }
}

/// Reconstruct the four fine faces interior to coarse cell `(ci, cj)`.
///
/// `fine[0]` holds x-face and `fine[1]` y-face data; the eight exterior
/// fine faces of the cell must already be set. Each interior face is the
/// mean of the two exterior faces it lies between, plus a cross-derivative
/// correction from the other component scaled by the aspect ratio of
/// `cell_size`.
pub fn facediv_int(
    ci: i32,
    cj: i32,
    nf: usize,
    fine: &mut [Array4Mut<'_, Real>; 2],
    ratio: Ratio,
    cell_size: [Real; 2],
) {
    let fi = ci * ratio.x();
    let fj = cj * ratio.y();
    let [u, v] = fine;

    let umm = u[(fi, fj, 0, nf)];
    let ump = u[(fi, fj + 1, 0, nf)];
    let upm = u[(fi + 2, fj, 0, nf)];
    let upp = u[(fi + 2, fj + 1, 0, nf)];

    let vmm = v[(fi, fj, 0, nf)];
    let vmp = v[(fi + 1, fj, 0, nf)];
    let vpm = v[(fi, fj + 2, 0, nf)];
    let vpp = v[(fi + 1, fj + 2, 0, nf)];

    let dxdy = cell_size[0] / cell_size[1];
    let x_corr = 0.25 * dxdy * (vpp + vmm - vmp - vpm);
    let y_corr = 0.25 / dxdy * (upp + umm - ump - upm);

    u[(fi + 1, fj, 0, nf)] = 0.5 * (umm + upm) + x_corr;
    u[(fi + 1, fj + 1, 0, nf)] = 0.5 * (ump + upp) + x_corr;
    v[(fi, fj + 1, 0, nf)] = 0.5 * (vmm + vpm) + y_corr;
    v[(fi + 1, fj + 1, 0, nf)] = 0.5 * (vmp + vpp) + y_corr;
}

/// [`facediv_face_interp`] for every coarse face in `cbx`, components
/// `ccomp..ccomp + ncomp` into `fcomp..fcomp + ncomp`.
#[allow(clippy::too_many_arguments)]
pub fn facediv_face_fill(
    axis: Axis,
    cbx: IndexBox,
    crse: &Array4<'_, Real>,
    ccomp: usize,
    fine: &mut Array4Mut<'_, Real>,
    fcomp: usize,
    ncomp: usize,
    mask: Option<&MaskView<'_>>,
    ratio: Ratio,
) {
    for n in 0..ncomp {
        for c in cbx.iter() {
            facediv_face_interp(c.x(), c.y(), n + ccomp, n + fcomp, axis, crse, fine, mask, ratio);
        }
    }
}

/// [`facediv_int`] for every coarse cell in `cbx` and components
/// `fcomp..fcomp + ncomp`.
pub fn facediv_int_fill(
    cbx: IndexBox,
    fine: &mut [Array4Mut<'_, Real>; 2],
    fcomp: usize,
    ncomp: usize,
    ratio: Ratio,
    cell_size: [Real; 2],
) {
    for n in fcomp..fcomp + ncomp {
        for c in cbx.iter() {
            facediv_int(c.x(), c.y(), n, fine, ratio, cell_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prolong_core::IntVect;
    use prolong_test_utils::{assert_close, Fab};

    #[test]
    fn boundary_faces_keep_the_coarse_mean() {
        let cfaces = IndexBox::new_2d([0, -1], [0, 1]).unwrap();
        let crse = Fab::from_fn(cfaces, 1, |iv, _| [1.0, 4.0, 9.0][(iv.y() + 1) as usize]);
        let mut fine = Fab::new(IndexBox::new_2d([0, 0], [0, 1]).unwrap(), 1);
        facediv_face_interp(
            0,
            0,
            0,
            0,
            Axis::X,
            &crse.array(),
            &mut fine.array_mut(),
            None,
            Ratio::TWO,
        );
        // (32 + 1 - 9) / 8 and (32 + 9 - 1) / 8
        assert_eq!(fine.as_slice(), &[3.0, 5.0]);
    }

    #[test]
    fn y_faces_use_neighbours_along_x() {
        let cfaces = IndexBox::new_2d([-1, 0], [1, 0]).unwrap();
        let crse = Fab::from_fn(cfaces, 1, |iv, _| iv.x() as Real);
        let mut fine = Fab::new(IndexBox::new_2d([0, 0], [1, 0]).unwrap(), 1);
        facediv_face_interp(
            0,
            0,
            0,
            0,
            Axis::Y,
            &crse.array(),
            &mut fine.array_mut(),
            None,
            Ratio::TWO,
        );
        assert_eq!(fine.as_slice(), &[-0.25, 0.25]);
    }

    #[test]
    fn masked_coarse_face_is_skipped() {
        let cfaces = IndexBox::new_2d([0, -1], [0, 1]).unwrap();
        let crse = Fab::filled(cfaces, 1, 1.0);
        let m: Fab<i32> = Fab::new(cfaces, 1);
        let mut fine = Fab::filled(IndexBox::new_2d([0, 0], [0, 1]).unwrap(), 1, 7.0);
        let mask = m.array();
        facediv_face_interp(
            0,
            0,
            0,
            0,
            Axis::X,
            &crse.array(),
            &mut fine.array_mut(),
            Some(&mask),
            Ratio::TWO,
        );
        assert_eq!(fine.as_slice(), &[7.0, 7.0]);
    }

    #[test]
    fn interior_faces_average_plus_correction() {
        let ratio = Ratio::TWO;
        let cell = [1.0, 2.0];
        let xf = IndexBox::new_2d([0, 0], [2, 1]).unwrap();
        let yf = IndexBox::new_2d([0, 0], [1, 2]).unwrap();
        let mut u = Fab::from_fn(xf, 1, |iv, _| match (iv.x(), iv.y()) {
            (0, 0) => 1.0,
            (0, 1) => 2.0,
            (2, 0) => 3.0,
            (2, 1) => 6.0,
            _ => 0.0,
        });
        let mut v = Fab::from_fn(yf, 1, |iv, _| match (iv.x(), iv.y()) {
            (0, 0) => 1.0,
            (1, 0) => 1.0,
            (0, 2) => 1.0,
            (1, 2) => 5.0,
            _ => 0.0,
        });
        {
            let mut views = [u.array_mut(), v.array_mut()];
            facediv_int(0, 0, 0, &mut views, ratio, cell);
        }
        // x_corr = 0.25 * 0.5 * (5 + 1 - 1 - 1), y_corr = 0.25 * 2 * (6 + 1 - 2 - 3)
        assert_eq!(u.get(IntVect::new_2d(1, 0), 0), 2.0 + 0.5);
        assert_eq!(u.get(IntVect::new_2d(1, 1), 0), 4.0 + 0.5);
        assert_eq!(v.get(IntVect::new_2d(0, 1), 0), 1.0 + 1.0);
        assert_eq!(v.get(IntVect::new_2d(1, 1), 0), 3.0 + 1.0);
    }

    #[test]
    fn stream_function_field_stays_divergence_free() {
        use prolong_test_utils::fixtures::{face_divergence, stream_function_faces};

        let ratio = Ratio::TWO;
        let ch = [0.5, 0.25];
        let fh = [0.25, 0.125];
        let cells = IndexBox::new_2d([0, 0], [1, 1]).unwrap();
        let cxf = cells.extend_hi(Axis::X, 1);
        let cyf = cells.extend_hi(Axis::Y, 1);
        let (cu, cv) = stream_function_faces(
            cxf.grow(Axis::Y, 1),
            cyf.grow(Axis::X, 1),
            ch,
            |x, y| (2.0 * x).sin() * y + x * x,
        );

        let fcells = cells.refine(ratio);
        let mut u = Fab::new(fcells.extend_hi(Axis::X, 1), 1);
        let mut v = Fab::new(fcells.extend_hi(Axis::Y, 1), 1);
        let mut uv = u.array_mut();
        facediv_face_fill(Axis::X, cxf, &cu.array(), 0, &mut uv, 0, 1, None, ratio);
        let mut vv = v.array_mut();
        facediv_face_fill(Axis::Y, cyf, &cv.array(), 0, &mut vv, 0, 1, None, ratio);
        let mut views = [uv, vv];
        facediv_int_fill(cells, &mut views, 0, 1, ratio, fh);
        drop(views);

        for iv in fcells.iter() {
            assert_close(face_divergence(&u, &v, iv.x(), iv.y(), fh), 0.0, 1e-10);
        }
    }
}
