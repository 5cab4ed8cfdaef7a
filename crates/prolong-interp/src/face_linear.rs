//! Face-centered prolongation: masked replication onto coincident fine
//! faces, then linear fill along the face normal.
//!
//! Face data normal to `axis` lives on a box extended by one index on the
//! upper side of `axis`. A coarse face `c` coincides with the fine faces
//! whose normal index is `c[axis] * ratio[axis]`; the fine faces between
//! two coincident planes are interior to a coarse cell.

use prolong_core::{
    coarsen, mask_allows, Array4, Array4Mut, Axis, IndexBox, IntVect, MaskView, Ratio, Real,
};

use crate::exec::Backend;

/// Copy coarse face `(ci, cj, ck)` onto the fine faces that overlap it.
///
/// The overlap is `ratio[t]` faces along each transverse axis `t`: two
/// faces in 2-D and four in 3-D for ratio 2. Nothing is written when
/// `mask` is present and zero at the coarse face.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn face_linear_face_interp(
    axis: Axis,
    ci: i32,
    cj: i32,
    ck: i32,
    n: usize,
    fine: &mut Array4Mut<'_, Real>,
    crse: &Array4<'_, Real>,
    mask: Option<&MaskView<'_>>,
    ratio: Ratio,
) {
    if !mask_allows(mask, ci, cj, ck, n) {
        return;
    }
    let c = IntVect::new(ci, cj, ck);
    let base = ratio.refine(c);
    let value = crse[(c, n)];
    let (t0, t1) = axis.transverse();
    for b in 0..ratio.get(t1) {
        for a in 0..ratio.get(t0) {
            let mut f = base;
            f[t0] += a;
            f[t1] += b;
            fine[(f, n)] = value;
        }
    }
}

/// Linear interpolation along `axis` for a fine face between two
/// coincident planes.
///
/// Faces on a coincident plane are left alone; the bounding planes must
/// already hold the values to interpolate between.
#[inline]
pub fn face_linear_interp(
    axis: Axis,
    i: i32,
    j: i32,
    k: i32,
    n: usize,
    fine: &mut Array4Mut<'_, Real>,
    ratio: Ratio,
) {
    let r = ratio.get(axis);
    let iv = IntVect::new(i, j, k);
    let c = coarsen(iv[axis], r);
    let off = iv[axis] - c * r;
    if off != 0 {
        let w = off as Real * (1.0 / r as Real);
        let lo = fine[(iv.with(axis, c * r), n)];
        let hi = fine[(iv.with(axis, (c + 1) * r), n)];
        fine[(iv, n)] = (1.0 - w) * lo + w * hi;
    }
}

/// [`face_linear_face_interp`] for every coarse face in `cbx` and every
/// component of `fine`, one component per task.
pub fn face_linear_face_fill<B: Backend>(
    backend: &B,
    axis: Axis,
    cbx: IndexBox,
    fine: Array4Mut<'_, Real>,
    crse: Array4<'_, Real>,
    mask: Option<MaskView<'_>>,
    ratio: Ratio,
) {
    backend.for_each_component(fine, |mut tile| {
        for n in tile.comp_range() {
            for c in cbx.iter() {
                face_linear_face_interp(
                    axis,
                    c.x(),
                    c.y(),
                    c.z(),
                    n,
                    &mut tile,
                    &crse,
                    mask.as_ref(),
                    ratio,
                );
            }
        }
    });
}

/// [`face_linear_interp`] for every fine face in `bx` and every component
/// of `fine`, one component per task.
pub fn face_linear_fill<B: Backend>(
    backend: &B,
    axis: Axis,
    bx: IndexBox,
    fine: Array4Mut<'_, Real>,
    ratio: Ratio,
) {
    backend.for_each_component(fine, |mut tile| {
        for n in tile.comp_range() {
            for iv in bx.iter() {
                face_linear_interp(axis, iv.x(), iv.y(), iv.z(), n, &mut tile, ratio);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Serial;
    use prolong_test_utils::Fab;

    #[test]
    fn x_face_replicates_onto_two_fine_faces_in_2d() {
        let cfaces = IndexBox::new_2d([0, 0], [2, 1]).unwrap();
        let crse = Fab::from_fn(cfaces, 1, |iv, _| (iv.x() * 10 + iv.y()) as Real);
        let ffaces = IndexBox::new_2d([0, 0], [4, 3]).unwrap();
        let mut fine = Fab::filled(ffaces, 1, -1.0);
        face_linear_face_interp(
            Axis::X,
            1,
            1,
            0,
            0,
            &mut fine.array_mut(),
            &crse.array(),
            None,
            Ratio::TWO,
        );
        assert_eq!(fine.get(IntVect::new_2d(2, 2), 0), 11.0);
        assert_eq!(fine.get(IntVect::new_2d(2, 3), 0), 11.0);
        let written = fine.as_slice().iter().filter(|&&v| v != -1.0).count();
        assert_eq!(written, 2);
    }

    #[test]
    fn z_face_replicates_onto_four_fine_faces_in_3d() {
        let ratio = Ratio::new(2, 2, 2).unwrap();
        let cfaces = IndexBox::new(IntVect::ZERO, IntVect::new(0, 0, 1)).unwrap();
        let crse = Fab::from_fn(cfaces, 1, |iv, _| 1.0 + iv.z() as Real);
        let ffaces = IndexBox::new(IntVect::ZERO, IntVect::new(1, 1, 2)).unwrap();
        let mut fine = Fab::new(ffaces, 1);
        let mut view = fine.array_mut();
        face_linear_face_interp(Axis::Z, 0, 0, 1, 0, &mut view, &crse.array(), None, ratio);
        drop(view);
        for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(fine.get(IntVect::new(i, j, 2), 0), 2.0);
            assert_eq!(fine.get(IntVect::new(i, j, 0), 0), 0.0);
        }
    }

    #[test]
    fn ratio_four_replicates_onto_four_faces_in_2d() {
        let ratio = Ratio::new_2d(4, 4).unwrap();
        let cfaces = IndexBox::new_2d([0, 0], [0, 0]).unwrap();
        let crse = Fab::filled(cfaces, 1, 3.0);
        let mut fine = Fab::new(IndexBox::new_2d([0, 0], [3, 0]).unwrap(), 1);
        let mut view = fine.array_mut();
        face_linear_face_interp(Axis::Y, 0, 0, 0, 0, &mut view, &crse.array(), None, ratio);
        drop(view);
        assert!(fine.as_slice().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn zero_mask_skips_write() {
        let cfaces = IndexBox::new_2d([0, 0], [1, 0]).unwrap();
        let crse = Fab::filled(cfaces, 1, 5.0);
        let m = Fab::from_fn(cfaces, 1, |iv, _| iv.x());
        let mut fine = Fab::new(IndexBox::new_2d([0, 0], [2, 1]).unwrap(), 1);
        let mask = m.array();
        for ci in 0..2 {
            face_linear_face_interp(
                Axis::X,
                ci,
                0,
                0,
                0,
                &mut fine.array_mut(),
                &crse.array(),
                Some(&mask),
                Ratio::TWO,
            );
        }
        assert_eq!(fine.get(IntVect::new_2d(0, 0), 0), 0.0);
        assert_eq!(fine.get(IntVect::new_2d(2, 1), 0), 5.0);
    }

    #[test]
    fn linear_fill_interpolates_between_planes() {
        let ratio = Ratio::new_2d(4, 1).unwrap();
        let bx = IndexBox::new_2d([0, 0], [8, 0]).unwrap();
        let mut fine = Fab::from_fn(bx, 1, |iv, _| match iv.x() {
            0 => 1.0,
            4 => 5.0,
            8 => -3.0,
            _ => Real::NAN,
        });
        face_linear_fill(&Serial, Axis::X, bx, fine.array_mut(), ratio);
        let got: Vec<Real> = fine.as_slice().to_vec();
        assert_eq!(got, vec![1.0, 2.0, 3.0, 4.0, 5.0, 3.0, 1.0, -1.0, -3.0]);
    }

    #[test]
    fn coincident_faces_are_untouched() {
        let bx = IndexBox::new_2d([0, -2], [0, 2]).unwrap();
        let mut fine = Fab::from_fn(bx, 1, |iv, _| iv.y() as Real * 7.0);
        let before = fine.clone();
        for j in [-2, 0, 2] {
            face_linear_interp(Axis::Y, 0, j, 0, 0, &mut fine.array_mut(), Ratio::TWO);
        }
        assert_eq!(fine, before);
    }
}
