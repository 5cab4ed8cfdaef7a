//! Non-owning strided views over caller-owned field storage.
//!
//! Layout is x fastest, then y, z, and finally component, matching a
//! contiguous `[ncomp][nz][ny][nx]` buffer. Indices are absolute: a view
//! over the box `[lo, hi]` is addressed with `(i, j, k, n)` where
//! `lo <= (i, j, k) <= hi`.
//!
//! [`Array4`] is a `Copy` read view over one slice. [`Array4Mut`] keeps one
//! borrowed plane per component so that it can be cut into disjoint tiles
//! (bands along the outer axis, or single components) and handed to
//! separate workers without `unsafe`.

use std::ops::{Index, IndexMut, Range};

use smallvec::SmallVec;

use crate::error::LayoutError;
use crate::index::{coarsen, Axis, IndexBox, IntVect};

/// Integer validity mask: zero means "already valid, do not overwrite".
pub type MaskView<'a> = Array4<'a, i32>;

/// Whether `mask` permits a write at `(i, j, k, n)`.
///
/// An absent mask always permits; a present mask permits where its entry
/// is nonzero.
#[inline]
pub fn mask_allows(mask: Option<&MaskView<'_>>, i: i32, j: i32, k: i32, n: usize) -> bool {
    mask.map_or(true, |m| m[(i, j, k, n)] != 0)
}

/// Strides of a box in x-fastest order: `(jstride, kstride, npts)`.
#[inline]
fn strides(bounds: &IndexBox) -> (usize, usize, usize) {
    let len = bounds.length();
    let jstride = len.x() as usize;
    let kstride = jstride * len.y() as usize;
    (jstride, kstride, kstride * len.z() as usize)
}

/// Read-only view of `ncomp` components over an index box.
#[derive(Clone, Copy, Debug)]
pub struct Array4<'a, T> {
    data: &'a [T],
    bounds: IndexBox,
    ncomp: usize,
    jstride: usize,
    kstride: usize,
    nstride: usize,
}

impl<'a, T> Array4<'a, T> {
    /// Wrap `data` as `ncomp` components over `bounds`.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::ZeroComponents`] if `ncomp == 0`
    /// - [`LayoutError::StorageTooSmall`] if `data` is shorter than
    ///   `bounds.num_pts() * ncomp`
    pub fn new(data: &'a [T], bounds: IndexBox, ncomp: usize) -> Result<Self, LayoutError> {
        if ncomp == 0 {
            return Err(LayoutError::ZeroComponents);
        }
        let (jstride, kstride, npts) = strides(&bounds);
        let required = npts * ncomp;
        if data.len() < required {
            return Err(LayoutError::StorageTooSmall {
                len: data.len(),
                required,
            });
        }
        Ok(Self {
            data: &data[..required],
            bounds,
            ncomp,
            jstride,
            kstride,
            nstride: npts,
        })
    }

    /// Index box the view covers.
    #[inline]
    pub fn bounds(&self) -> IndexBox {
        self.bounds
    }

    /// Lower corner of the view.
    #[inline]
    pub fn lo(&self) -> IntVect {
        self.bounds.lo()
    }

    /// Upper corner of the view.
    #[inline]
    pub fn hi(&self) -> IntVect {
        self.bounds.hi()
    }

    /// Number of components.
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    /// Checked access, `None` outside the box or component range.
    pub fn get(&self, i: i32, j: i32, k: i32, n: usize) -> Option<&T> {
        if n >= self.ncomp || !self.bounds.contains(IntVect::new(i, j, k)) {
            return None;
        }
        Some(&self.data[self.offset(i, j, k) + n * self.nstride])
    }

    #[inline]
    fn offset(&self, i: i32, j: i32, k: i32) -> usize {
        debug_assert!(
            self.bounds.contains(IntVect::new(i, j, k)),
            "index ({i}, {j}, {k}) outside view {}",
            self.bounds
        );
        let lo = self.bounds.lo();
        (i - lo.x()) as usize
            + (j - lo.y()) as usize * self.jstride
            + (k - lo.z()) as usize * self.kstride
    }
}

impl<T> Index<(i32, i32, i32, usize)> for Array4<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j, k, n): (i32, i32, i32, usize)) -> &T {
        &self.data[self.offset(i, j, k) + n * self.nstride]
    }
}

impl<T> Index<(IntVect, usize)> for Array4<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (iv, n): (IntVect, usize)) -> &T {
        &self[(iv.x(), iv.y(), iv.z(), n)]
    }
}

/// Mutable view of a contiguous component range over an index box.
///
/// Components are addressed by their absolute number: a view produced by
/// [`into_components`](Self::into_components) for component 3 is still
/// indexed with `n == 3`.
#[derive(Debug)]
pub struct Array4Mut<'a, T> {
    planes: SmallVec<[&'a mut [T]; 4]>,
    bounds: IndexBox,
    comp_lo: usize,
    jstride: usize,
    kstride: usize,
}

impl<'a, T> Array4Mut<'a, T> {
    /// Wrap `data` as `ncomp` components over `bounds`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Array4::new`].
    pub fn new(data: &'a mut [T], bounds: IndexBox, ncomp: usize) -> Result<Self, LayoutError> {
        if ncomp == 0 {
            return Err(LayoutError::ZeroComponents);
        }
        let (_, _, npts) = strides(&bounds);
        let required = npts * ncomp;
        if data.len() < required {
            return Err(LayoutError::StorageTooSmall {
                len: data.len(),
                required,
            });
        }
        let planes = data[..required].chunks_exact_mut(npts).collect();
        Ok(Self::from_planes(planes, bounds, 0))
    }

    fn from_planes(planes: SmallVec<[&'a mut [T]; 4]>, bounds: IndexBox, comp_lo: usize) -> Self {
        let (jstride, kstride, _) = strides(&bounds);
        Self {
            planes,
            bounds,
            comp_lo,
            jstride,
            kstride,
        }
    }

    /// Index box the view covers.
    #[inline]
    pub fn bounds(&self) -> IndexBox {
        self.bounds
    }

    /// Lower corner of the view.
    #[inline]
    pub fn lo(&self) -> IntVect {
        self.bounds.lo()
    }

    /// Upper corner of the view.
    #[inline]
    pub fn hi(&self) -> IntVect {
        self.bounds.hi()
    }

    /// Number of components in the view.
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.planes.len()
    }

    /// Absolute component numbers the view covers.
    #[inline]
    pub fn comp_range(&self) -> Range<usize> {
        self.comp_lo..self.comp_lo + self.planes.len()
    }

    /// Checked access, `None` outside the box or component range.
    pub fn get(&self, i: i32, j: i32, k: i32, n: usize) -> Option<&T> {
        if !self.comp_range().contains(&n) || !self.bounds.contains(IntVect::new(i, j, k)) {
            return None;
        }
        Some(&self.planes[n - self.comp_lo][self.offset(i, j, k)])
    }

    /// A shorter-lived view over the same storage.
    pub fn reborrow(&mut self) -> Array4Mut<'_, T> {
        Array4Mut {
            planes: self.planes.iter_mut().map(|p| &mut **p).collect(),
            bounds: self.bounds,
            comp_lo: self.comp_lo,
            jstride: self.jstride,
            kstride: self.kstride,
        }
    }

    /// Slowest-varying spatial axis: z for 3-D boxes, y otherwise.
    ///
    /// Rows along this axis are contiguous within each component plane.
    pub fn outer_axis(&self) -> Axis {
        if self.bounds.length().z() > 1 {
            Axis::Z
        } else {
            Axis::Y
        }
    }

    /// Split along the outer axis into `[lo, at - 1]` and `[at, hi]`.
    ///
    /// Requires `lo < at <= hi` on the outer axis.
    pub fn split_outer(self, at: i32) -> (Self, Self) {
        let axis = self.outer_axis();
        let (lower, upper) = self.bounds.split(axis, at);
        let mid = lower.num_pts();
        let mut low_planes = SmallVec::new();
        let mut up_planes = SmallVec::new();
        for plane in self.planes {
            let (a, b) = plane.split_at_mut(mid);
            low_planes.push(a);
            up_planes.push(b);
        }
        (
            Self::from_planes(low_planes, lower, self.comp_lo),
            Self::from_planes(up_planes, upper, self.comp_lo),
        )
    }

    /// Cut into bands along the outer axis.
    ///
    /// Band boundaries fall on multiples of `step`, the smallest multiple
    /// of `align` that is at least `min_rows`, so a band never splits an
    /// `align`-row footprint. Every band keeps all components.
    ///
    /// `min_rows` beyond the box extent is treated as the extent, so any
    /// positive value is accepted.
    pub fn into_bands(self, align: i32, min_rows: i32) -> Vec<Self> {
        debug_assert!(align >= 1 && min_rows >= 1);
        let axis = self.outer_axis();
        let rows = min_rows.min(self.bounds.length()[axis]).max(1) as i64;
        let align64 = align.max(1) as i64;
        let step = (align64 * ((rows + align64 - 1) / align64)).min(i32::MAX as i64) as i32;
        let mut bands = Vec::new();
        let mut rest = self;
        loop {
            let lo = rest.bounds.lo()[axis];
            let next = (coarsen(lo, step) + 1) * step;
            if next > rest.bounds.hi()[axis] {
                bands.push(rest);
                return bands;
            }
            let (band, tail) = rest.split_outer(next);
            bands.push(band);
            rest = tail;
        }
    }

    /// Cut into one single-component view per component.
    pub fn into_components(self) -> Vec<Self> {
        let bounds = self.bounds;
        let comp_lo = self.comp_lo;
        self.planes
            .into_iter()
            .enumerate()
            .map(|(n, plane)| {
                let mut planes = SmallVec::new();
                planes.push(plane);
                Self::from_planes(planes, bounds, comp_lo + n)
            })
            .collect()
    }

    #[inline]
    fn offset(&self, i: i32, j: i32, k: i32) -> usize {
        debug_assert!(
            self.bounds.contains(IntVect::new(i, j, k)),
            "index ({i}, {j}, {k}) outside view {}",
            self.bounds
        );
        let lo = self.bounds.lo();
        (i - lo.x()) as usize
            + (j - lo.y()) as usize * self.jstride
            + (k - lo.z()) as usize * self.kstride
    }
}

impl<T> Index<(i32, i32, i32, usize)> for Array4Mut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j, k, n): (i32, i32, i32, usize)) -> &T {
        let off = self.offset(i, j, k);
        &self.planes[n - self.comp_lo][off]
    }
}

impl<T> IndexMut<(i32, i32, i32, usize)> for Array4Mut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (i, j, k, n): (i32, i32, i32, usize)) -> &mut T {
        let off = self.offset(i, j, k);
        &mut self.planes[n - self.comp_lo][off]
    }
}

impl<T> Index<(IntVect, usize)> for Array4Mut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (iv, n): (IntVect, usize)) -> &T {
        &self[(iv.x(), iv.y(), iv.z(), n)]
    }
}

impl<T> IndexMut<(IntVect, usize)> for Array4Mut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (iv, n): (IntVect, usize)) -> &mut T {
        &mut self[(iv.x(), iv.y(), iv.z(), n)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(lo: [i32; 2], hi: [i32; 2]) -> IndexBox {
        IndexBox::new_2d(lo, hi).unwrap()
    }

    #[test]
    fn layout_is_x_fastest_then_component() {
        let data: Vec<f64> = (0..12).map(f64::from).collect();
        let a = Array4::new(&data, bx([1, 10], [3, 11]), 2).unwrap();
        assert_eq!(a[(1, 10, 0, 0)], 0.0);
        assert_eq!(a[(2, 10, 0, 0)], 1.0);
        assert_eq!(a[(1, 11, 0, 0)], 3.0);
        assert_eq!(a[(3, 11, 0, 1)], 11.0);
        assert_eq!(a[(IntVect::new_2d(2, 11), 1)], 10.0);
    }

    #[test]
    fn construction_checks_storage() {
        let data = vec![0.0f64; 5];
        let err = Array4::new(&data, bx([0, 0], [2, 1]), 1).unwrap_err();
        assert_eq!(err, LayoutError::StorageTooSmall { len: 5, required: 6 });
        assert_eq!(
            Array4::new(&data, bx([0, 0], [0, 0]), 0).unwrap_err(),
            LayoutError::ZeroComponents
        );

        let mut data = vec![0.0f64; 6];
        assert!(Array4Mut::new(&mut data, bx([0, 0], [2, 1]), 2).is_err());
    }

    #[test]
    fn checked_get() {
        let data = vec![1.0f64; 4];
        let a = Array4::new(&data, bx([0, 0], [1, 1]), 1).unwrap();
        assert_eq!(a.get(1, 1, 0, 0), Some(&1.0));
        assert_eq!(a.get(2, 1, 0, 0), None);
        assert_eq!(a.get(0, 0, 0, 1), None);
    }

    #[test]
    fn mutable_writes_land_in_storage() {
        let mut data = vec![0.0f64; 8];
        {
            let mut a = Array4Mut::new(&mut data, bx([0, 0], [1, 1]), 2).unwrap();
            a[(1, 0, 0, 0)] = 5.0;
            a[(0, 1, 0, 1)] = 7.0;
            let mut r = a.reborrow();
            r[(1, 1, 0, 1)] = 9.0;
        }
        assert_eq!(data, vec![0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 7.0, 9.0]);
    }

    #[test]
    fn bands_align_to_absolute_multiples() {
        let mut data = vec![0.0f64; 3 * 7 * 2];
        let a = Array4Mut::new(&mut data, bx([0, 1], [2, 7]), 2).unwrap();
        let bands = a.into_bands(2, 1);
        let rows: Vec<(i32, i32)> = bands.iter().map(|b| (b.lo().y(), b.hi().y())).collect();
        assert_eq!(rows, vec![(1, 1), (2, 3), (4, 5), (6, 7)]);
        assert!(bands.iter().all(|b| b.ncomp() == 2));
    }

    #[test]
    fn bands_respect_min_rows() {
        let mut data = vec![0.0f64; 2 * 10];
        let a = Array4Mut::new(&mut data, bx([0, 0], [1, 9]), 1).unwrap();
        let rows: Vec<(i32, i32)> = a
            .into_bands(2, 3)
            .iter()
            .map(|b| (b.lo().y(), b.hi().y()))
            .collect();
        assert_eq!(rows, vec![(0, 3), (4, 7), (8, 9)]);
    }

    #[test]
    fn oversized_min_rows_yields_aligned_bands() {
        let mut data = vec![0.0f64; 2 * 7];
        let a = Array4Mut::new(&mut data, bx([0, 1], [1, 7]), 1).unwrap();
        let rows: Vec<(i32, i32)> = a
            .into_bands(2, i32::MAX)
            .iter()
            .map(|b| (b.lo().y(), b.hi().y()))
            .collect();
        // step = 8 covers the whole box in one band
        assert_eq!(rows, vec![(1, 7)]);

        let mut data = vec![0.0f64; 2 * 7];
        let a = Array4Mut::new(&mut data, bx([0, 3], [1, 9]), 1).unwrap();
        let rows: Vec<(i32, i32)> = a
            .into_bands(2, i32::MAX)
            .iter()
            .map(|b| (b.lo().y(), b.hi().y()))
            .collect();
        assert_eq!(rows, vec![(3, 7), (8, 9)]);
    }

    #[test]
    fn band_writes_address_original_cells() {
        let mut data = vec![0.0f64; 2 * 4 * 2];
        {
            let a = Array4Mut::new(&mut data, bx([0, 0], [1, 3]), 2).unwrap();
            for mut band in a.into_bands(1, 1) {
                let b = band.bounds();
                for iv in b.iter() {
                    for n in band.comp_range() {
                        band[(iv, n)] = (iv.x() + 10 * iv.y() + 100 * n as i32) as f64;
                    }
                }
            }
        }
        let a = Array4::new(&data, bx([0, 0], [1, 3]), 2).unwrap();
        assert_eq!(a[(1, 3, 0, 1)], 131.0);
        assert_eq!(a[(0, 2, 0, 0)], 20.0);
    }

    #[test]
    fn bands_split_along_z_for_3d_boxes() {
        let b3 = IndexBox::new(IntVect::new(0, 0, 0), IntVect::new(1, 1, 3)).unwrap();
        let mut data = vec![0.0f64; b3.num_pts()];
        let a = Array4Mut::new(&mut data, b3, 1).unwrap();
        assert_eq!(a.outer_axis(), Axis::Z);
        let bands = a.into_bands(2, 1);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].lo(), IntVect::new(0, 0, 2));
    }

    #[test]
    fn components_keep_absolute_numbering() {
        let mut data = vec![0.0f64; 3 * 4];
        {
            let a = Array4Mut::new(&mut data, bx([0, 0], [1, 1]), 3).unwrap();
            for mut c in a.into_components() {
                let n = c.comp_range().start;
                assert_eq!(c.ncomp(), 1);
                c[(1, 1, 0, n)] = n as f64 + 1.0;
                assert_eq!(c.get(0, 0, 0, (n + 1) % 3), None);
            }
        }
        assert_eq!(data[3], 1.0);
        assert_eq!(data[7], 2.0);
        assert_eq!(data[11], 3.0);
    }

    #[test]
    fn mask_semantics() {
        let m = vec![1, 0];
        let mask = Array4::new(&m, bx([0, 0], [1, 0]), 1).unwrap();
        assert!(mask_allows(Some(&mask), 0, 0, 0, 0));
        assert!(!mask_allows(Some(&mask), 1, 0, 0, 0));
        assert!(mask_allows(None, 1, 0, 0, 0));
    }
}
