//! Core types for coarse/fine grid transfer in block-structured AMR.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! index-space vocabulary shared by every transfer operator: integer
//! vectors and boxes, refinement ratios, non-owning strided array views,
//! validity masks, and per-level coordinate geometry.
//!
//! Nothing here owns field storage. Views borrow caller-owned slices and
//! only their constructors validate anything; indexing inside kernels is
//! checked by contract (`debug_assert!`) and by slice bounds.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod geometry;
pub mod index;
pub mod ratio;

pub use array::{mask_allows, Array4, Array4Mut, MaskView};
pub use error::{GeometryError, LayoutError};
pub use geometry::{CoordSys, GeometryContext};
pub use index::{coarsen, Axis, BoxIter, IndexBox, IntVect};
pub use ratio::Ratio;

/// Floating-point type of all field data.
pub type Real = f64;
