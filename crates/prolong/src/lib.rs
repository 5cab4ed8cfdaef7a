//! Prolong: coarse-to-fine grid transfer for block-structured AMR.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the prolong sub-crates. For most users, adding `prolong` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use prolong::prelude::*;
//!
//! // Two by two coarse cells, refined by two in each direction.
//! let ratio = Ratio::TWO;
//! let cells = IndexBox::new_2d([0, 0], [1, 1])?;
//! let crse_data = vec![1.0, 2.0, 3.0, 4.0];
//! let crse = Array4::new(&crse_data, cells, 1)?;
//!
//! let fine_bx = cells.refine(ratio);
//! let mut fine_data = vec![0.0; fine_bx.num_pts()];
//! let fine = Array4Mut::new(&mut fine_data, fine_bx, 1)?;
//!
//! let exec = ExecConfig::default().build()?;
//! pc_interp_launch(&exec, fine_bx, fine, 0, 1, crse, 0, ratio);
//! assert_eq!(&fine_data[..4], &[1.0, 1.0, 2.0, 2.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `prolong-core` | Index boxes, ratios, array views, masks, geometry |
//! | [`interp`] | `prolong-interp` | Operators and execution backends |
//!
//! # Features
//!
//! - `parallel` (default): the rayon-backed `Threaded` backend.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Index-space vocabulary and views (`prolong-core`).
///
/// Contains [`types::IndexBox`], [`types::Ratio`], the strided
/// [`types::Array4`] views and [`types::GeometryContext`].
pub use prolong_core as types;

/// Prolongation operators and backends (`prolong-interp`).
///
/// Every operator has a pointwise kernel and a box-level driver; drivers
/// take any [`interp::Backend`].
pub use prolong_interp as interp;

/// Common imports for typical prolong usage.
///
/// ```rust
/// use prolong::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use prolong_core::{
        Array4, Array4Mut, Axis, CoordSys, GeometryContext, IndexBox, IntVect, MaskView, Ratio,
        Real,
    };

    // Errors
    pub use prolong_core::{GeometryError, LayoutError};

    // Execution
    pub use prolong_interp::{Backend, BackendKind, ConfigError, ExecConfig, Executor, Serial};

    // Operators
    pub use prolong_interp::{
        ccprotect_launch, ccquartic_launch, face_linear_face_fill, face_linear_fill,
        facediv_face_fill, facediv_int_fill, nodebilin_interp_launch, nodebilin_slopes_launch,
        pc_interp_launch, ProtectCase, ProtectTally, Slope,
    };
}
