//! Coarse-to-fine prolongation operators for block-structured AMR.
//!
//! Each operator is a pure function over borrowed views from
//! [`prolong_core`]: it reads coarse data (and, where relevant, a validity
//! mask or level geometry) and writes fine data. Operators never allocate
//! on their hot path, never return errors, and never call each other; the
//! caller picks one per field and composes them.
//!
//! | Module | Data | Operator |
//! |--------|------|----------|
//! | [`pc`] | any | piecewise constant |
//! | [`nodebilin`] | nodes | bilinear with stored slopes |
//! | [`face_linear`] | faces | masked replication + normal-direction linear |
//! | [`facediv`] | faces | divergence preserving |
//! | [`protect`] | cells | conservative positivity repair of a correction |
//! | [`quartic`] | cells | conservative quartic, ratio 2 |
//!
//! Box-level drivers (`*_launch`, `*_fill`) take a [`Backend`] from
//! [`exec`] that cuts the destination view into disjoint tiles. Results are
//! identical for every backend.
//!
//! Preconditions such as positive ratios, ratio 2 for the quartic and
//! divergence-preserving operators, and views covering every index an
//! operator touches are the caller's to uphold. A violated precondition
//! panics on slice indexing (or on a `debug_assert!` in debug builds).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod exec;
pub mod face_linear;
pub mod facediv;
pub mod nodebilin;
pub mod pc;
pub mod protect;
pub mod quartic;

pub use exec::{Backend, BackendKind, ConfigError, ExecConfig, Executor, Serial};
#[cfg(feature = "parallel")]
pub use exec::Threaded;
pub use face_linear::{
    face_linear_face_fill, face_linear_face_interp, face_linear_fill, face_linear_interp,
};
pub use facediv::{facediv_face_fill, facediv_face_interp, facediv_int, facediv_int_fill};
pub use nodebilin::{
    nodebilin_interp, nodebilin_interp_launch, nodebilin_slopes, nodebilin_slopes_launch, Slope,
};
pub use pc::{pc_interp, pc_interp_launch};
pub use protect::{ccprotect, ccprotect_launch, classify, ProtectCase, ProtectTally};
pub use quartic::{ccquartic_fill, ccquartic_interp, ccquartic_launch, Taps, QUARTIC_WEIGHTS};
