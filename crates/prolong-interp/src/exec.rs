//! Execution backends for box-level operator launches.
//!
//! A launch hands its destination view to a [`Backend`], which decides how
//! to partition it into disjoint tiles and where to run the kernel on each
//! tile. Kernels themselves are identical for every backend; the tile a
//! kernel receives bounds the indices it may write.
//!
//! The backend is chosen at configuration time through [`ExecConfig`],
//! and the threaded backend is compiled only with the `parallel` feature.

use std::error::Error;
use std::fmt;

use prolong_core::Array4Mut;

/// A strategy for running a kernel over disjoint tiles of a view.
pub trait Backend: Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Cut `dest` into bands along its outer axis, boundaries on multiples
    /// of `align`, run `kernel` on each band and fold the results with
    /// `combine`.
    fn reduce_bands<'a, T, R, F, G>(
        &self,
        dest: Array4Mut<'a, T>,
        align: i32,
        kernel: F,
        combine: G,
    ) -> R
    where
        T: Send,
        R: Default + Send,
        F: Fn(Array4Mut<'_, T>) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync;

    /// Run `kernel` once per component of `dest`.
    fn for_each_component<'a, T, F>(&self, dest: Array4Mut<'a, T>, kernel: F)
    where
        T: Send,
        F: Fn(Array4Mut<'_, T>) + Send + Sync;

    /// [`reduce_bands`](Self::reduce_bands) without a result.
    fn for_each_band<'a, T, F>(&self, dest: Array4Mut<'a, T>, align: i32, kernel: F)
    where
        T: Send,
        F: Fn(Array4Mut<'_, T>) + Send + Sync,
    {
        self.reduce_bands(dest, align, kernel, |(), ()| ())
    }
}

/// Runs every kernel on the calling thread over the whole view.
#[derive(Clone, Copy, Debug, Default)]
pub struct Serial;

impl Backend for Serial {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn reduce_bands<'a, T, R, F, G>(
        &self,
        dest: Array4Mut<'a, T>,
        _align: i32,
        kernel: F,
        _combine: G,
    ) -> R
    where
        T: Send,
        R: Default + Send,
        F: Fn(Array4Mut<'_, T>) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync,
    {
        kernel(dest)
    }

    fn for_each_component<'a, T, F>(&self, dest: Array4Mut<'a, T>, kernel: F)
    where
        T: Send,
        F: Fn(Array4Mut<'_, T>) + Send + Sync,
    {
        kernel(dest)
    }
}

/// Runs tiles on the rayon global pool.
#[cfg(feature = "parallel")]
#[derive(Clone, Copy, Debug)]
pub struct Threaded {
    min_band_rows: i32,
}

#[cfg(feature = "parallel")]
impl Threaded {
    /// Bands of at least `min_band_rows` rows (rounded up to the alignment).
    pub fn new(min_band_rows: u32) -> Self {
        Self {
            min_band_rows: min_band_rows.clamp(1, i32::MAX as u32) as i32,
        }
    }

    /// Minimum rows per band.
    pub fn min_band_rows(&self) -> u32 {
        self.min_band_rows as u32
    }
}

#[cfg(feature = "parallel")]
impl Default for Threaded {
    fn default() -> Self {
        Self::new(ExecConfig::DEFAULT_MIN_BAND_ROWS)
    }
}

#[cfg(feature = "parallel")]
impl Backend for Threaded {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn reduce_bands<'a, T, R, F, G>(
        &self,
        dest: Array4Mut<'a, T>,
        align: i32,
        kernel: F,
        combine: G,
    ) -> R
    where
        T: Send,
        R: Default + Send,
        F: Fn(Array4Mut<'_, T>) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync,
    {
        use rayon::prelude::*;

        let bands = dest.into_bands(align.max(1), self.min_band_rows);
        log::trace!("threaded launch: {} bands, align {align}", bands.len());
        bands
            .into_par_iter()
            .map(|band| kernel(band))
            .reduce(R::default, |a, b| combine(a, b))
    }

    fn for_each_component<'a, T, F>(&self, dest: Array4Mut<'a, T>, kernel: F)
    where
        T: Send,
        F: Fn(Array4Mut<'_, T>) + Send + Sync,
    {
        use rayon::prelude::*;

        dest.into_components()
            .into_par_iter()
            .for_each(|comp| kernel(comp));
    }
}

/// Which backend an [`ExecConfig`] selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// [`Serial`].
    Serial,
    /// `Threaded` (requires the `parallel` feature).
    Threaded,
}

/// Errors detected during [`ExecConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_band_rows` is zero.
    ZeroBandRows,
    /// The selected backend was not compiled into this build.
    BackendUnavailable {
        /// Name of the missing backend.
        name: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBandRows => write!(f, "min_band_rows must be at least 1"),
            Self::BackendUnavailable { name } => {
                write!(f, "backend '{name}' not available in this build")
            }
        }
    }
}

impl Error for ConfigError {}

/// Configuration for building an [`Executor`].
#[derive(Clone, Debug)]
pub struct ExecConfig {
    /// Backend to run launches on. Default: threaded when the `parallel`
    /// feature is enabled, serial otherwise.
    pub backend: BackendKind,
    /// Minimum rows per band for the threaded backend. Default: 8.
    pub min_band_rows: u32,
}

impl ExecConfig {
    /// Default for [`min_band_rows`](Self::min_band_rows).
    pub const DEFAULT_MIN_BAND_ROWS: u32 = 8;

    /// Check the configuration against this build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_band_rows == 0 {
            return Err(ConfigError::ZeroBandRows);
        }
        if self.backend == BackendKind::Threaded && !cfg!(feature = "parallel") {
            return Err(ConfigError::BackendUnavailable { name: "threaded" });
        }
        Ok(())
    }

    /// Validate and build the executor.
    pub fn build(&self) -> Result<Executor, ConfigError> {
        self.validate()?;
        let exec = match self.backend {
            BackendKind::Serial => Executor::Serial(Serial),
            #[cfg(feature = "parallel")]
            BackendKind::Threaded => Executor::Threaded(Threaded::new(self.min_band_rows)),
            #[cfg(not(feature = "parallel"))]
            BackendKind::Threaded => {
                return Err(ConfigError::BackendUnavailable { name: "threaded" })
            }
        };
        log::debug!("prolong: using {} backend", exec.name());
        Ok(exec)
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            backend: if cfg!(feature = "parallel") {
                BackendKind::Threaded
            } else {
                BackendKind::Serial
            },
            min_band_rows: Self::DEFAULT_MIN_BAND_ROWS,
        }
    }
}

/// A backend selected at configuration time.
#[derive(Clone, Copy, Debug)]
pub enum Executor {
    /// Calling-thread execution.
    Serial(Serial),
    /// Rayon execution.
    #[cfg(feature = "parallel")]
    Threaded(Threaded),
}

impl Default for Executor {
    fn default() -> Self {
        Self::Serial(Serial)
    }
}

impl Backend for Executor {
    fn name(&self) -> &'static str {
        match self {
            Self::Serial(b) => b.name(),
            #[cfg(feature = "parallel")]
            Self::Threaded(b) => b.name(),
        }
    }

    fn reduce_bands<'a, T, R, F, G>(
        &self,
        dest: Array4Mut<'a, T>,
        align: i32,
        kernel: F,
        combine: G,
    ) -> R
    where
        T: Send,
        R: Default + Send,
        F: Fn(Array4Mut<'_, T>) -> R + Send + Sync,
        G: Fn(R, R) -> R + Send + Sync,
    {
        match self {
            Self::Serial(b) => b.reduce_bands(dest, align, kernel, combine),
            #[cfg(feature = "parallel")]
            Self::Threaded(b) => b.reduce_bands(dest, align, kernel, combine),
        }
    }

    fn for_each_component<'a, T, F>(&self, dest: Array4Mut<'a, T>, kernel: F)
    where
        T: Send,
        F: Fn(Array4Mut<'_, T>) + Send + Sync,
    {
        match self {
            Self::Serial(b) => b.for_each_component(dest, kernel),
            #[cfg(feature = "parallel")]
            Self::Threaded(b) => b.for_each_component(dest, kernel),
        }
    }
}
