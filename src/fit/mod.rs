//! fit — periodogram search and coefficient fits over light-curve batches.
//!
//! Purpose
//! -------
//! Provide the three fitting entry points ([`search`], [`null`], [`single`])
//! on top of the ingest layer, the backend seam they call through
//! ([`FitRoutine`]), and the helpers callers need around them: validated
//! search parameters, frequency-grid planning, and coefficient-row layout.
//!
//! Key behaviors
//! -------------
//! - Entry points build a batch, hand borrowed views to the backend, release
//!   the batch, then copy the backend's flat buffers into owned arrays.
//! - `search` can restore default SIGINT handling for the duration of the
//!   backend call ([`InterruptScope`]) so long searches stay interruptible.
//! - [`FrequencyGrid`] plans `(pl, ph, vsamp)` from a period range and picks
//!   a refined best frequency out of a periodogram.
//! - With the `sfit` feature, [`sfit_ffi::SfitLibrary`] implements
//!   [`FitRoutine`] over the linked C routines.
//!
//! Invariants & assumptions
//! ------------------------
//! - Backends never see a batch that failed validation.
//! - Output arrays are never exposed when the backend reports failure.
//! - Row `r` of a coefficient matrix corresponds to input `r`.
//!
//! Conventions
//! -----------
//! - Frequency index `k` maps to frequency `k · vsamp`; search outputs are
//!   indexed from `pl`.
//! - Errors are reported as [`FitError`] / [`FitResult`]; ingest errors are
//!   wrapped, not flattened.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Plan a grid with [`FrequencyGrid::from_periods`].
//!   2. Run [`search`] with [`FrequencyGrid::search_params`].
//!   3. Pick `v` with [`FrequencyGrid::best_frequency`], then call [`null`]
//!      and [`single`] to compare the two models.
//!   4. Split coefficient rows with [`CoefficientLayout::split`].
//!
//! Testing notes
//! -------------
//! - Entry points are tested against in-process [`FitRoutine`] doubles that
//!   record their calls; the C backend is only compiled with `sfit`.

pub mod entry;
pub mod errors;
pub mod grid;
pub mod interrupt;
pub mod outcome;
pub mod params;
pub mod routine;
#[cfg(feature = "sfit")]
pub mod sfit_ffi;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::entry::{null, search, single};
pub use self::errors::{FitError, FitResult};
pub use self::grid::{DEFAULT_OVERSAMPLE, FrequencyGrid};
pub use self::interrupt::InterruptScope;
pub use self::outcome::{CoefficientLayout, CoefficientRow, FitOutcome, SearchOutcome, SinusoidTerm};
pub use self::params::{SearchParams, ThreadCount};
pub use self::routine::{CoefficientBuffer, FitRoutine, RoutineFailure, RoutineKind, SearchRequest};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        CoefficientLayout, FitError, FitOutcome, FitResult, FitRoutine, FrequencyGrid,
        SearchOutcome, SearchParams, null, search, single,
    };
}
