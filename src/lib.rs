//! rust_sfit — light-curve batch ingestion for sinusoid-fit periodograms.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the `search`, `null` and `single` fitting calls to Python via the
//! `_rust_sfit` extension module. The crate turns heterogeneous
//! light-curve tuples into a validated batch and hands it to the external
//! sinusoid-fit routines.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`ingest`] (conversion, validation,
//!   all-or-nothing batch construction) and [`fit`] (entry points, backend
//!   seam, grid planning, coefficient layout).
//! - When `python-bindings` is enabled, define `#[pyfunction]` wrappers and
//!   the `#[pymodule]` initializer for `_rust_sfit`, backed by the linked
//!   `libsfit` routines.
//!
//! Invariants & assumptions
//! ------------------------
//! - All validation lives in the inner Rust modules; this file performs only
//!   argument extraction, dispatch, and array hand-off.
//! - Python-visible signatures are fixed: `search(list, pl, ph, vsamp,
//!   nthr=-1)`, `null(list)` and `single(list, v)`.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as [`ingest::BatchError`] /
//!   [`fit::FitError`] internally and converted to `PyErr` at the PyO3
//!   boundary (`IndexError` for shape mismatches, `TypeError` for
//!   conversion failures, `RuntimeError` for backend failures).
//! - The library installs no logger; entry points emit `log` records that
//!   the host may route wherever it likes.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`ingest`] and [`fit`] directly and
//!   supply its own [`fit::FitRoutine`] (or enable `sfit`).
//! - Python code imports `_rust_sfit` and calls the three functions with a
//!   list of `(t, y, wt[, ep[, idc[, iamp]]])` tuples.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration test in `tests/`, which drives the entry points through an
//!   in-process routine.

pub mod fit;
pub mod ingest;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    fit::{SearchParams, sfit_ffi::SfitLibrary},
    utils::extract_light_curves,
};

/// search — periodogram search over a list of light curves.
///
/// Parameters
/// ----------
/// - `list`: sequence of `(t, y, wt[, ep[, idc[, iamp]]])` tuples.
/// - `pl`, `ph`: `i32`
///   Inclusive frequency-index range.
/// - `vsamp`: `f64`
///   Frequency sampling step.
/// - `nthr`: `i32`
///   Thread count; zero or negative selects the available parallelism.
///
/// Returns
/// -------
/// `(chisq, winfunc)`
///   Two `float64` arrays of length `ph - pl + 1`.
///
/// Notes
/// -----
/// - SIGINT reverts to its default action while the search runs, so Ctrl-C
///   terminates a long search instead of being deferred.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (list, pl, ph, vsamp, nthr = -1),
    text_signature = "(list, pl, ph, vsamp, nthr=-1)"
)]
pub fn search<'py>(
    py: Python<'py>, list: &Bound<'py, PyAny>, pl: i32, ph: i32, vsamp: f64, nthr: i32,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let inputs = extract_light_curves(list)?;
    let params = SearchParams::new(pl, ph, vsamp, nthr)?.with_default_interrupts();
    let outcome = py.allow_threads(|| fit::search(&SfitLibrary, &inputs, &params))?;
    Ok((outcome.chisq.into_pyarray(py), outcome.winfunc.into_pyarray(py)))
}

/// null — fit without a periodic term.
///
/// Returns `(chisq, b)` with `b` of shape `(len(list), stride)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (list), text_signature = "(list)")]
pub fn null<'py>(
    py: Python<'py>, list: &Bound<'py, PyAny>,
) -> PyResult<(f64, Bound<'py, PyArray2<f64>>)> {
    let inputs = extract_light_curves(list)?;
    let outcome = py.allow_threads(|| fit::null(&SfitLibrary, &inputs))?;
    Ok((outcome.chisq, outcome.coefficients.into_pyarray(py)))
}

/// single — fit at the fixed frequency `v`.
///
/// Returns `(chisq, b)` with `b` of shape `(len(list), stride)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (list, v), text_signature = "(list, v)")]
pub fn single<'py>(
    py: Python<'py>, list: &Bound<'py, PyAny>, v: f64,
) -> PyResult<(f64, Bound<'py, PyArray2<f64>>)> {
    let inputs = extract_light_curves(list)?;
    let outcome = py.allow_threads(|| fit::single(&SfitLibrary, &inputs, v))?;
    Ok((outcome.chisq, outcome.coefficients.into_pyarray(py)))
}

/// _rust_sfit — PyO3 module initializer for the Python extension.
///
/// Registers `search`, `null` and `single` on the module.
///
/// Errors
/// ------
/// - `PyErr`
///   If registering a function fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_sfit<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(search, m)?)?;
    m.add_function(wrap_pyfunction!(null, m)?)?;
    m.add_function(wrap_pyfunction!(single, m)?)?;
    Ok(())
}
