//! fit::errors — error surface of the fitting entry points.
//!
//! Purpose
//! -------
//! Collect every way a `search`, `null` or `single` call can fail: batch
//! construction errors bubbled up from [`crate::ingest`], invalid scalar
//! arguments, backend failures, inconsistent routine output, and interrupt
//! handling failures.
//!
//! Key behaviors
//! -------------
//! - Wrap [`BatchError`] transparently via `From`, so `?` works across the
//!   ingest / fit boundary.
//! - Name the routine in every compute error so callers can tell which
//!   operation failed without parsing messages.
//! - Map to Python exceptions under `python-bindings`: batch errors follow
//!   their own mapping, parameter errors become `ValueError`, everything
//!   raised by the backend becomes `RuntimeError`.
//!
//! Conventions
//! -----------
//! - Parameter names in messages match the entry-point argument names
//!   (`pl`, `ph`, `vsamp`, `nthr`, `v`, ...).

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyRuntimeError, PyValueError},
};

use crate::{fit::routine::RoutineKind, ingest::errors::BatchError};

pub type FitResult<T> = Result<T, FitError>;

/// FitError — failures of a fitting entry point.
///
/// Variants
/// --------
/// - `Batch(BatchError)`
///   Ingestion refused the input; the routine was never called.
/// - `InvalidParameter { name, reason }`
///   A scalar argument is out of range (`vsamp <= 0`, an inverted range, ...).
/// - `Compute { routine, reason }`
///   The backend reported failure, or its output could not be packaged.
/// - `CoefficientLayout { row, needed, stride }`
///   A coefficient row is too short for the record's group counts.
/// - `Interrupt { reason }`
///   Default interrupt handling could not be installed or restored.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    Batch(BatchError),
    InvalidParameter { name: &'static str, reason: String },
    Compute { routine: RoutineKind, reason: String },
    CoefficientLayout { row: usize, needed: usize, stride: usize },
    Interrupt { reason: String },
}

impl FitError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        FitError::InvalidParameter { name, reason: reason.into() }
    }

    pub(crate) fn compute(routine: RoutineKind, reason: impl Into<String>) -> Self {
        FitError::Compute { routine, reason: reason.into() }
    }
}

impl From<BatchError> for FitError {
    fn from(err: BatchError) -> Self {
        FitError::Batch(err)
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FitError::Batch(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::Batch(err) => write!(f, "{err}"),
            FitError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{name}': {reason}")
            }
            FitError::Compute { routine, reason } => {
                write!(f, "Computation failed in sfit_{routine}: {reason}")
            }
            FitError::CoefficientLayout { row, needed, stride } => {
                write!(
                    f,
                    "Coefficient row {row} needs at least {needed} values but stride is {stride}"
                )
            }
            FitError::Interrupt { reason } => write!(f, "Interrupt handling failed: {reason}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<FitError> for PyErr {
    fn from(err: FitError) -> PyErr {
        match err {
            FitError::Batch(inner) => inner.into(),
            FitError::InvalidParameter { .. } => PyValueError::new_err(err.to_string()),
            FitError::Compute { .. }
            | FitError::CoefficientLayout { .. }
            | FitError::Interrupt { .. } => PyRuntimeError::new_err(err.to_string()),
        }
    }
}
