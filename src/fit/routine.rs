//! fit::routine — seam between the batch layer and the numeric fitting code.
//!
//! Purpose
//! -------
//! Define the contract every periodogram / coefficient fitting backend
//! implements ([`FitRoutine`]) plus the small value types that cross it. The
//! entry points in [`crate::fit::entry`] are written against this trait, so
//! the compiled `libsfit` bindings (feature `sfit`) and in-process test
//! doubles are interchangeable.
//!
//! Key behaviors
//! -------------
//! - `search` writes one statistic and one window-function value per sampled
//!   frequency into caller-allocated buffers of length `ph - pl + 1`.
//! - `null` and `single` return a scalar statistic plus a routine-allocated
//!   coefficient buffer whose row width (`stride`) is only known after the
//!   call completes.
//! - Failures are opaque: implementations report a [`RoutineFailure`] and
//!   the entry points turn it into a compute error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Views handed to a routine are valid only for the duration of the call;
//!   implementations must not retain them.
//! - A well-behaved coefficient buffer holds exactly `nlc × stride` values in
//!   row-major order; entry points verify this and reject anything else.
use crate::ingest::LightCurveView;

/// RoutineKind — which external routine an operation invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    Search,
    Null,
    Single,
}

impl RoutineKind {
    pub fn name(self) -> &'static str {
        match self {
            RoutineKind::Search => "search",
            RoutineKind::Null => "null",
            RoutineKind::Single => "single",
        }
    }
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// RoutineFailure — opaque failure reported by a fitting backend.
///
/// Fields
/// ------
/// - `code`: `Option<i32>`
///   Native status code, when the backend has one.
/// - `reason`: `String`
///   Human-readable description, used only for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineFailure {
    pub code: Option<i32>,
    pub reason: String,
}

impl RoutineFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        RoutineFailure { code: None, reason: reason.into() }
    }

    pub fn with_code(code: i32, reason: impl Into<String>) -> Self {
        RoutineFailure { code: Some(code), reason: reason.into() }
    }
}

impl std::fmt::Display for RoutineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (status {code})", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for RoutineFailure {}

/// SearchRequest — resolved scalar arguments of a periodogram search.
///
/// Fields
/// ------
/// - `pl`, `ph`: `i32`
///   Inclusive frequency-index bounds; frequency `k` is `k × vsamp`.
/// - `vsamp`: `f64`
///   Frequency sampling step (finite, > 0).
/// - `nthr`: `usize`
///   Worker threads the routine may use (≥ 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub pl: i32,
    pub ph: i32,
    pub vsamp: f64,
    pub nthr: usize,
}

impl SearchRequest {
    /// Number of sampled frequencies, `ph - pl + 1` (0 when `ph < pl`).
    pub fn output_len(&self) -> usize {
        usize::try_from(i64::from(self.ph) - i64::from(self.pl) + 1).unwrap_or(0)
    }
}

/// CoefficientBuffer — result of a `null` or `single` fit.
///
/// Fields
/// ------
/// - `chisq`: `f64`
///   Scalar fit statistic.
/// - `values`: `Vec<f64>`
///   Row-major coefficients, one row of `stride` values per light curve.
/// - `stride`: `usize`
///   Row width reported by the routine.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientBuffer {
    pub chisq: f64,
    pub values: Vec<f64>,
    pub stride: usize,
}

/// FitRoutine — backend contract for the three fitting operations.
///
/// Implementations receive borrowed views into a live batch and must not
/// keep them past the call. Every method returns `Err(RoutineFailure)`
/// instead of panicking when the computation cannot complete.
pub trait FitRoutine {
    /// Fill `chisq` and `winfunc` (both of length `request.output_len()`).
    fn search(
        &self, curves: &[LightCurveView<'_>], request: &SearchRequest, chisq: &mut [f64],
        winfunc: &mut [f64],
    ) -> Result<(), RoutineFailure>;

    /// Fit the constant-plus-covariates model without a periodic term.
    fn null(&self, curves: &[LightCurveView<'_>]) -> Result<CoefficientBuffer, RoutineFailure>;

    /// Fit the model at the single frequency `v`.
    fn single(
        &self, curves: &[LightCurveView<'_>], v: f64,
    ) -> Result<CoefficientBuffer, RoutineFailure>;
}

impl<R: FitRoutine + ?Sized> FitRoutine for &R {
    fn search(
        &self, curves: &[LightCurveView<'_>], request: &SearchRequest, chisq: &mut [f64],
        winfunc: &mut [f64],
    ) -> Result<(), RoutineFailure> {
        (**self).search(curves, request, chisq, winfunc)
    }

    fn null(&self, curves: &[LightCurveView<'_>]) -> Result<CoefficientBuffer, RoutineFailure> {
        (**self).null(curves)
    }

    fn single(
        &self, curves: &[LightCurveView<'_>], v: f64,
    ) -> Result<CoefficientBuffer, RoutineFailure> {
        (**self).single(curves, v)
    }
}
