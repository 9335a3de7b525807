//! fit::entry — `search`, `null` and `single` over a batch of light curves.
//!
//! Purpose
//! -------
//! Orchestrate one fitting call end to end: build the batch, call the
//! backend routine with borrowed views, release the batch, and package the
//! routine's flat buffers into owned result arrays.
//!
//! Key behaviors
//! -------------
//! - Batch construction runs first. If it fails, the routine is not called
//!   and no output storage is allocated.
//! - The batch is released as soon as the routine returns, whether it
//!   succeeded or not.
//! - A routine failure becomes [`FitError::Compute`] naming the routine; any
//!   output storage allocated for the call is dropped.
//! - Coefficient buffers are checked against `nlc × stride` before they are
//!   shaped into a matrix; anything else is a compute error.
//!
//! Conventions
//! -----------
//! - Log records go through the `log` facade under this module's target:
//!   `debug` for call sizes, `warn` for backend failures. Nothing is logged
//!   on the ingest path itself.
use log::{debug, warn};
use ndarray::{Array1, Array2};

use crate::{
    fit::{
        errors::{FitError, FitResult},
        interrupt::InterruptScope,
        outcome::{FitOutcome, SearchOutcome},
        params::{SearchParams, validate_frequency},
        routine::{CoefficientBuffer, FitRoutine, RoutineFailure, RoutineKind},
    },
    ingest::{BatchError, LightCurveInput, LightCurveView, build_batch},
};

/// Periodogram search over a batch of light curves.
///
/// Parameters
/// ----------
/// - `routine`: `&R`
///   Backend implementing [`FitRoutine`].
/// - `inputs`: `&[LightCurveInput]`
///   Light curves to fit jointly; may be empty.
/// - `params`: `&SearchParams`
///   Validated frequency range, sampling step and thread policy.
///
/// Returns
/// -------
/// `FitResult<SearchOutcome>`
///   Periodogram and window function, each of length `ph - pl + 1`.
///
/// Errors
/// ------
/// - `FitError::Batch`
///   The inputs did not form a valid batch.
/// - `FitError::Interrupt`
///   Default SIGINT handling could not be installed or restored.
/// - `FitError::Compute { routine: Search, .. }`
///   The backend reported failure.
pub fn search<R: FitRoutine + ?Sized>(
    routine: &R, inputs: &[LightCurveInput], params: &SearchParams,
) -> FitResult<SearchOutcome> {
    let mut batch = build_batch(inputs)?;
    let request = params.request();
    let len = request.output_len();
    debug!(
        "search: {} light curves, {len} frequencies from index {}, {} threads",
        batch.len(),
        request.pl,
        request.nthr
    );

    let mut chisq = zeroed_output(len, "periodogram values")?;
    let mut winfunc = zeroed_output(len, "window function values")?;

    let status = {
        let mut scope =
            if params.default_interrupts { Some(InterruptScope::install()?) } else { None };
        let views = batch.views();
        let status = routine.search(&views, &request, &mut chisq, &mut winfunc);
        if let Some(scope) = scope.as_mut() {
            scope.restore()?;
        }
        status
    };
    batch.release();

    status.map_err(|failure| routine_failed(RoutineKind::Search, failure))?;
    Ok(SearchOutcome { chisq: Array1::from_vec(chisq), winfunc: Array1::from_vec(winfunc) })
}

/// Null-hypothesis fit (no periodic term) over a batch of light curves.
///
/// Returns the scalar statistic and an `(nlc, stride)` coefficient matrix
/// whose row width is reported by the routine.
///
/// # Errors
/// - [`FitError::Batch`] when the inputs do not form a valid batch.
/// - [`FitError::Compute`] when the routine fails or returns a buffer whose
///   length is not `nlc × stride`.
pub fn null<R: FitRoutine + ?Sized>(
    routine: &R, inputs: &[LightCurveInput],
) -> FitResult<FitOutcome> {
    fit_coefficients(RoutineKind::Null, inputs, |views| routine.null(views))
}

/// Fit at the single fixed frequency `v`.
///
/// # Errors
/// - [`FitError::InvalidParameter`] when `v` is not finite.
/// - Otherwise as [`null`].
pub fn single<R: FitRoutine + ?Sized>(
    routine: &R, inputs: &[LightCurveInput], v: f64,
) -> FitResult<FitOutcome> {
    let v = validate_frequency(v)?;
    fit_coefficients(RoutineKind::Single, inputs, |views| routine.single(views, v))
}

fn fit_coefficients<F>(
    kind: RoutineKind, inputs: &[LightCurveInput], call: F,
) -> FitResult<FitOutcome>
where
    F: FnOnce(&[LightCurveView<'_>]) -> Result<CoefficientBuffer, RoutineFailure>,
{
    let mut batch = build_batch(inputs)?;
    let nlc = batch.len();
    debug!("{kind}: {nlc} light curves");

    let status = call(&batch.views());
    batch.release();

    let buffer = status.map_err(|failure| routine_failed(kind, failure))?;
    coefficient_matrix(kind, nlc, buffer)
}

fn coefficient_matrix(
    kind: RoutineKind, nlc: usize, buffer: CoefficientBuffer,
) -> FitResult<FitOutcome> {
    let CoefficientBuffer { chisq, values, stride } = buffer;
    let expected = nlc.checked_mul(stride);
    if expected != Some(values.len()) {
        let held = values.len();
        warn!("{kind}: coefficient buffer holds {held} values for {nlc} rows of {stride}");
        return Err(FitError::compute(
            kind,
            format!(
                "coefficient buffer holds {} values, expected {nlc} rows of {stride}",
                values.len()
            ),
        ));
    }

    let coefficients = Array2::from_shape_vec((nlc, stride), values)
        .map_err(|err| FitError::compute(kind, err.to_string()))?;
    Ok(FitOutcome { chisq, coefficients })
}

fn zeroed_output(len: usize, what: &'static str) -> FitResult<Vec<f64>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| BatchError::Allocation { what, requested: len })?;
    out.resize(len, 0.0);
    Ok(out)
}

fn routine_failed(kind: RoutineKind, failure: RoutineFailure) -> FitError {
    warn!("sfit_{kind} failed: {failure}");
    FitError::compute(kind, failure.to_string())
}
