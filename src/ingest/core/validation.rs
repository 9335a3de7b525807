//! Shape checks applied to each converted field of a light curve.
//!
//! Purpose
//! -------
//! Centralize the length / dimension rules that tie every field of a light
//! curve to its sample count, so the builder can call one helper per field
//! and report failures uniformly as [`BatchError::Shape`].
//!
//! Key behaviors
//! -------------
//! - [`validate_sample_length`] enforces `len(field) == sample_count` for the
//!   1-D fields (`y`, `wt`, `idc`, `iamp`).
//! - [`external_param_count`] derives `nep` from the rank of the covariate
//!   array and enforces that its sample axis matches.
//!
//! Conventions
//! -----------
//! - Lengths are element counts (`NumericArray::len`), not leading dims, for
//!   the 1-D fields; a rank-0 value counts as one element.
//! - This module performs no allocation and no logging.
use crate::ingest::{
    core::array::NumericArray,
    errors::{ArrayField, BatchError, BatchResult},
};

/// Require `actual == sample_count` for one field of series `index`.
///
/// # Errors
/// - [`BatchError::Shape`] tagged with `field` on mismatch.
pub fn validate_sample_length(
    actual: usize, sample_count: usize, index: usize, field: ArrayField,
) -> BatchResult<()> {
    if actual != sample_count {
        return Err(BatchError::Shape { index, field, expected: sample_count, actual });
    }
    Ok(())
}

/// Number of external-parameter vectors carried by a covariate array.
///
/// Parameters
/// ----------
/// - `ep`: `&NumericArray<f64>`
///   Converted covariate array.
/// - `sample_count`: `usize`
///   Sample count of the owning light curve.
/// - `index`: `usize`
///   Series index for error tagging.
///
/// Returns
/// -------
/// `BatchResult<usize>`
///   - `0` for a rank-0 value (treated as "no external parameters"),
///   - `1` for a rank-1 array whose length is `sample_count`,
///   - `shape[0]` for rank ≥ 2 when `shape[1] == sample_count` and the
///     buffer holds at least `shape[0] × sample_count` elements.
///
/// Errors
/// ------
/// - `BatchError::Shape { field: ExternalParams, .. }`
///   Returned when the sample axis does not match `sample_count`, or when a
///   higher-rank buffer is too short to hold the `nep × n` block (e.g. an
///   empty trailing axis).
///
/// Notes
/// -----
/// - For rank > 2 only the leading `nep × n` elements are read by the
///   fitting routines; the remaining elements are ignored.
pub fn external_param_count(
    ep: &NumericArray<f64>, sample_count: usize, index: usize,
) -> BatchResult<usize> {
    let (nep, samples) = match *ep.shape() {
        [] => return Ok(0),
        [samples] => (1, samples),
        [nep, samples, ..] => (nep, samples),
    };
    validate_sample_length(samples, sample_count, index, ArrayField::ExternalParams)?;

    let block = nep.saturating_mul(sample_count);
    if ep.len() < block {
        return Err(BatchError::Shape {
            index,
            field: ArrayField::ExternalParams,
            expected: block,
            actual: ep.len(),
        });
    }
    Ok(nep)
}
