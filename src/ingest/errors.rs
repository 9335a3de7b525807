//! ingest::errors — error surface for light-curve batch construction.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used while converting raw inputs
//! into numeric handles and assembling them into a validated batch, together
//! with the conversion to Python exceptions used by the bindings.
//!
//! Key behaviors
//! -------------
//! - Tag every per-series failure with the series index and the offending
//!   field ([`ArrayField`]) so callers can locate the bad input.
//! - Keep shape failures distinguishable from conversion failures: shape
//!   errors map to `IndexError` and conversion errors to `TypeError` at the
//!   Python boundary.
//!
//! Conventions
//! -----------
//! - Series indices are 0-based positions in the input sequence.
//! - Field tags follow the short names used by the fitting routines:
//!   `t`, `y`, `wt`, `ep`, `idc`, `iamp`.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed the field tag and the
//!   offending lengths / values.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyIndexError, PyMemoryError, PyTypeError, PyValueError},
};

/// Result alias for batch ingestion.
pub type BatchResult<T> = Result<T, BatchError>;

/// ArrayField — which positional field of a light-curve input failed.
///
/// Variants
/// --------
/// - `Time`, `Value`, `Weight`
///   The three required sample vectors (`t`, `y`, `wt`).
/// - `ExternalParams`
///   Optional covariate vectors (`ep`).
/// - `DcGroup`, `AmpGroup`
///   Optional integer group-index arrays (`idc`, `iamp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayField {
    Time,
    Value,
    Weight,
    ExternalParams,
    DcGroup,
    AmpGroup,
}

impl ArrayField {
    /// Short tag used in messages, matching the routine argument names.
    pub fn tag(self) -> &'static str {
        match self {
            ArrayField::Time => "t",
            ArrayField::Value => "y",
            ArrayField::Weight => "wt",
            ArrayField::ExternalParams => "ep",
            ArrayField::DcGroup => "idc",
            ArrayField::AmpGroup => "iamp",
        }
    }
}

impl std::fmt::Display for ArrayField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// BatchError — validation and resource failures during batch construction.
///
/// Purpose
/// -------
/// Represent every way `build_batch` can refuse an input sequence. Any of
/// these aborts the whole build; the batch guard has already released all
/// captured handles by the time the error reaches the caller.
///
/// Variants
/// --------
/// - `Conversion { index, field, reason }`
///   The value is not array-like or cannot be cast to the required kind.
/// - `Shape { index, field, expected, actual }`
///   A length / dimension does not match the series' sample count.
/// - `Arity { index, count }`
///   A positional input group did not carry between 3 and 6 fields.
/// - `InvalidGroupIndex { index, field, position, value }`
///   A group-index array contains a negative label.
/// - `Allocation { what, requested }`
///   Backing storage for the batch could not be reserved.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    Conversion { index: usize, field: ArrayField, reason: &'static str },
    Shape { index: usize, field: ArrayField, expected: usize, actual: usize },
    Arity { index: usize, count: usize },
    InvalidGroupIndex { index: usize, field: ArrayField, position: usize, value: i32 },
    Allocation { what: &'static str, requested: usize },
}

impl BatchError {
    /// Field tag for per-field errors, `None` for batch-level failures.
    pub fn field(&self) -> Option<ArrayField> {
        match self {
            BatchError::Conversion { field, .. }
            | BatchError::Shape { field, .. }
            | BatchError::InvalidGroupIndex { field, .. } => Some(*field),
            BatchError::Arity { .. } | BatchError::Allocation { .. } => None,
        }
    }
}

impl std::error::Error for BatchError {}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Conversion { index, field, reason } => {
                write!(f, "Light curve {index}: array '{field}' could not be converted: {reason}")
            }
            BatchError::Shape { index, field, expected, actual } => {
                write!(
                    f,
                    "Light curve {index}: array '{field}' is not same length as 't' \
                     (expected {expected}, got {actual})"
                )
            }
            BatchError::Arity { index, count } => {
                write!(
                    f,
                    "Light curve {index}: expected (t, y, wt[, ep[, idc[, iamp]]]), \
                     got {count} fields"
                )
            }
            BatchError::InvalidGroupIndex { index, field, position, value } => {
                write!(
                    f,
                    "Light curve {index}: array '{field}' has negative group index {value} \
                     at position {position}"
                )
            }
            BatchError::Allocation { what, requested } => {
                write!(f, "Could not allocate {what} ({requested} entries)")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<BatchError> for PyErr {
    fn from(err: BatchError) -> PyErr {
        match err {
            BatchError::Shape { .. } => PyIndexError::new_err(err.to_string()),
            BatchError::Conversion { .. } | BatchError::Arity { .. } => {
                PyTypeError::new_err(err.to_string())
            }
            BatchError::InvalidGroupIndex { .. } => PyValueError::new_err(err.to_string()),
            BatchError::Allocation { .. } => PyMemoryError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Field tags and `Display` payload embedding for `BatchError`.
    //
    // They intentionally DO NOT cover:
    // - The `PyErr` conversion, which needs the Python C API.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Field tags match the routine argument names.
    //
    // Given
    // -----
    // - Every `ArrayField` variant.
    //
    // Expect
    // ------
    // - Tags are `t`, `y`, `wt`, `ep`, `idc`, `iamp` in order.
    fn array_field_tags_match_argument_names() {
        let tags: Vec<&str> = [
            ArrayField::Time,
            ArrayField::Value,
            ArrayField::Weight,
            ArrayField::ExternalParams,
            ArrayField::DcGroup,
            ArrayField::AmpGroup,
        ]
        .iter()
        .map(|f| f.tag())
        .collect();

        assert_eq!(tags, vec!["t", "y", "wt", "ep", "idc", "iamp"]);
    }

    #[test]
    // Purpose
    // -------
    // Shape errors name the field and both lengths.
    //
    // Given
    // -----
    // - `BatchError::Shape` for `y` at index 2 with expected 3, actual 4.
    //
    // Expect
    // ------
    // - The message contains `'y'`, `3` and `4`; `field()` returns `Value`.
    fn shape_error_display_embeds_field_and_lengths() {
        let err = BatchError::Shape { index: 2, field: ArrayField::Value, expected: 3, actual: 4 };

        let msg = err.to_string();

        assert!(msg.contains("'y'"), "message should name the field.\nGot: {msg}");
        assert!(
            msg.contains('3') && msg.contains('4'),
            "message should carry lengths.\nGot: {msg}"
        );
        assert_eq!(err.field(), Some(ArrayField::Value));
    }

    #[test]
    // Purpose
    // -------
    // Batch-level errors carry no field tag.
    //
    // Given
    // -----
    // - An allocation failure and an arity failure.
    //
    // Expect
    // ------
    // - `field()` is `None` for both.
    fn batch_level_errors_have_no_field() {
        assert_eq!(BatchError::Allocation { what: "records", requested: 8 }.field(), None);
        assert_eq!(BatchError::Arity { index: 0, count: 2 }.field(), None);
    }
}
