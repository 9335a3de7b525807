//! Numeric array handles — coerce arbitrary inputs into owned, contiguous buffers.
//!
//! Purpose
//! -------
//! Turn caller-supplied values ([`RawArray`]) into reference-counted,
//! C-contiguous buffers of a required element kind ([`NumericArray<T>`]).
//! Downstream code reads sample vectors only through these handles, so every
//! slice it sees is contiguous and outlives nothing but its handle.
//!
//! Key behaviors
//! -------------
//! - Share the caller's buffer (reference count + 1) when it already has the
//!   required kind and standard layout; copy otherwise.
//! - Best-effort cast between numeric kinds: integers widen to `f64`, floats
//!   truncate toward zero when an `i32` is required.
//! - Refuse values that are not array-like (the none sentinel, unsupported
//!   values, ragged nested rows) and values the target kind cannot represent
//!   (NaN / ±∞ / out-of-range when casting to `i32`).
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed handle never changes its element count, shape or kind.
//! - The buffer behind a handle is always in standard (row-major) layout, so
//!   [`NumericArray::as_slice`] covers every element.
//!
//! Conventions
//! -----------
//! - Scalars become rank-0 arrays with one element; flat sequences rank 1;
//!   nested rows rank 2 (`rows × columns`).
//! - Element kinds are `f64` for sample / covariate data and `i32` for group
//!   indices, matching the C `double` / `int` of the fitting routines.
use crate::ingest::errors::{ArrayField, BatchError, BatchResult};
use ndarray::{Array1, ArrayD, ArrayViewD, IxDyn};
use num_traits::NumCast;
use std::sync::Arc;

/// ElementKind — element type required of a numeric handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `f64` samples, weights and covariates.
    Float64,
    /// `i32` group indices.
    Int32,
}

/// RawArray — a caller-supplied value that may be interpreted as an array.
///
/// Purpose
/// -------
/// Model the heterogeneous values a light-curve input may carry before any
/// validation has happened. Shared variants hold an `Arc` so that an input of
/// the right kind can be retained by a handle without copying.
///
/// Variants
/// --------
/// - `Float64`, `Float32`, `Int64`, `Int32`
///   Shared n-dimensional arrays of the given element type.
/// - `Scalar(f64)`
///   A single number (rank 0).
/// - `Sequence(Vec<f64>)`
///   A flat list of numbers (rank 1).
/// - `Rows(Vec<Vec<f64>>)`
///   Nested lists (rank 2); every row must have the same length.
/// - `None`
///   The "no value" sentinel. Optional fields treat it as absent.
/// - `Unsupported { type_name }`
///   A value with no numeric interpretation; only its type is retained for
///   diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArray {
    Float64(Arc<ArrayD<f64>>),
    Float32(Arc<ArrayD<f32>>),
    Int64(Arc<ArrayD<i64>>),
    Int32(Arc<ArrayD<i32>>),
    Scalar(f64),
    Sequence(Vec<f64>),
    Rows(Vec<Vec<f64>>),
    None,
    Unsupported { type_name: String },
}

impl RawArray {
    /// Whether this is the "no value" sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, RawArray::None)
    }
}

impl From<Vec<f64>> for RawArray {
    fn from(values: Vec<f64>) -> Self {
        RawArray::Sequence(values)
    }
}

impl From<Vec<Vec<f64>>> for RawArray {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        RawArray::Rows(rows)
    }
}

impl From<Vec<i32>> for RawArray {
    fn from(values: Vec<i32>) -> Self {
        RawArray::Int32(Arc::new(Array1::from(values).into_dyn()))
    }
}

impl From<f64> for RawArray {
    fn from(value: f64) -> Self {
        RawArray::Scalar(value)
    }
}

impl From<ArrayD<f64>> for RawArray {
    fn from(arr: ArrayD<f64>) -> Self {
        RawArray::Float64(Arc::new(arr))
    }
}

impl From<Arc<ArrayD<f64>>> for RawArray {
    fn from(arr: Arc<ArrayD<f64>>) -> Self {
        RawArray::Float64(arr)
    }
}

impl From<ArrayD<i32>> for RawArray {
    fn from(arr: ArrayD<i32>) -> Self {
        RawArray::Int32(Arc::new(arr))
    }
}

impl From<ArrayD<i64>> for RawArray {
    fn from(arr: ArrayD<i64>) -> Self {
        RawArray::Int64(Arc::new(arr))
    }
}

impl From<ArrayD<f32>> for RawArray {
    fn from(arr: ArrayD<f32>) -> Self {
        RawArray::Float32(Arc::new(arr))
    }
}

/// Element types a [`NumericArray`] may hold.
///
/// `shared` returns the caller's buffer when it already has this element
/// type, so [`NumericArray::from_raw`] can retain it instead of copying.
pub trait Element: Copy + NumCast + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    const KIND: ElementKind;

    fn shared(raw: &RawArray) -> Option<&Arc<ArrayD<Self>>>;
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::Float64;

    fn shared(raw: &RawArray) -> Option<&Arc<ArrayD<f64>>> {
        match raw {
            RawArray::Float64(arr) => Some(arr),
            _ => None,
        }
    }
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int32;

    fn shared(raw: &RawArray) -> Option<&Arc<ArrayD<i32>>> {
        match raw {
            RawArray::Int32(arr) => Some(arr),
            _ => None,
        }
    }
}

const NOT_ARRAY_LIKE: &str = "value is not array-like";
const NONE_VALUE: &str = "value is None";
const RAGGED: &str = "nested sequence has rows of different lengths";
const UNREPRESENTABLE: &str = "value cannot be represented in the required element kind";

/// NumericArray — reference-counted, contiguous buffer of one element kind.
///
/// Purpose
/// -------
/// Own (or co-own) the converted buffer for one field of one light curve for
/// as long as the batch needs it. Records never hold their own copies; they
/// borrow slices from these handles.
///
/// Fields
/// ------
/// - `data`: `Arc<ArrayD<T>>`
///   Standard-layout array; shared with the caller when no conversion was
///   needed.
///
/// Invariants
/// ----------
/// - `data.is_standard_layout()` holds for every constructed handle.
/// - Cloning a handle bumps the reference count; dropping releases it.
#[derive(Debug, Clone)]
pub struct NumericArray<T: Element> {
    data: Arc<ArrayD<T>>,
}

impl<T: Element> NumericArray<T> {
    /// Convert a raw input value into a handle of element kind `T`.
    ///
    /// Parameters
    /// ----------
    /// - `raw`: `&RawArray`
    ///   Value to interpret.
    /// - `index`, `field`
    ///   Position of the value inside the batch; used only for error tagging.
    ///
    /// Returns
    /// -------
    /// `BatchResult<NumericArray<T>>`
    ///   A handle sharing `raw`'s buffer when kind and layout already match,
    ///   otherwise a handle over a freshly cast copy.
    ///
    /// Errors
    /// ------
    /// - `BatchError::Conversion`
    ///   Returned when `raw` is `None`, unsupported, ragged, or holds a value
    ///   that `T` cannot represent.
    pub fn from_raw(raw: &RawArray, index: usize, field: ArrayField) -> BatchResult<Self> {
        let fail = |reason: &'static str| BatchError::Conversion { index, field, reason };

        if let Some(arr) = T::shared(raw) {
            if arr.is_standard_layout() {
                return Ok(NumericArray { data: Arc::clone(arr) });
            }
        }

        let converted = match raw {
            RawArray::Float64(arr) => cast_array(arr),
            RawArray::Float32(arr) => cast_array(arr),
            RawArray::Int64(arr) => cast_array(arr),
            RawArray::Int32(arr) => cast_array(arr),
            RawArray::Scalar(value) => {
                <T as NumCast>::from(*value).map(|v| ArrayD::from_elem(IxDyn(&[]), v))
            }
            RawArray::Sequence(values) => cast_vec(values, &[values.len()]),
            RawArray::Rows(rows) => {
                let ncols = rows.first().map_or(0, Vec::len);
                if rows.iter().any(|row| row.len() != ncols) {
                    return Err(fail(RAGGED));
                }
                let flat: Vec<f64> = rows.iter().flatten().copied().collect();
                if rows.is_empty() {
                    cast_vec(&flat, &[0])
                } else {
                    cast_vec(&flat, &[rows.len(), ncols])
                }
            }
            RawArray::None => return Err(fail(NONE_VALUE)),
            RawArray::Unsupported { .. } => return Err(fail(NOT_ARRAY_LIKE)),
        };

        converted
            .map(|arr| NumericArray { data: Arc::new(arr) })
            .ok_or_else(|| fail(UNREPRESENTABLE))
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of dimensions (0 for scalars).
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn kind(&self) -> ElementKind {
        T::KIND
    }

    /// Contiguous view of every element in row-major order.
    pub fn as_slice(&self) -> &[T] {
        // Standard layout is established in `from_raw`.
        self.data.as_slice().unwrap_or(&[])
    }

    /// Stable pointer to the first element, valid while `self` is alive.
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn view(&self) -> ArrayViewD<'_, T> {
        self.data.view()
    }

    /// Whether this handle retains exactly `arr` (no copy was made).
    pub fn shares(&self, arr: &Arc<ArrayD<T>>) -> bool {
        Arc::ptr_eq(&self.data, arr)
    }
}

fn cast_array<S, T>(src: &ArrayD<S>) -> Option<ArrayD<T>>
where
    S: Copy + NumCast,
    T: Element,
{
    let mut out = Vec::with_capacity(src.len());
    for &value in src.iter() {
        out.push(<T as NumCast>::from(value)?);
    }
    ArrayD::from_shape_vec(src.raw_dim(), out).ok()
}

fn cast_vec<T: Element>(src: &[f64], shape: &[usize]) -> Option<ArrayD<T>> {
    let out = src.iter().map(|&value| <T as NumCast>::from(value)).collect::<Option<Vec<T>>>()?;
    ArrayD::from_shape_vec(IxDyn(shape), out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, ArrayD, IxDyn};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sharing vs copying behavior of `NumericArray::from_raw`.
    // - Kind casts (int → float, float → int) and their failure cases.
    // - Rank inference for scalars, sequences and nested rows.
    //
    // They intentionally DO NOT cover:
    // - Shape validation against a sample count (see `validation`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A matching-kind, standard-layout input is shared, not copied.
    //
    // Given
    // -----
    // - An `Arc<ArrayD<f64>>` of length 3 wrapped in `RawArray::Float64`.
    //
    // Expect
    // ------
    // - The handle shares the same allocation and bumps the strong count;
    //   dropping the handle restores it.
    fn from_raw_shares_matching_kind_buffer() {
        let arr = Arc::new(ArrayD::from_shape_vec(IxDyn(&[3]), vec![1.0, 2.0, 3.0]).unwrap());
        let raw = RawArray::Float64(Arc::clone(&arr));
        assert_eq!(Arc::strong_count(&arr), 2);

        let handle = NumericArray::<f64>::from_raw(&raw, 0, ArrayField::Time).unwrap();

        assert!(handle.shares(&arr));
        assert_eq!(Arc::strong_count(&arr), 3);
        drop(handle);
        assert_eq!(Arc::strong_count(&arr), 2);
    }

    #[test]
    // Purpose
    // -------
    // A non-standard layout is copied into row-major order.
    //
    // Given
    // -----
    // - A 2×3 array transposed to 3×2 (Fortran-ordered strides).
    //
    // Expect
    // ------
    // - The handle does not share the input, has shape [3, 2] and its slice
    //   lists elements in logical row-major order.
    fn from_raw_copies_non_standard_layout() {
        let base = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let transposed = Arc::new(base.reversed_axes().into_dyn());
        let raw = RawArray::Float64(Arc::clone(&transposed));

        let handle = NumericArray::<f64>::from_raw(&raw, 0, ArrayField::ExternalParams).unwrap();

        assert!(!handle.shares(&transposed));
        assert_eq!(handle.shape(), &[3, 2]);
        assert_eq!(handle.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    // Purpose
    // -------
    // Integer inputs widen to f64 and float inputs truncate to i32.
    //
    // Given
    // -----
    // - An i64 array [1, 2] requested as f64.
    // - A float sequence [0.0, 1.9, -0.5] requested as i32.
    //
    // Expect
    // ------
    // - [1.0, 2.0] and [0, 1, 0] respectively, with the right element kind.
    fn from_raw_casts_between_kinds() {
        let ints = RawArray::from(ArrayD::from_shape_vec(IxDyn(&[2]), vec![1_i64, 2]).unwrap());
        let floats = RawArray::from(vec![0.0, 1.9, -0.5]);

        let as_f64 = NumericArray::<f64>::from_raw(&ints, 0, ArrayField::Time).unwrap();
        let as_i32 = NumericArray::<i32>::from_raw(&floats, 0, ArrayField::DcGroup).unwrap();

        assert_eq!(as_f64.as_slice(), &[1.0, 2.0]);
        assert_eq!(as_f64.kind(), ElementKind::Float64);
        assert_eq!(as_i32.as_slice(), &[0, 1, 0]);
        assert_eq!(as_i32.kind(), ElementKind::Int32);
    }

    #[test]
    // Purpose
    // -------
    // Casting a NaN to an integer kind is a conversion error.
    //
    // Given
    // -----
    // - Sequence [0.0, NaN] requested as i32 for field `idc` at index 4.
    //
    // Expect
    // ------
    // - `BatchError::Conversion { index: 4, field: DcGroup, .. }`.
    fn from_raw_rejects_unrepresentable_values() {
        let raw = RawArray::from(vec![0.0, f64::NAN]);

        let err = NumericArray::<i32>::from_raw(&raw, 4, ArrayField::DcGroup).unwrap_err();

        match err {
            BatchError::Conversion { index, field, .. } => {
                assert_eq!(index, 4);
                assert_eq!(field, ArrayField::DcGroup);
            }
            other => panic!("expected Conversion, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Values that are not array-like are refused.
    //
    // Given
    // -----
    // - The none sentinel, an unsupported value and ragged nested rows.
    //
    // Expect
    // ------
    // - Each returns `BatchError::Conversion`.
    fn from_raw_rejects_non_array_like_values() {
        let cases = vec![
            RawArray::None,
            RawArray::Unsupported { type_name: "dict".to_string() },
            RawArray::Rows(vec![vec![1.0, 2.0], vec![3.0]]),
        ];

        for raw in cases {
            let result = NumericArray::<f64>::from_raw(&raw, 0, ArrayField::Value);
            assert!(
                matches!(result, Err(BatchError::Conversion { .. })),
                "expected Conversion for {raw:?}, got {result:?}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Rank follows the input form.
    //
    // Given
    // -----
    // - A scalar, a flat sequence of 3 and 2 nested rows of 3.
    //
    // Expect
    // ------
    // - Ranks 0, 1, 2; the scalar has one element; rows give shape [2, 3].
    fn from_raw_infers_rank_from_input_form() {
        let scalar =
            NumericArray::<f64>::from_raw(&RawArray::from(2.5), 0, ArrayField::ExternalParams)
                .unwrap();
        let seq = NumericArray::<f64>::from_raw(
            &RawArray::from(vec![1.0, 2.0, 3.0]),
            0,
            ArrayField::Time,
        )
        .unwrap();
        let rows = NumericArray::<f64>::from_raw(
            &RawArray::from(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]),
            0,
            ArrayField::ExternalParams,
        )
        .unwrap();

        assert_eq!(scalar.ndim(), 0);
        assert_eq!(scalar.len(), 1);
        assert_eq!(seq.ndim(), 1);
        assert_eq!(rows.ndim(), 2);
        assert_eq!(rows.shape(), &[2, 3]);
    }
}
