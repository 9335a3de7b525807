//! Light-curve inputs, validated records, and borrowed record views.
//!
//! Purpose
//! -------
//! Describe one light curve at the three stages of ingestion:
//! - [`LightCurveInput`]: the raw positional group `(t, y, wt[, ep[, idc[, iamp]]])`
//!   exactly as the caller supplied it.
//! - [`LightCurveRecord`] + [`RecordHandles`]: the validated counts and the
//!   numeric handles that own the converted buffers.
//! - [`LightCurveView`]: a non-owning view joining a record with slices into
//!   its handles; this is what the fitting routines read.
//!
//! Invariants & assumptions
//! ------------------------
//! - For a record produced by the builder, `time`, `value` and `weight` all
//!   have `sample_count` elements; covariates hold `external_param_count`
//!   rows of `sample_count`; group arrays (when present) have
//!   `sample_count` labels in `0..group_count`.
//! - A view cannot outlive the batch that owns its handles; the borrow
//!   checker enforces what the C wrapper enforced by convention.
use crate::ingest::{
    core::array::{NumericArray, RawArray},
    errors::{BatchError, BatchResult},
};
use ndarray::ArrayView2;

/// LightCurveInput — raw per-series argument group.
///
/// Purpose
/// -------
/// Carry the three required and up to three optional values for one light
/// curve before any conversion. Optional fields set to `None` (or to the
/// [`RawArray::None`] sentinel for the group fields) are absent.
///
/// Fields
/// ------
/// - `time`, `value`, `weight`: required sample vectors.
/// - `external_params`: optional covariates, one row per parameter.
/// - `dc_group`, `amp_group`: optional integer group labels per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurveInput {
    pub time: RawArray,
    pub value: RawArray,
    pub weight: RawArray,
    pub external_params: Option<RawArray>,
    pub dc_group: Option<RawArray>,
    pub amp_group: Option<RawArray>,
}

impl LightCurveInput {
    pub fn new(
        time: impl Into<RawArray>, value: impl Into<RawArray>, weight: impl Into<RawArray>,
    ) -> Self {
        LightCurveInput {
            time: time.into(),
            value: value.into(),
            weight: weight.into(),
            external_params: None,
            dc_group: None,
            amp_group: None,
        }
    }

    pub fn with_external_params(mut self, ep: impl Into<RawArray>) -> Self {
        self.external_params = Some(ep.into());
        self
    }

    pub fn with_dc_group(mut self, idc: impl Into<RawArray>) -> Self {
        self.dc_group = Some(idc.into());
        self
    }

    pub fn with_amp_group(mut self, iamp: impl Into<RawArray>) -> Self {
        self.amp_group = Some(iamp.into());
        self
    }

    /// Decompose a positional group of 3 to 6 values.
    ///
    /// Fields are taken in the order `t, y, wt, ep, idc, iamp`; trailing
    /// optional fields may be omitted.
    ///
    /// # Errors
    /// - [`BatchError::Arity`] when fewer than 3 or more than 6 values are
    ///   supplied.
    pub fn from_positional(fields: Vec<RawArray>, index: usize) -> BatchResult<Self> {
        let count = fields.len();
        if !(3..=6).contains(&count) {
            return Err(BatchError::Arity { index, count });
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or(RawArray::None);
        let (time, value, weight) = (next(), next(), next());
        let optional = |raw: RawArray, position: usize| (position < count).then_some(raw);

        Ok(LightCurveInput {
            time,
            value,
            weight,
            external_params: optional(next(), 3),
            dc_group: optional(next(), 4),
            amp_group: optional(next(), 5),
        })
    }
}

/// LightCurveRecord — validated counts for one light curve.
///
/// Fields
/// ------
/// - `sample_count`: number of observations `n`.
/// - `external_param_count`: number of covariate rows `nep` (0 when absent).
/// - `dc_group_count`: `max(idc) + 1`, or 1 without an explicit array.
/// - `amp_group_count`: `max(iamp) + 1`, or 1 without an explicit array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightCurveRecord {
    pub sample_count: usize,
    pub external_param_count: usize,
    pub dc_group_count: usize,
    pub amp_group_count: usize,
}

/// RecordHandles — the numeric handles backing one record slot.
///
/// Every field starts unpopulated; the builder fills them in order and the
/// batch guard releases whichever ones were populated.
#[derive(Debug, Clone, Default)]
pub struct RecordHandles {
    pub time: Option<NumericArray<f64>>,
    pub value: Option<NumericArray<f64>>,
    pub weight: Option<NumericArray<f64>>,
    pub external_params: Option<NumericArray<f64>>,
    pub dc_group: Option<NumericArray<i32>>,
    pub amp_group: Option<NumericArray<i32>>,
}

impl RecordHandles {
    /// Number of populated handles in this slot.
    pub fn populated(&self) -> usize {
        [
            self.time.is_some(),
            self.value.is_some(),
            self.weight.is_some(),
            self.external_params.is_some(),
            self.dc_group.is_some(),
            self.amp_group.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count()
    }

    /// Drop every populated handle; returns how many were released.
    pub fn release(&mut self) -> usize {
        let released = self.populated();
        *self = RecordHandles::default();
        released
    }
}

/// LightCurveView — borrowed, routine-facing view of one record.
///
/// Slices borrow from the batch's handles. `external_params` is the
/// row-major `nep × n` block; unpopulated handles read as empty slices.
#[derive(Debug, Clone, Copy)]
pub struct LightCurveView<'a> {
    pub record: LightCurveRecord,
    pub time: &'a [f64],
    pub value: &'a [f64],
    pub weight: &'a [f64],
    pub external_params: Option<&'a [f64]>,
    pub dc_group: Option<&'a [i32]>,
    pub amp_group: Option<&'a [i32]>,
}

impl<'a> LightCurveView<'a> {
    pub(crate) fn new(record: &LightCurveRecord, handles: &'a RecordHandles) -> Self {
        let samples =
            |h: &'a Option<NumericArray<f64>>| h.as_ref().map_or(&[][..], |a| a.as_slice());
        let block = record.external_param_count * record.sample_count;
        let external_params = handles
            .external_params
            .as_ref()
            .filter(|_| record.external_param_count > 0)
            .and_then(|ep| ep.as_slice().get(..block));

        LightCurveView {
            record: *record,
            time: samples(&handles.time),
            value: samples(&handles.value),
            weight: samples(&handles.weight),
            external_params,
            dc_group: handles.dc_group.as_ref().map(|a| a.as_slice()),
            amp_group: handles.amp_group.as_ref().map(|a| a.as_slice()),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.record.sample_count
    }

    /// Covariate row `k`, if present.
    pub fn external_param(&self, k: usize) -> Option<&'a [f64]> {
        let n = self.record.sample_count;
        self.external_params.and_then(|ep| ep.get(k * n..(k + 1) * n))
    }

    /// Covariates as an `nep × n` matrix view.
    pub fn external_params_matrix(&self) -> Option<ArrayView2<'a, f64>> {
        let shape = (self.record.external_param_count, self.record.sample_count);
        self.external_params.and_then(|ep| ArrayView2::from_shape(shape, ep).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::errors::ArrayField;

    #[test]
    // Purpose
    // -------
    // Positional decomposition accepts 3 to 6 fields.
    //
    // Given
    // -----
    // - A 3-field group and a 5-field group whose 4th field is `None`.
    //
    // Expect
    // ------
    // - The 3-field group has no optional fields; the 5-field group carries
    //   `ep = Some(None)` and `idc`, but no `iamp`.
    fn from_positional_accepts_three_to_six_fields() {
        let three = vec![
            RawArray::from(vec![1.0]),
            RawArray::from(vec![2.0]),
            RawArray::from(vec![3.0]),
        ];
        let mut five = three.clone();
        five.push(RawArray::None);
        five.push(RawArray::from(vec![0]));

        let a = LightCurveInput::from_positional(three, 0).unwrap();
        let b = LightCurveInput::from_positional(five, 1).unwrap();

        assert_eq!(a.external_params, None);
        assert_eq!(a.dc_group, None);
        assert_eq!(b.external_params, Some(RawArray::None));
        assert_eq!(b.dc_group, Some(RawArray::from(vec![0])));
        assert_eq!(b.amp_group, None);
    }

    #[test]
    // Purpose
    // -------
    // Too few or too many positional fields are arity errors.
    //
    // Given
    // -----
    // - Groups of 2 and 7 fields.
    //
    // Expect
    // ------
    // - `BatchError::Arity` with the offending count.
    fn from_positional_rejects_bad_arity() {
        let two = vec![RawArray::from(1.0); 2];
        let seven = vec![RawArray::from(1.0); 7];

        assert_eq!(
            LightCurveInput::from_positional(two, 3).unwrap_err(),
            BatchError::Arity { index: 3, count: 2 }
        );
        assert_eq!(
            LightCurveInput::from_positional(seven, 0).unwrap_err(),
            BatchError::Arity { index: 0, count: 7 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Releasing a slot drops exactly the populated handles.
    //
    // Given
    // -----
    // - A slot with `time` and `dc_group` populated.
    //
    // Expect
    // ------
    // - `populated() == 2`; `release()` returns 2, then 0.
    fn record_handles_release_counts_populated_fields() {
        let mut slot = RecordHandles::default();
        slot.time = Some(
            NumericArray::from_raw(&RawArray::from(vec![1.0, 2.0]), 0, ArrayField::Time).unwrap(),
        );
        slot.dc_group = Some(
            NumericArray::from_raw(&RawArray::from(vec![0, 1]), 0, ArrayField::DcGroup).unwrap(),
        );

        assert_eq!(slot.populated(), 2);
        assert_eq!(slot.release(), 2);
        assert_eq!(slot.release(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Covariate rows are exposed row by row and as a matrix.
    //
    // Given
    // -----
    // - A 2-sample record with a 2×2 covariate block `[[1, 2], [3, 4]]`.
    //
    // Expect
    // ------
    // - Row 1 is `[3, 4]`, row 2 is absent, and the matrix view is 2×2.
    fn view_exposes_external_param_rows() {
        let record = LightCurveRecord {
            sample_count: 2,
            external_param_count: 2,
            dc_group_count: 1,
            amp_group_count: 1,
        };
        let handles = RecordHandles {
            external_params: Some(
                NumericArray::from_raw(
                    &RawArray::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
                    0,
                    ArrayField::ExternalParams,
                )
                .unwrap(),
            ),
            ..RecordHandles::default()
        };

        let view = LightCurveView::new(&record, &handles);

        assert_eq!(view.external_param(1), Some(&[3.0, 4.0][..]));
        assert_eq!(view.external_param(2), None);
        assert_eq!(view.external_params_matrix().unwrap().dim(), (2, 2));
        assert!(view.time.is_empty());
    }
}
