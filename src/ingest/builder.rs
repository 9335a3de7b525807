//! Batch builder — all-or-nothing conversion of light-curve inputs.
//!
//! Purpose
//! -------
//! Turn an ordered sequence of [`LightCurveInput`] values into a [`Batch`]:
//! convert every field into a numeric handle, validate shapes against each
//! series' sample count, infer DC / amplitude group counts, and keep all
//! handles alive in a [`BatchGuard`] for as long as the batch lives.
//!
//! Key behaviors
//! -------------
//! - Processes inputs strictly in order; `batch.len() == inputs.len()` and
//!   record `i` describes input `i`.
//! - Any failure at any index releases everything captured so far (earlier
//!   records, the partially filled slot, the record array) before the error
//!   is returned. There is no partial success.
//! - An empty input sequence yields an empty batch.
//!
//! Conventions
//! -----------
//! - Optional fields set to `None` / [`RawArray::None`] are absent. A rank-0
//!   covariate value is also treated as absent and not retained.
//! - Group labels are never renumbered here; see
//!   [`compact_labels`](crate::ingest::core::groups::compact_labels) for an
//!   explicit remapping.
use crate::ingest::{
    core::{
        array::{NumericArray, RawArray},
        groups::group_count,
        guard::BatchGuard,
        record::{LightCurveInput, LightCurveRecord, LightCurveView, RecordHandles},
        validation::{external_param_count, validate_sample_length},
    },
    errors::{ArrayField, BatchResult},
};

/// Batch — validated light curves plus the handles that back them.
///
/// Purpose
/// -------
/// Own one call's worth of validated light curves. Records and handles live
/// in a [`BatchGuard`]; [`Batch::views`] lends routine-facing views whose
/// lifetime is tied to the batch.
///
/// Invariants
/// ----------
/// - `records().len() == slots().len() == number of inputs`, in input order.
/// - Every record satisfies the invariants documented on
///   [`LightCurveRecord`].
///
/// Notes
/// -----
/// - [`Batch::release`] may be called explicitly (entry points do so right
///   after the routine returns); dropping the batch releases it as well.
#[derive(Debug)]
pub struct Batch {
    guard: BatchGuard,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.guard.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> &[LightCurveRecord] {
        self.guard.records()
    }

    pub fn handles(&self) -> &[RecordHandles] {
        self.guard.slots()
    }

    /// View of record `index`, if it exists.
    pub fn view(&self, index: usize) -> Option<LightCurveView<'_>> {
        let record = self.guard.records().get(index)?;
        let handles = self.guard.slots().get(index)?;
        Some(LightCurveView::new(record, handles))
    }

    /// Views of every record, in input order.
    pub fn views(&self) -> Vec<LightCurveView<'_>> {
        self.guard
            .records()
            .iter()
            .zip(self.guard.slots())
            .map(|(record, handles)| LightCurveView::new(record, handles))
            .collect()
    }

    /// Release every handle and the record array; idempotent.
    pub fn release(&mut self) -> usize {
        self.guard.release()
    }

    pub fn is_released(&self) -> bool {
        self.guard.is_released()
    }
}

/// Build a validated batch from an ordered sequence of light-curve inputs.
///
/// Parameters
/// ----------
/// - `inputs`: `&[LightCurveInput]`
///   One entry per light curve; may be empty.
///
/// Returns
/// -------
/// `BatchResult<Batch>`
///   A batch with one record per input, in input order.
///
/// Errors
/// ------
/// - `BatchError::Allocation`
///   Record or slot storage could not be reserved.
/// - `BatchError::Conversion`
///   A field is not array-like or cannot be cast to its required kind.
/// - `BatchError::Shape`
///   `y`, `wt`, `ep`, `idc` or `iamp` does not match the sample count of `t`.
/// - `BatchError::InvalidGroupIndex`
///   A group array contains a negative label.
///
/// Notes
/// -----
/// - On error, every handle captured so far has been released before this
///   function returns.
///
/// Examples
/// --------
/// ```rust
/// # use rust_sfit::ingest::{build_batch, LightCurveInput};
/// let batch = build_batch(&[LightCurveInput::new(
///     vec![1.0, 2.0, 3.0],
///     vec![1.0, 2.0, 3.0],
///     vec![1.0, 1.0, 1.0],
/// )])
/// .unwrap();
/// assert_eq!(batch.len(), 1);
/// assert_eq!(batch.records()[0].sample_count, 3);
/// assert_eq!(batch.records()[0].dc_group_count, 1);
/// ```
pub fn build_batch(inputs: &[LightCurveInput]) -> BatchResult<Batch> {
    let mut guard = BatchGuard::with_capacity(inputs.len())?;

    for (index, input) in inputs.iter().enumerate() {
        if let Err(err) = ingest_light_curve(&mut guard, index, input) {
            guard.release();
            return Err(err);
        }
    }

    Ok(Batch { guard })
}

fn ingest_light_curve(
    guard: &mut BatchGuard, index: usize, input: &LightCurveInput,
) -> BatchResult<()> {
    let slot = guard.open_slot();

    let time = slot.time.insert(NumericArray::from_raw(&input.time, index, ArrayField::Time)?);
    let sample_count = time.len();

    let value = slot.value.insert(NumericArray::from_raw(&input.value, index, ArrayField::Value)?);
    validate_sample_length(value.len(), sample_count, index, ArrayField::Value)?;

    let weight =
        slot.weight.insert(NumericArray::from_raw(&input.weight, index, ArrayField::Weight)?);
    validate_sample_length(weight.len(), sample_count, index, ArrayField::Weight)?;

    let nep = match present(&input.external_params) {
        Some(raw) => {
            let ep = slot
                .external_params
                .insert(NumericArray::from_raw(raw, index, ArrayField::ExternalParams)?);
            let nep = external_param_count(ep, sample_count, index)?;
            if nep == 0 {
                slot.external_params = None;
            }
            nep
        }
        None => 0,
    };

    let dc_group_count = match present(&input.dc_group) {
        Some(raw) => {
            let idc =
                slot.dc_group.insert(NumericArray::from_raw(raw, index, ArrayField::DcGroup)?);
            validate_sample_length(idc.len(), sample_count, index, ArrayField::DcGroup)?;
            group_count(idc.as_slice(), index, ArrayField::DcGroup)?
        }
        None => 1,
    };

    let amp_group_count = match present(&input.amp_group) {
        Some(raw) => {
            let iamp =
                slot.amp_group.insert(NumericArray::from_raw(raw, index, ArrayField::AmpGroup)?);
            validate_sample_length(iamp.len(), sample_count, index, ArrayField::AmpGroup)?;
            group_count(iamp.as_slice(), index, ArrayField::AmpGroup)?
        }
        None => 1,
    };

    guard.push_record(LightCurveRecord {
        sample_count,
        external_param_count: nep,
        dc_group_count,
        amp_group_count,
    });
    Ok(())
}

fn present(field: &Option<RawArray>) -> Option<&RawArray> {
    field.as_ref().filter(|raw| !raw.is_none())
}
