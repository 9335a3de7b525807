//! Group-index inference for DC-offset and amplitude groups.
//!
//! Group counts are never supplied explicitly; they are inferred from the
//! index arrays as `max(index) + 1`. Labels below the maximum that never
//! occur still count as (empty) groups; [`group_count`] keeps that behavior
//! and never renumbers. Callers who want dense labels must ask for it with
//! [`compact_labels`] before building the batch.
use crate::ingest::errors::{ArrayField, BatchError, BatchResult};
use std::collections::BTreeMap;

/// Infer the number of groups implied by an index array.
///
/// The running maximum is seeded at 0, so an empty array yields one group.
///
/// # Errors
/// - [`BatchError::InvalidGroupIndex`] for the first negative label.
pub fn group_count(labels: &[i32], index: usize, field: ArrayField) -> BatchResult<usize> {
    let mut max = 0_i32;
    for (position, &value) in labels.iter().enumerate() {
        if value < 0 {
            return Err(BatchError::InvalidGroupIndex { index, field, position, value });
        }
        if value > max {
            max = value;
        }
    }
    Ok(max as usize + 1)
}

/// Remap arbitrary labels onto dense indices `0..k` in ascending label order.
///
/// Returns the remapped labels together with `k`, the number of distinct
/// labels. Useful when segment labels come from an upstream catalogue and
/// only some of them survive clipping.
///
/// ```rust
/// # use rust_sfit::ingest::core::groups::compact_labels;
/// let (dense, k) = compact_labels(&[7_i64, 3, 7, 12]);
/// assert_eq!(dense, vec![1, 0, 1, 2]);
/// assert_eq!(k, 3);
/// ```
pub fn compact_labels<L: Ord + Copy>(labels: &[L]) -> (Vec<i32>, usize) {
    let mut ranks: BTreeMap<L, i32> = labels.iter().map(|&label| (label, 0)).collect();
    for (rank, slot) in ranks.values_mut().enumerate() {
        *slot = rank as i32;
    }
    let dense = labels.iter().map(|label| ranks[label]).collect();
    (dense, ranks.len())
}
