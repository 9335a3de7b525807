//! Batch guard — single owner and single release point for batch resources.
//!
//! Purpose
//! -------
//! Own every numeric handle and the record array produced while building a
//! batch, and release all of them in one idempotent operation. The builder
//! never cleans up field by field; on any failure it calls
//! [`BatchGuard::release`] once and surfaces the error.
//!
//! Key behaviors
//! -------------
//! - Reserve record and slot storage for the whole input sequence up front
//!   (fallibly) before any conversion happens.
//! - Capture handles slot by slot as they are produced, so a slot that failed
//!   halfway still has its populated handles released.
//! - [`BatchGuard::release`] frees the record array and every populated
//!   handle in every opened slot, returns the number of handles released,
//!   and is a no-op on subsequent calls. `Drop` calls it as well.
//!
//! Invariants & assumptions
//! ------------------------
//! - `records.len() <= slots.len()`: a record is pushed only after its slot
//!   is complete.
//! - After `release`, the guard holds no handles and no record storage.
use crate::ingest::{
    core::record::{LightCurveRecord, RecordHandles},
    errors::{BatchError, BatchResult},
};

/// BatchGuard — scoped ownership of a batch under construction.
///
/// Fields
/// ------
/// - `records`: `Option<Vec<LightCurveRecord>>`
///   Record array; `None` once released.
/// - `slots`: `Vec<RecordHandles>`
///   One entry per opened record slot, in input order.
/// - `capacity`: `usize`
///   Number of inputs the guard was sized for.
#[derive(Debug)]
pub struct BatchGuard {
    records: Option<Vec<LightCurveRecord>>,
    slots: Vec<RecordHandles>,
    capacity: usize,
}

impl BatchGuard {
    /// Create an empty guard with storage reserved for `nlc` light curves.
    ///
    /// # Errors
    /// - [`BatchError::Allocation`] when record or slot storage cannot be
    ///   reserved.
    pub fn with_capacity(nlc: usize) -> BatchResult<Self> {
        let mut records = Vec::new();
        records
            .try_reserve_exact(nlc)
            .map_err(|_| BatchError::Allocation { what: "light-curve records", requested: nlc })?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(nlc)
            .map_err(|_| BatchError::Allocation { what: "array handle slots", requested: nlc })?;

        Ok(BatchGuard { records: Some(records), slots, capacity: nlc })
    }

    /// Open the next record slot and return it for population.
    pub fn open_slot(&mut self) -> &mut RecordHandles {
        let index = self.slots.len();
        self.slots.push(RecordHandles::default());
        &mut self.slots[index]
    }

    /// Append the record for the most recently completed slot.
    pub fn push_record(&mut self, record: LightCurveRecord) {
        if let Some(records) = self.records.as_mut() {
            records.push(record);
        }
    }

    pub fn records(&self) -> &[LightCurveRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    pub fn slots(&self) -> &[RecordHandles] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of handles currently held across all slots.
    pub fn populated_handles(&self) -> usize {
        self.slots.iter().map(RecordHandles::populated).sum()
    }

    pub fn is_released(&self) -> bool {
        self.records.is_none()
    }

    /// Release the record array and every populated handle.
    ///
    /// Returns the number of handles released by this call; a second call
    /// returns 0.
    pub fn release(&mut self) -> usize {
        self.records = None;
        let released = self.slots.iter_mut().map(RecordHandles::release).sum();
        self.slots = Vec::new();
        released
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.release();
    }
}
