//! ingest — light-curve batch ingestion: conversion, validation, rollback.
//!
//! Purpose
//! -------
//! Convert a caller-supplied sequence of light curves into a validated
//! [`Batch`] whose records point into reference-counted numeric buffers. This
//! is the layer every fitting entry point goes through before any numeric
//! routine sees the data.
//!
//! Key behaviors
//! -------------
//! - Coerce each field into a contiguous handle of the required element kind
//!   ([`core::array`]), sharing the caller's buffer whenever no conversion is
//!   needed.
//! - Validate all fields against the sample count of `t`
//!   ([`core::validation`]) and infer DC / amplitude group counts
//!   ([`core::groups`]).
//! - Build batches all-or-nothing ([`build_batch`]): a failure at any index
//!   releases every handle captured so far through the [`BatchGuard`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `batch.len() == inputs.len()` and record `i` describes input `i`.
//! - Every slice exposed by a [`LightCurveView`] stays valid for as long as
//!   the batch is alive; views cannot outlive it.
//! - Group labels are non-negative; counts are `max(label) + 1`.
//!
//! Conventions
//! -----------
//! - Field tags in errors follow the routine argument names
//!   (`t`, `y`, `wt`, `ep`, `idc`, `iamp`).
//! - The ingest layer performs no logging; entry points in
//!   [`crate::fit`] log around it.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build [`LightCurveInput`] values (directly, or via
//!      [`LightCurveInput::from_positional`] from bindings).
//!   2. Call [`build_batch`].
//!   3. Hand [`Batch::views`] to a fitting routine, then release the batch.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover conversion, shape checks, group
//!   inference and guard release; `builder` tests cover rollback by checking
//!   `Arc` reference counts before and after a failed build.

pub mod builder;
pub mod core;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::builder::{Batch, build_batch};
pub use self::core::{
    BatchGuard, LightCurveInput, LightCurveRecord, LightCurveView, NumericArray, RawArray,
    RecordHandles, compact_labels,
};
pub use self::errors::{ArrayField, BatchError, BatchResult};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        ArrayField, Batch, BatchError, BatchResult, LightCurveInput, LightCurveRecord,
        LightCurveView, RawArray, build_batch, compact_labels,
    };
}
