//! core — numeric handles, records, group inference, validation and guard.
//!
//! Purpose
//! -------
//! Collect the building blocks the batch builder is assembled from:
//! array coercion ([`NumericArray`], [`RawArray`]), per-series records and
//! views ([`LightCurveRecord`], [`LightCurveView`]), group-count inference
//! ([`group_count`]), shape checks ([`validate_sample_length`],
//! [`external_param_count`]) and the resource guard ([`BatchGuard`]).
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; series indices are positions in the caller's
//!   input sequence.
//! - This module avoids I/O and logging. Failures are reported through
//!   [`BatchResult`](crate::ingest::errors::BatchResult).

pub mod array;
pub mod groups;
pub mod guard;
pub mod record;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::array::{Element, ElementKind, NumericArray, RawArray};
pub use self::groups::{compact_labels, group_count};
pub use self::guard::BatchGuard;
pub use self::record::{LightCurveInput, LightCurveRecord, LightCurveView, RecordHandles};
pub use self::validation::{external_param_count, validate_sample_length};
