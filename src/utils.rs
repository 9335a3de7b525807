//! utils — Python-side argument extraction for the `_rust_sfit` bindings.
//!
//! Converts Python objects into [`RawArray`] values and positional
//! light-curve groups into [`LightCurveInput`]s. Nothing here validates
//! shapes; that is left to [`crate::ingest::build_batch`] so Rust and Python
//! callers get identical errors.

#[cfg(feature = "python-bindings")]
use std::sync::Arc;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::ingest::{LightCurveInput, RawArray};

/// Interpret one Python value as a [`RawArray`].
///
/// Order of attempts: `None`, numpy arrays of `float64` / `int32` / `int64`
/// / `float32`, objects exposing `to_numpy()` (pandas), Python scalars, flat
/// sequences, nested sequences. Anything else is kept as
/// [`RawArray::Unsupported`] so the builder can report it with its index.
#[cfg(feature = "python-bindings")]
pub fn extract_raw_array<'py>(raw: &Bound<'py, PyAny>) -> PyResult<RawArray> {
    if raw.is_none() {
        return Ok(RawArray::None);
    }
    if let Some(arr) = extract_numpy(raw) {
        return Ok(arr);
    }

    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Some(arr) = extract_numpy(&obj) {
            return Ok(arr);
        }
    }

    if let Ok(value) = raw.extract::<f64>() {
        return Ok(RawArray::Scalar(value));
    }
    if let Ok(values) = raw.extract::<Vec<f64>>() {
        return Ok(RawArray::Sequence(values));
    }
    if let Ok(rows) = raw.extract::<Vec<Vec<f64>>>() {
        return Ok(RawArray::Rows(rows));
    }

    let type_name = raw.get_type().name().map(|n| n.to_string()).unwrap_or_default();
    Ok(RawArray::Unsupported { type_name })
}

#[cfg(feature = "python-bindings")]
fn extract_numpy(raw: &Bound<'_, PyAny>) -> Option<RawArray> {
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Some(RawArray::Float64(Arc::new(arr.as_array().to_owned())));
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<i32>>() {
        return Some(RawArray::Int32(Arc::new(arr.as_array().to_owned())));
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<i64>>() {
        return Some(RawArray::Int64(Arc::new(arr.as_array().to_owned())));
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f32>>() {
        return Some(RawArray::Float32(Arc::new(arr.as_array().to_owned())));
    }
    None
}

/// Decompose the `list` argument into light-curve inputs.
///
/// Each element must be a tuple or list `(t, y, wt[, ep[, idc[, iamp]]])`.
///
/// # Errors
/// - `TypeError` when `list` or one of its elements is not a sequence, or
///   when an element carries fewer than 3 or more than 6 fields.
#[cfg(feature = "python-bindings")]
pub fn extract_light_curves<'py>(list: &Bound<'py, PyAny>) -> PyResult<Vec<LightCurveInput>> {
    let items: Vec<Bound<'py, PyAny>> = list
        .extract()
        .map_err(|_| PyTypeError::new_err("expected a sequence of light-curve tuples"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let fields: Vec<Bound<'py, PyAny>> = item.extract().map_err(|_| {
                PyTypeError::new_err(format!(
                    "Light curve {index}: expected a tuple (t, y, wt[, ep[, idc[, iamp]]])"
                ))
            })?;
            let raws = fields.iter().map(extract_raw_array).collect::<PyResult<Vec<_>>>()?;
            Ok(LightCurveInput::from_positional(raws, index)?)
        })
        .collect()
}
