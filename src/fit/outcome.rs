//! fit::outcome — caller-facing results of the fitting entry points.
//!
//! Purpose
//! -------
//! Hold what `search`, `null` and `single` hand back to the caller, and
//! explain how a coefficient row is packed so callers can pull DC offsets,
//! covariate weights and sinusoid terms out of it.
//!
//! Key behaviors
//! -------------
//! - [`SearchOutcome`] owns the periodogram and window function, both of
//!   length `ph - pl + 1`.
//! - [`FitOutcome`] owns the scalar statistic and an `(nlc, stride)`
//!   coefficient matrix copied out of the routine's buffer.
//! - [`CoefficientLayout`] describes the packing of one row,
//!   `[ndc DC offsets][nep covariate weights][(sin, cos) × namp]`, and
//!   splits rows into a [`CoefficientRow`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `r` of a [`FitOutcome`] belongs to record `r` of the batch it was
//!   computed from.
//! - `stride` is uniform across rows and may exceed the width any single
//!   record needs; trailing values past a record's width are padding.
use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    fit::errors::{FitError, FitResult},
    ingest::{LightCurveRecord, LightCurveView},
};

/// SearchOutcome — periodogram and window function of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Fit statistic per sampled frequency.
    pub chisq: Array1<f64>,
    /// Window function per sampled frequency.
    pub winfunc: Array1<f64>,
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        self.chisq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chisq.is_empty()
    }
}

/// FitOutcome — statistic and coefficient matrix of a `null` / `single` fit.
///
/// Fields
/// ------
/// - `chisq`: `f64`
///   Scalar fit statistic over the whole batch.
/// - `coefficients`: `Array2<f64>`
///   One row per light curve, `stride` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub chisq: f64,
    pub coefficients: Array2<f64>,
}

impl FitOutcome {
    /// Row width reported by the routine.
    pub fn stride(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.coefficients.nrows()).then(|| self.coefficients.row(index))
    }
}

/// CoefficientLayout — packing of one coefficient row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientLayout {
    pub dc_groups: usize,
    pub external_params: usize,
    pub amp_groups: usize,
}

impl CoefficientLayout {
    pub fn for_record(record: &LightCurveRecord) -> Self {
        CoefficientLayout {
            dc_groups: record.dc_group_count,
            external_params: record.external_param_count,
            amp_groups: record.amp_group_count,
        }
    }

    /// Number of values a row must hold for this record.
    pub fn width(&self) -> usize {
        self.dc_groups + self.external_params + 2 * self.amp_groups
    }

    /// Split `row` (row number `index`, for error reporting) into its parts.
    ///
    /// # Errors
    /// - [`FitError::CoefficientLayout`] when `row` is shorter than
    ///   [`CoefficientLayout::width`].
    pub fn split<'a>(&self, index: usize, row: &'a [f64]) -> FitResult<CoefficientRow<'a>> {
        let needed = self.width();
        if row.len() < needed {
            return Err(FitError::CoefficientLayout { row: index, needed, stride: row.len() });
        }
        let (dc, rest) = row.split_at(self.dc_groups);
        let (external, rest) = rest.split_at(self.external_params);
        Ok(CoefficientRow { dc, external, sinusoids: &rest[..2 * self.amp_groups] })
    }
}

/// CoefficientRow — one record's coefficients, split by role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientRow<'a> {
    pub dc: &'a [f64],
    pub external: &'a [f64],
    /// Interleaved `sin, cos` pairs, one per amplitude group.
    pub sinusoids: &'a [f64],
}

/// SinusoidTerm — `sin` / `cos` weights of one amplitude group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidTerm {
    pub sin: f64,
    pub cos: f64,
}

impl SinusoidTerm {
    /// Semi-amplitude `sqrt(sin² + cos²)`.
    pub fn amplitude(&self) -> f64 {
        self.sin.hypot(self.cos)
    }

    /// Phase of the maximum of `sin·sin(2πx) + cos·cos(2πx)` folded into `[0, 1)`.
    pub fn phase(&self) -> f64 {
        let phi = self.cos.atan2(self.sin) / std::f64::consts::TAU;
        if phi < 0.0 { phi + 1.0 } else { phi }
    }
}

impl CoefficientRow<'_> {
    pub fn sinusoid(&self, group: usize) -> Option<SinusoidTerm> {
        match self.sinusoids.get(2 * group..2 * group + 2) {
            Some(&[sin, cos]) => Some(SinusoidTerm { sin, cos }),
            _ => None,
        }
    }

    /// Baseline model per sample: the DC offset of the sample's group plus
    /// the covariate contribution.
    ///
    /// Samples whose DC label is outside the row are given a zero offset.
    pub fn baseline(&self, view: &LightCurveView<'_>) -> Vec<f64> {
        let n = view.sample_count();
        (0..n)
            .map(|i| {
                let group = view.dc_group.map_or(0, |idc| idc[i] as usize);
                let dc = self.dc.get(group).copied().unwrap_or(0.0);
                let covariates: f64 = self
                    .external
                    .iter()
                    .enumerate()
                    .filter_map(|(k, &w)| view.external_param(k).map(|row| w * row[i]))
                    .sum();
                dc + covariates
            })
            .collect()
    }

    /// Observations with the baseline removed, `y - baseline`.
    pub fn detrended(&self, view: &LightCurveView<'_>) -> Vec<f64> {
        view.value.iter().zip(self.baseline(view)).map(|(y, b)| y - b).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{LightCurveInput, build_batch};
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Row width and splitting for records with and without covariates.
    // - Short rows reported as layout errors.
    // - Sinusoid amplitude / phase and baseline removal.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A row splits into DC, covariate and sinusoid parts in that order.
    //
    // Given
    // -----
    // - ndc = 2, nep = 1, namp = 1; a stride-6 row with one padding value.
    //
    // Expect
    // ------
    // - dc `[1, 2]`, external `[3]`, sinusoids `[4, 5]`.
    fn split_packs_dc_external_then_sinusoids() {
        let layout = CoefficientLayout { dc_groups: 2, external_params: 1, amp_groups: 1 };
        let row = [1.0, 2.0, 3.0, 4.0, 5.0, 0.0];

        let parts = layout.split(0, &row).unwrap();

        assert_eq!(layout.width(), 5);
        assert_eq!(parts.dc, &[1.0, 2.0]);
        assert_eq!(parts.external, &[3.0]);
        assert_eq!(parts.sinusoids, &[4.0, 5.0]);
        assert_eq!(parts.sinusoid(0), Some(SinusoidTerm { sin: 4.0, cos: 5.0 }));
        assert_eq!(parts.sinusoid(1), None);
    }

    #[test]
    // Purpose
    // -------
    // Rows shorter than the record's width are rejected.
    //
    // Given
    // -----
    // - ndc = 1, nep = 0, namp = 2 (width 5) and a row of 4.
    //
    // Expect
    // ------
    // - `CoefficientLayout { row: 3, needed: 5, stride: 4 }`.
    fn split_rejects_short_rows() {
        let layout = CoefficientLayout { dc_groups: 1, external_params: 0, amp_groups: 2 };

        let err = layout.split(3, &[0.0; 4]).unwrap_err();

        assert_eq!(err, FitError::CoefficientLayout { row: 3, needed: 5, stride: 4 });
    }

    #[test]
    // Purpose
    // -------
    // Amplitude and phase follow the sin/cos weights.
    //
    // Given
    // -----
    // - `(sin, cos) = (3, 4)` and `(sin, cos) = (0, -1)`.
    //
    // Expect
    // ------
    // - Amplitude 5; the second term has phase 0.75 (folded from -0.25).
    fn sinusoid_amplitude_and_phase() {
        let a = SinusoidTerm { sin: 3.0, cos: 4.0 };
        let b = SinusoidTerm { sin: 0.0, cos: -1.0 };

        assert_relative_eq!(a.amplitude(), 5.0);
        assert!((0.0..1.0).contains(&a.phase()));
        assert_relative_eq!(b.phase(), 0.75);
    }

    #[test]
    // Purpose
    // -------
    // Baseline removal uses the DC offset of each sample's group plus the
    // weighted covariates.
    //
    // Given
    // -----
    // - 3 samples, `idc = [0, 1, 1]`, one covariate `[1, 2, 3]`,
    //   `y = [10, 20, 30]`; row `[1, 2, 0.5, 0, 0]`.
    //
    // Expect
    // ------
    // - Baseline `[1.5, 3, 3.5]`; detrended `[8.5, 17, 26.5]`.
    fn detrended_removes_dc_and_covariates() {
        let batch = build_batch(&[LightCurveInput::new(
            vec![0.0, 1.0, 2.0],
            vec![10.0, 20.0, 30.0],
            vec![1.0; 3],
        )
        .with_external_params(vec![1.0, 2.0, 3.0])
        .with_dc_group(vec![0, 1, 1])])
        .unwrap();
        let view = batch.view(0).unwrap();
        let layout = CoefficientLayout::for_record(&view.record);
        let row = [1.0, 2.0, 0.5, 0.0, 0.0];

        let parts = layout.split(0, &row).unwrap();

        assert_eq!(parts.baseline(&view), vec![1.5, 3.0, 3.5]);
        assert_eq!(parts.detrended(&view), vec![8.5, 17.0, 26.5]);
    }

    #[test]
    fn fit_outcome_rows() {
        let outcome =
            FitOutcome { chisq: 1.0, coefficients: Array2::from_elem((2, 3), 0.5) };

        assert_eq!(outcome.stride(), 3);
        assert_eq!(outcome.row(1).map(|r| r.len()), Some(3));
        assert!(outcome.row(2).is_none());
    }
}
