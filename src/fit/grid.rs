//! fit::grid — frequency-grid planning and periodogram peak refinement.
//!
//! Purpose
//! -------
//! Choose the `(pl, ph, vsamp)` triple for a search from a period range and
//! the time baseline of the data, and pick the best frequency out of the
//! resulting periodogram.
//!
//! Key behaviors
//! -------------
//! - Sampling step `vsamp = oversample / window`; the default oversampling
//!   factor is [`DEFAULT_OVERSAMPLE`] (ten samples per `1 / window`).
//! - `pl = max(1, floor(1 / (vsamp · pmax)))` and
//!   `ph = ceil(1 / (vsamp · pmin))`, so the grid spans at least
//!   `[1 / pmax, 1 / pmin]`.
//! - [`FrequencyGrid::best_frequency`] takes the minimum of `sqrt(chisq)` and
//!   refines it by three-point parabolic interpolation when the minimum is
//!   not on an edge.
//!
//! Conventions
//! -----------
//! - Frequencies are in inverse time units of the light-curve `t` axis;
//!   frequency index `k` maps to `k · vsamp`.
use ndarray::Array1;

use crate::fit::{
    errors::{FitError, FitResult},
    params::SearchParams,
};

/// Fraction of `1 / window` used as the frequency step.
pub const DEFAULT_OVERSAMPLE: f64 = 0.1;

/// FrequencyGrid — inclusive range of sampled frequency indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
    pub pl: i32,
    pub ph: i32,
    pub vsamp: f64,
}

impl FrequencyGrid {
    /// Plan a grid covering periods `[pmin, pmax]` for data spanning `window`.
    ///
    /// Parameters
    /// ----------
    /// - `pmin`, `pmax`: `f64`
    ///   Shortest and longest period of interest, `0 < pmin <= pmax`.
    /// - `window`: `f64`
    ///   Longest time baseline across the batch (> 0).
    ///
    /// Errors
    /// ------
    /// - `FitError::InvalidParameter`
    ///   Returned for non-finite or non-positive inputs, `pmin > pmax`, or a
    ///   grid whose indices overflow `i32`.
    pub fn from_periods(pmin: f64, pmax: f64, window: f64) -> FitResult<Self> {
        Self::with_oversample(pmin, pmax, window, DEFAULT_OVERSAMPLE)
    }

    /// As [`FrequencyGrid::from_periods`] with an explicit oversampling factor.
    pub fn with_oversample(pmin: f64, pmax: f64, window: f64, oversample: f64) -> FitResult<Self> {
        for (name, value) in
            [("pmin", pmin), ("pmax", pmax), ("window", window), ("oversample", oversample)]
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(FitError::invalid(name, format!("must be finite and > 0, got {value}")));
            }
        }
        if pmin > pmax {
            return Err(FitError::invalid("pmin", format!("{pmin} exceeds pmax {pmax}")));
        }

        let vsamp = oversample / window;
        let pl = index((1.0 / (vsamp * pmax)).floor(), "pmax")?.max(1);
        let ph = index((1.0 / (vsamp * pmin)).ceil(), "pmin")?;
        Ok(FrequencyGrid { pl, ph, vsamp })
    }

    /// Number of sampled frequencies, `ph - pl + 1`.
    pub fn len(&self) -> usize {
        usize::try_from(i64::from(self.ph) - i64::from(self.pl) + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frequency of the `k`-th sample (0-based from `pl`).
    pub fn frequency(&self, k: usize) -> f64 {
        (f64::from(self.pl) + k as f64) * self.vsamp
    }

    pub fn frequencies(&self) -> Array1<f64> {
        Array1::from_iter((0..self.len()).map(|k| self.frequency(k)))
    }

    /// Search parameters over this grid with the given thread hint.
    pub fn search_params(&self, nthr: i32) -> FitResult<SearchParams> {
        SearchParams::new(self.pl, self.ph, self.vsamp, nthr)
    }

    /// Best-fitting frequency in a periodogram computed over this grid.
    ///
    /// Returns `None` when `chisq` is empty or holds no finite values.
    pub fn best_frequency(&self, chisq: &[f64]) -> Option<f64> {
        let amp: Vec<f64> = chisq.iter().map(|c| c.sqrt()).collect();
        let (p, _) = amp
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_finite())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))?;

        let offset = if p > 0 && p + 1 < amp.len() {
            let b = 0.5 * (amp[p + 1] - amp[p - 1]);
            let c = 0.5 * (amp[p + 1] + amp[p - 1] - 2.0 * amp[p]);
            let offset = -0.5 * b / c;
            if offset.is_finite() { offset } else { 0.0 }
        } else {
            0.0
        };

        Some((f64::from(self.pl) + p as f64 + offset) * self.vsamp)
    }
}

fn index(value: f64, name: &'static str) -> FitResult<i32> {
    if value > f64::from(i32::MAX) {
        return Err(FitError::invalid(name, "frequency grid exceeds the i32 index range"));
    }
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Grid planning constants (`vsamp`, `pl` floor at 1, `ph` ceiling).
    // - Peak refinement at interior and edge minima.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Planning follows the oversampling rule.
    //
    // Given
    // -----
    // - `pmin = 0.5`, `pmax = 20`, `window = 10` with the default factor.
    //
    // Expect
    // ------
    // - `vsamp = 0.01`, `pl = floor(1 / 0.2) = 5`, `ph = ceil(1 / 0.005) = 200`.
    fn from_periods_plans_grid() {
        let grid = FrequencyGrid::from_periods(0.5, 20.0, 10.0).unwrap();

        assert_relative_eq!(grid.vsamp, 0.01);
        assert_eq!(grid.pl, 5);
        assert_eq!(grid.ph, 200);
        assert_eq!(grid.len(), 196);
        assert_relative_eq!(grid.frequency(0), 0.05, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // `pl` never drops below 1, even for periods longer than the baseline.
    //
    // Given
    // -----
    // - `pmax = 1000` with a window of 10.
    //
    // Expect
    // ------
    // - `pl == 1`.
    fn from_periods_floors_pl_at_one() {
        let grid = FrequencyGrid::from_periods(1.0, 1000.0, 10.0).unwrap();

        assert_eq!(grid.pl, 1);
    }

    #[test]
    fn from_periods_rejects_bad_ranges() {
        assert!(FrequencyGrid::from_periods(2.0, 1.0, 10.0).is_err());
        assert!(FrequencyGrid::from_periods(0.0, 1.0, 10.0).is_err());
        assert!(FrequencyGrid::from_periods(1.0, 2.0, f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Parabolic refinement recovers the vertex of a sampled parabola.
    //
    // Given
    // -----
    // - `sqrt(chisq)` sampled from `(k - 2.3)² + 1` at k = 0..5, `pl = 10`,
    //   `vsamp = 0.5`.
    //
    // Expect
    // ------
    // - Best frequency `(10 + 2.3) · 0.5 = 6.15`.
    fn best_frequency_refines_interior_minimum() {
        let grid = FrequencyGrid { pl: 10, ph: 14, vsamp: 0.5 };
        let chisq: Vec<f64> =
            (0..5).map(|k| ((k as f64 - 2.3).powi(2) + 1.0).powi(2)).collect();

        let best = grid.best_frequency(&chisq).unwrap();

        assert_relative_eq!(best, 6.15, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Edge minima are not refined and empty input yields nothing.
    //
    // Given
    // -----
    // - A monotonically increasing periodogram; an empty periodogram.
    //
    // Expect
    // ------
    // - The first grid frequency; `None`.
    fn best_frequency_edge_and_empty() {
        let grid = FrequencyGrid { pl: 3, ph: 6, vsamp: 0.25 };

        assert_relative_eq!(grid.best_frequency(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 0.75);
        assert_eq!(grid.best_frequency(&[]), None);
    }
}
