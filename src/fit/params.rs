//! fit::params — validated scalar arguments for the search entry point.
//!
//! Purpose
//! -------
//! Turn the loosely typed `(pl, ph, vsamp, nthr)` arguments of a
//! periodogram search into a [`SearchParams`] value that is known to be
//! usable before any light curve is converted.
//!
//! Key behaviors
//! -------------
//! - `vsamp` must be finite and strictly positive.
//! - `ph - pl + 1` must not be negative; an empty range (`ph == pl - 1`) is
//!   accepted and yields zero-length outputs.
//! - `nthr <= 0` requests the available parallelism; positive values are
//!   used as given.
//! - Default interrupt handling around the backend call is opt-in
//!   ([`SearchParams::with_default_interrupts`]).
use std::num::NonZeroUsize;

use crate::fit::{
    errors::{FitError, FitResult},
    routine::SearchRequest,
};

/// ThreadCount — worker-thread policy handed to the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadCount {
    /// Use whatever parallelism the host reports.
    Available,
    Fixed(NonZeroUsize),
}

impl ThreadCount {
    /// Interpret the signed `nthr` convention used by the bindings.
    ///
    /// Zero and negative hints both select [`ThreadCount::Available`].
    pub fn from_hint(nthr: i32) -> Self {
        usize::try_from(nthr)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(ThreadCount::Available, ThreadCount::Fixed)
    }

    /// Concrete thread count, never below 1.
    pub fn resolve(self) -> usize {
        match self {
            ThreadCount::Available => {
                std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
            }
            ThreadCount::Fixed(n) => n.get(),
        }
    }
}

/// SearchParams — validated arguments of a periodogram search.
///
/// Fields
/// ------
/// - `pl`, `ph`: `i32`
///   Inclusive frequency-index range.
/// - `vsamp`: `f64`
///   Frequency sampling step.
/// - `threads`: [`ThreadCount`]
///   Thread policy for the backend.
/// - `default_interrupts`: `bool`
///   Whether SIGINT reverts to its default disposition during the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub pl: i32,
    pub ph: i32,
    pub vsamp: f64,
    pub threads: ThreadCount,
    pub default_interrupts: bool,
}

impl SearchParams {
    /// Validate search arguments.
    ///
    /// Parameters
    /// ----------
    /// - `pl`, `ph`: `i32`
    ///   Frequency-index bounds with `ph >= pl - 1`.
    /// - `vsamp`: `f64`
    ///   Finite, strictly positive sampling step.
    /// - `nthr`: `i32`
    ///   Thread hint; zero or negative means "available parallelism".
    ///
    /// Errors
    /// ------
    /// - `FitError::InvalidParameter`
    ///   Returned for a non-finite or non-positive `vsamp` or an inverted
    ///   range.
    pub fn new(pl: i32, ph: i32, vsamp: f64, nthr: i32) -> FitResult<Self> {
        if !vsamp.is_finite() || vsamp <= 0.0 {
            return Err(FitError::invalid("vsamp", format!("must be finite and > 0, got {vsamp}")));
        }
        if i64::from(ph) - i64::from(pl) + 1 < 0 {
            return Err(FitError::invalid(
                "ph",
                format!("frequency range [{pl}, {ph}] has negative length"),
            ));
        }
        let threads = ThreadCount::from_hint(nthr);
        Ok(SearchParams { pl, ph, vsamp, threads, default_interrupts: false })
    }

    /// Restore default SIGINT handling for the duration of the backend call.
    pub fn with_default_interrupts(mut self) -> Self {
        self.default_interrupts = true;
        self
    }

    /// Number of sampled frequencies, `ph - pl + 1`.
    pub fn output_len(&self) -> usize {
        self.request_with(1).output_len()
    }

    /// Resolve the thread policy into a backend request.
    pub fn request(&self) -> SearchRequest {
        self.request_with(self.threads.resolve())
    }

    fn request_with(&self, nthr: usize) -> SearchRequest {
        SearchRequest { pl: self.pl, ph: self.ph, vsamp: self.vsamp, nthr }
    }
}

/// Validate the fixed frequency of a single-frequency fit.
pub fn validate_frequency(v: f64) -> FitResult<f64> {
    if !v.is_finite() {
        return Err(FitError::invalid("v", format!("must be finite, got {v}")));
    }
    Ok(v)
}
