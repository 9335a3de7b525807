//! fit::sfit_ffi — C bindings to the `libsfit` fitting routines.
//!
//! Purpose
//! -------
//! Implement [`FitRoutine`] on top of the compiled `sfit_search`,
//! `sfit_null` and `sfit_single` routines. Each call lays the batch out as
//! an array of [`SfitLc`] records holding non-owning pointers into the
//! batch's buffers, invokes the routine, and copies any routine-allocated
//! output into owned storage.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pointers stored in an [`SfitLc`] are valid only while the views they
//!   were taken from are alive; the record array never escapes a call.
//! - The coefficient buffer returned by `sfit_null` / `sfit_single` was
//!   allocated with `malloc` and is released here with `libc::free`, on
//!   both the success and the failure path.
//! - Counts are passed as C `int`; batches or series larger than `i32::MAX`
//!   are refused before any pointer is handed out.
//! - Every slice must be long enough for the counts in its record, and
//!   `nep > 0` requires a covariate block; views that disagree with their
//!   record are refused rather than passed as dangling or null pointers.

use std::os::raw::{c_double, c_int};
use std::ptr;

use crate::{
    fit::routine::{CoefficientBuffer, FitRoutine, RoutineFailure, SearchRequest},
    ingest::LightCurveView,
};

/// Per-light-curve record in the layout `libsfit` expects.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SfitLc {
    pub ndp: c_int,
    pub t: *const c_double,
    pub y: *const c_double,
    pub wt: *const c_double,
    pub ep: *const c_double,
    pub nep: c_int,
    pub idc: *const c_int,
    pub ndc: c_int,
    pub iamp: *const c_int,
    pub namp: c_int,
}

unsafe extern "C" {
    pub fn sfit_search(
        lclist: *const SfitLc, nlc: c_int, pl: c_int, ph: c_int, vsamp: c_double, nthr: c_int,
        chisq_r: *mut c_double, winfunc_r: *mut c_double,
    ) -> c_int;

    pub fn sfit_null(
        lclist: *const SfitLc, nlc: c_int, b_r: *mut *mut c_double, bstride_r: *mut c_int,
        chisq_r: *mut c_double,
    ) -> c_int;

    pub fn sfit_single(
        lclist: *const SfitLc, nlc: c_int, v: c_double, b_r: *mut *mut c_double,
        bstride_r: *mut c_int, chisq_r: *mut c_double,
    ) -> c_int;
}

/// SfitLibrary — [`FitRoutine`] backed by the linked `libsfit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SfitLibrary;

fn count(value: usize, what: &str) -> Result<c_int, RoutineFailure> {
    c_int::try_from(value)
        .map_err(|_| RoutineFailure::new(format!("{what} {value} exceeds the C int range")))
}

fn check_view(index: usize, c: &LightCurveView<'_>) -> Result<(), RoutineFailure> {
    let r = c.record;
    let n = r.sample_count;
    let short = |what: &str| {
        RoutineFailure::new(format!("light curve {index}: {what} is shorter than its record"))
    };
    if c.time.len() < n || c.value.len() < n || c.weight.len() < n {
        return Err(short("a sample array"));
    }
    let block = r.external_param_count.saturating_mul(n);
    if block > 0 && c.external_params.is_none_or(|ep| ep.len() < block) {
        return Err(short("the covariate block"));
    }
    if c.dc_group.is_some_and(|g| g.len() < n) || c.amp_group.is_some_and(|g| g.len() < n) {
        return Err(short("a group label array"));
    }
    Ok(())
}

/// Lay out `curves` as C records. The result borrows from `curves`.
pub fn lc_list(curves: &[LightCurveView<'_>]) -> Result<Vec<SfitLc>, RoutineFailure> {
    curves
        .iter()
        .enumerate()
        .map(|(index, c)| {
            check_view(index, c)?;
            let r = c.record;
            Ok(SfitLc {
                ndp: count(r.sample_count, "sample count")?,
                t: c.time.as_ptr(),
                y: c.value.as_ptr(),
                wt: c.weight.as_ptr(),
                ep: c.external_params.map_or(ptr::null(), <[f64]>::as_ptr),
                nep: count(r.external_param_count, "external parameter count")?,
                idc: c.dc_group.map_or(ptr::null(), <[i32]>::as_ptr),
                ndc: count(r.dc_group_count, "DC group count")?,
                iamp: c.amp_group.map_or(ptr::null(), <[i32]>::as_ptr),
                namp: count(r.amp_group_count, "amplitude group count")?,
            })
        })
        .collect()
}

/// Owns a `malloc`ed coefficient buffer until it is copied out.
struct MallocBuffer(*mut c_double);

impl Drop for MallocBuffer {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from the routine's `malloc` and is
            // freed exactly once.
            unsafe { libc::free(self.0.cast()) };
        }
    }
}

fn collect_coefficients(
    routine: &str, status: c_int, b: MallocBuffer, bstride: c_int, chisq: f64, nlc: usize,
) -> Result<CoefficientBuffer, RoutineFailure> {
    if status != 0 {
        return Err(RoutineFailure::with_code(status, format!("sfit_{routine} failed")));
    }
    let stride = usize::try_from(bstride).map_err(|_| {
        RoutineFailure::new(format!("sfit_{routine} reported negative stride {bstride}"))
    })?;
    let len = nlc
        .checked_mul(stride)
        .ok_or_else(|| RoutineFailure::new(format!("sfit_{routine} stride {stride} overflows")))?;
    if len > 0 && b.0.is_null() {
        return Err(RoutineFailure::new(format!("sfit_{routine} returned no coefficients")));
    }

    let mut values = Vec::new();
    values.try_reserve_exact(len).map_err(|_| RoutineFailure::new("coefficient copy"))?;
    if len > 0 {
        // SAFETY: on success the routine returns `nlc × bstride` doubles at `b`.
        values.extend_from_slice(unsafe { std::slice::from_raw_parts(b.0, len) });
    }
    Ok(CoefficientBuffer { chisq, values, stride })
}

impl FitRoutine for SfitLibrary {
    fn search(
        &self, curves: &[LightCurveView<'_>], request: &SearchRequest, chisq: &mut [f64],
        winfunc: &mut [f64],
    ) -> Result<(), RoutineFailure> {
        let len = request.output_len();
        if chisq.len() < len || winfunc.len() < len {
            return Err(RoutineFailure::new("output buffers shorter than the frequency range"));
        }
        let lcs = lc_list(curves)?;
        let nlc = count(lcs.len(), "light-curve count")?;
        let nthr = count(request.nthr, "thread count")?;

        // SAFETY: `lcs` points into `curves`, both outputs hold at least
        // `ph - pl + 1` doubles.
        let status = unsafe {
            sfit_search(
                lcs.as_ptr(),
                nlc,
                request.pl,
                request.ph,
                request.vsamp,
                nthr,
                chisq.as_mut_ptr(),
                winfunc.as_mut_ptr(),
            )
        };
        match status {
            0 => Ok(()),
            code => Err(RoutineFailure::with_code(code, "sfit_search failed")),
        }
    }

    fn null(&self, curves: &[LightCurveView<'_>]) -> Result<CoefficientBuffer, RoutineFailure> {
        let lcs = lc_list(curves)?;
        let nlc = count(lcs.len(), "light-curve count")?;
        let mut b: *mut c_double = ptr::null_mut();
        let (mut bstride, mut chisq): (c_int, c_double) = (0, 0.0);

        // SAFETY: `lcs` points into `curves`; out-pointers are valid locals.
        let status = unsafe { sfit_null(lcs.as_ptr(), nlc, &mut b, &mut bstride, &mut chisq) };
        collect_coefficients("null", status, MallocBuffer(b), bstride, chisq, lcs.len())
    }

    fn single(
        &self, curves: &[LightCurveView<'_>], v: f64,
    ) -> Result<CoefficientBuffer, RoutineFailure> {
        let lcs = lc_list(curves)?;
        let nlc = count(lcs.len(), "light-curve count")?;
        let mut b: *mut c_double = ptr::null_mut();
        let (mut bstride, mut chisq): (c_int, c_double) = (0, 0.0);

        // SAFETY: as in `null`.
        let status =
            unsafe { sfit_single(lcs.as_ptr(), nlc, v, &mut b, &mut bstride, &mut chisq) };
        collect_coefficients("single", status, MallocBuffer(b), bstride, chisq, lcs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{LightCurveInput, build_batch};

    #[test]
    // Purpose
    // -------
    // C records point into the batch buffers and carry the record counts.
    //
    // Given
    // -----
    // - One plain curve and one with `ep` (2 rows) and `iamp = [0, 1, 1]`.
    //
    // Expect
    // ------
    // - Null `ep` / `idc` / `iamp` for the plain curve; matching pointers and
    //   counts for the second.
    fn lc_list_mirrors_views() {
        let batch = build_batch(&[
            LightCurveInput::new(vec![0.0, 1.0, 2.0], vec![1.0; 3], vec![1.0; 3]),
            LightCurveInput::new(vec![0.0, 1.0, 2.0], vec![1.0; 3], vec![1.0; 3])
                .with_external_params(vec![vec![0.0; 3], vec![1.0; 3]])
                .with_amp_group(vec![0, 1, 1]),
        ])
        .unwrap();
        let views = batch.views();

        let lcs = lc_list(&views).unwrap();

        assert!(lcs[0].ep.is_null() && lcs[0].idc.is_null() && lcs[0].iamp.is_null());
        assert_eq!((lcs[0].ndp, lcs[0].nep, lcs[0].ndc, lcs[0].namp), (3, 0, 1, 1));
        assert_eq!(lcs[1].t, views[1].time.as_ptr());
        assert_eq!((lcs[1].nep, lcs[1].namp), (2, 2));
        assert!(!lcs[1].ep.is_null() && !lcs[1].iamp.is_null());
    }

    #[test]
    // Purpose
    // -------
    // A view whose record claims covariates it does not carry is refused
    // before any pointer is laid out.
    //
    // Given
    // -----
    // - A valid 3-sample view with its `external_param_count` forced to 2
    //   while `external_params` stays `None`.
    //
    // Expect
    // ------
    // - `lc_list` fails with a message naming the covariate block.
    fn lc_list_refuses_view_inconsistent_with_record() {
        let batch =
            build_batch(&[LightCurveInput::new(vec![0.0, 1.0, 2.0], vec![1.0; 3], vec![1.0; 3])])
                .unwrap();
        let mut view = batch.view(0).unwrap();
        view.record.external_param_count = 2;

        let err = lc_list(&[view]).unwrap_err();

        assert!(err.reason.contains("covariate block"), "got {err}");
    }

    #[test]
    fn collect_coefficients_maps_status_and_stride() {
        let failed = collect_coefficients("null", 2, MallocBuffer(ptr::null_mut()), 0, 0.0, 1);
        let negative = collect_coefficients("null", 0, MallocBuffer(ptr::null_mut()), -1, 0.0, 1);
        let empty = collect_coefficients("null", 0, MallocBuffer(ptr::null_mut()), 4, 1.5, 0);

        assert_eq!(failed.unwrap_err().code, Some(2));
        assert!(negative.is_err());
        assert_eq!(empty.unwrap(), CoefficientBuffer { chisq: 1.5, values: vec![], stride: 4 });
    }
}
