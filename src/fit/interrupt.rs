//! fit::interrupt — default SIGINT handling around long backend calls.
//!
//! Purpose
//! -------
//! A host interpreter usually installs its own SIGINT handler that only sets
//! a flag; a multi-threaded search never checks that flag, so Ctrl-C would be
//! ignored until the search finishes. [`InterruptScope`] temporarily puts
//! SIGINT back to its default disposition and restores the previous handler
//! when the scope ends.
//!
//! Key behaviors
//! -------------
//! - [`InterruptScope::install`] swaps in `SIG_DFL` and remembers the old
//!   action.
//! - [`InterruptScope::restore`] puts the old action back and reports
//!   failure; `Drop` restores too (ignoring failure) so early returns and
//!   panics never leak the default handler.
//! - On non-unix targets both operations are no-ops.
use crate::fit::errors::{FitError, FitResult};

/// InterruptScope — RAII guard for default SIGINT handling.
#[derive(Debug)]
pub struct InterruptScope {
    #[cfg(unix)]
    previous: Option<libc::sigaction>,
}

#[cfg(unix)]
impl InterruptScope {
    /// Install `SIG_DFL` for SIGINT.
    ///
    /// # Errors
    /// - [`FitError::Interrupt`] when `sigaction` fails.
    pub fn install() -> FitResult<Self> {
        // SAFETY: both structs are plain C data; zeroed is a valid initial
        // state and `sigaction` only reads `action` / writes `previous`.
        let previous = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = libc::SIG_DFL;
            libc::sigemptyset(&mut action.sa_mask);

            let mut previous: libc::sigaction = std::mem::zeroed();
            if libc::sigaction(libc::SIGINT, &action, &mut previous) != 0 {
                return Err(last_os_error("install"));
            }
            previous
        };
        Ok(InterruptScope { previous: Some(previous) })
    }

    /// Restore the handler that was active before [`InterruptScope::install`].
    ///
    /// Calling it again after a successful restore does nothing.
    ///
    /// # Errors
    /// - [`FitError::Interrupt`] when `sigaction` fails.
    pub fn restore(&mut self) -> FitResult<()> {
        let Some(previous) = self.previous.take() else {
            return Ok(());
        };
        // SAFETY: `previous` was filled in by a successful `sigaction` call.
        if unsafe { libc::sigaction(libc::SIGINT, &previous, std::ptr::null_mut()) } != 0 {
            return Err(last_os_error("restore"));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(unix)]
fn last_os_error(step: &str) -> FitError {
    FitError::Interrupt {
        reason: format!("sigaction {step} failed: {}", std::io::Error::last_os_error()),
    }
}

#[cfg(not(unix))]
impl InterruptScope {
    pub fn install() -> FitResult<Self> {
        Ok(InterruptScope {})
    }

    pub fn restore(&mut self) -> FitResult<()> {
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        false
    }
}

impl Drop for InterruptScope {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn current_sigint_handler() -> libc::sighandler_t {
        unsafe {
            let mut current: libc::sigaction = std::mem::zeroed();
            libc::sigaction(libc::SIGINT, std::ptr::null(), &mut current);
            current.sa_sigaction
        }
    }

    #[test]
    // Purpose
    // -------
    // The scope installs the default handler and restores the previous one.
    //
    // Given
    // -----
    // - SIGINT set to `SIG_IGN` before the scope is installed.
    //
    // Expect
    // ------
    // - `SIG_DFL` inside the scope; `SIG_IGN` after `restore()`; a second
    //   `restore()` is a no-op.
    fn scope_installs_and_restores_sigint() {
        unsafe {
            libc::signal(libc::SIGINT, libc::SIG_IGN);
        }

        let mut scope = InterruptScope::install().unwrap();
        assert!(scope.is_active());
        assert_eq!(current_sigint_handler(), libc::SIG_DFL);

        scope.restore().unwrap();
        assert_eq!(current_sigint_handler(), libc::SIG_IGN);
        assert!(scope.restore().is_ok());
        assert!(!scope.is_active());

        drop(scope);
        assert_eq!(current_sigint_handler(), libc::SIG_IGN);
        unsafe {
            libc::signal(libc::SIGINT, libc::SIG_DFL);
        }
    }
}
