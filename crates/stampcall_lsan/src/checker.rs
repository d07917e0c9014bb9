/// A two stage leak check that runs at the very end of the process.
pub trait LeakChecker {
    /// Releases or settles everything the host still holds so it does not obscure the report.
    fn collect(&mut self);

    /// Asks the leak checker to scan for and report leaked memory.
    fn do_leak_check(&mut self);
}

/// The leak checker of regular builds. Neither stage does anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLeakChecker;

impl LeakChecker for NoopLeakChecker {
    fn collect(&mut self) {}

    fn do_leak_check(&mut self) {}
}

#[cfg(feature = "lsan")]
pub use sanitizer::LsanLeakChecker;

#[cfg(feature = "lsan")]
mod sanitizer {
    use std::io::{self, Write};
    use std::os::raw::c_int;

    use super::LeakChecker;

    extern "C" {
        fn __lsan_do_leak_check();
        fn __lsan_do_recoverable_leak_check() -> c_int;
    }

    /// Reports leaks through the LeakSanitizer runtime that was linked in by `-Zsanitizer`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LsanLeakChecker;

    impl LsanLeakChecker {
        /// Runs a leak check that can be repeated and does not terminate the process. Returns
        /// true if leaks were found.
        pub fn recoverable_leak_check(&mut self) -> bool {
            // SAFETY: provided by the sanitizer runtime, no preconditions.
            unsafe { __lsan_do_recoverable_leak_check() != 0 }
        }
    }

    impl LeakChecker for LsanLeakChecker {
        fn collect(&mut self) {
            // Anything still buffered must reach its destination before the report is written.
            if let Err(err) = io::stdout().flush() {
                log::warn!("failed to flush stdout before leak check: {err}");
            }
            if let Err(err) = io::stderr().flush() {
                log::warn!("failed to flush stderr before leak check: {err}");
            }
        }

        fn do_leak_check(&mut self) {
            log::debug!("running leak sanitizer check");
            // SAFETY: provided by the sanitizer runtime. Only the first call performs a check;
            // if leaks are found the runtime reports them and exits with its own exit code.
            unsafe { __lsan_do_leak_check() };
        }
    }
}

/// The leak checker selected by the `lsan` feature.
#[cfg(feature = "lsan")]
pub type DefaultLeakChecker = LsanLeakChecker;

/// The leak checker selected by the `lsan` feature.
#[cfg(not(feature = "lsan"))]
pub type DefaultLeakChecker = NoopLeakChecker;

/// Whether this build performs a leak check at exit.
pub const LEAK_CHECK_ENABLED: bool = cfg!(feature = "lsan");

/// Runs both stages of `checker`, collection first.
pub fn run_leak_check<C: LeakChecker + ?Sized>(checker: &mut C) {
    checker.collect();
    checker.do_leak_check();
}
