//! The exit-time diagnostic hook.
//!
//! In a regular build the hook does nothing. With the `lsan` feature (and a sanitizer enabled
//! through `-Zsanitizer`) it settles the host side and then asks the LeakSanitizer runtime to
//! report leaked memory. The choice is made at compile time; there is no runtime switch.
//!
//! The hook is meant to be registered on a [`CleanupStack`] before anything else so that it runs
//! after every other deferred action:
//!
//! ```
//! use stampcall_lsan::{install_exit_hook, CleanupStack};
//!
//! let mut deferred = CleanupStack::new();
//! install_exit_hook(&mut deferred);
//! // ... allocate, call and release foreign resources ...
//! deferred.run();
//! ```

mod checker;
mod cleanup;

#[cfg(feature = "lsan")]
pub use checker::LsanLeakChecker;
pub use checker::{
    run_leak_check, DefaultLeakChecker, LeakChecker, NoopLeakChecker, LEAK_CHECK_ENABLED,
};
pub use cleanup::CleanupStack;

/// Runs the leak checker selected at build time.
pub fn do_leak_sanitizer_check() {
    run_leak_check(&mut DefaultLeakChecker::default());
}

/// Registers [`do_leak_sanitizer_check`] on `stack`. Register it first so that it fires last.
pub fn install_exit_hook(stack: &mut CleanupStack<'_>) {
    stack.defer(do_leak_sanitizer_check);
}
