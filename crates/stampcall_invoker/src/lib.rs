//! Calls a native entry point with the current time.
//!
//! Each run renders the clock as `YYYY-MM-DD HH:MM:SS`, copies it into a null-terminated buffer
//! on the foreign heap, passes that buffer to the entry point and releases it again once the call
//! returns. The integer that comes back is not interpreted; it is only reported.

mod error;
mod timestamp;

use std::{fmt, io::Write, os::raw::c_int};

use stampcall_capi_utils::{EntryPoint, ForeignAllocator, ForeignString, LibcAllocator};

pub use error::InvokeError;
pub use timestamp::{format_timestamp, Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};

/// The outcome of a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// The string that was handed to the entry point.
    pub timestamp: String,
    /// The value returned by the entry point, verbatim.
    pub result: c_int,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result: {}", self.result)
    }
}

/// Marshals strings for, and calls, a single native entry point.
pub struct Invoker<A: ForeignAllocator + Clone = LibcAllocator> {
    entry_point: EntryPoint,
    allocator: A,
}

impl Invoker<LibcAllocator> {
    /// Creates an invoker that allocates its buffers on the C heap.
    ///
    /// # Safety
    ///
    /// `entry_point` must be sound to call with any valid, null-terminated string, must not keep
    /// the pointer past the call, and must stay callable (its library loaded) for as long as the
    /// invoker is used.
    pub unsafe fn new(entry_point: EntryPoint) -> Self {
        Self::with_allocator(entry_point, LibcAllocator)
    }
}

impl<A: ForeignAllocator + Clone> Invoker<A> {
    /// Creates an invoker that allocates its buffers with `allocator`.
    ///
    /// # Safety
    ///
    /// See [`Invoker::new`].
    pub unsafe fn with_allocator(entry_point: EntryPoint, allocator: A) -> Self {
        Self {
            entry_point,
            allocator,
        }
    }

    /// Passes `message` to the entry point and returns what it returned.
    ///
    /// The foreign buffer is allocated before the call and released right after it, also when
    /// unwinding.
    pub fn invoke(&self, message: &str) -> Result<c_int, InvokeError> {
        let buffer = ForeignString::new_in(message, self.allocator.clone())?;
        log::debug!("calling entry point with {buffer:?}");

        // SAFETY: the constructor's contract covers the callee, and `buffer` outlives the call.
        let result = unsafe { (self.entry_point)(buffer.as_ptr()) };

        log::debug!("entry point returned {result}");
        Ok(result)
    }

    /// Reads `clock`, renders it and invokes the entry point with it.
    pub fn run(&self, clock: &impl Clock) -> Result<Report, InvokeError> {
        let timestamp = format_timestamp(&clock.now());
        let result = self.invoke(&timestamp)?;
        Ok(Report { timestamp, result })
    }

    /// Like [`Invoker::run`], and writes the `Result: <n>` line to `out`.
    pub fn run_and_report<W: Write>(
        &self,
        clock: &impl Clock,
        out: &mut W,
    ) -> Result<Report, InvokeError> {
        let report = self.run(clock)?;
        writeln!(out, "{report}")?;
        Ok(report)
    }
}

impl<A: ForeignAllocator + Clone> fmt::Debug for Invoker<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("entry_point", &(self.entry_point as *const ()))
            .finish_non_exhaustive()
    }
}
