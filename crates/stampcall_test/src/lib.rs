//! Stand-ins for the native library and instrumentation for the foreign heap.

mod allocator;

use std::{
    cell::RefCell,
    ffi::CStr,
    os::raw::{c_char, c_int},
};

use stampcall_capi_utils::try_convert_c_string;

pub use allocator::CountingAllocator;

/// Returns the number of bytes before the null terminator.
///
/// # Safety
///
/// `message` must point to a valid, null-terminated string.
pub unsafe extern "C" fn string_length(message: *const c_char) -> c_int {
    CStr::from_ptr(message).to_bytes().len() as c_int
}

/// Returns the year of a `YYYY-MM-DD HH:MM:SS` timestamp, or -1 if `message` is not one.
///
/// # Safety
///
/// `message` must be null or point to a valid, null-terminated string.
pub unsafe extern "C" fn parse_year(message: *const c_char) -> c_int {
    try_convert_c_string(message)
        .ok()
        .and_then(|timestamp| timestamp.get(..4))
        .and_then(|year| year.parse().ok())
        .unwrap_or(-1)
}

thread_local! {
    static RECORDED: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

/// Records the received bytes, including the null terminator, for [`take_recorded`] and returns
/// the number of calls recorded so far on this thread.
///
/// # Safety
///
/// `message` must point to a valid, null-terminated string.
pub unsafe extern "C" fn recording(message: *const c_char) -> c_int {
    let bytes = CStr::from_ptr(message).to_bytes_with_nul().to_vec();
    RECORDED.with(|recorded| {
        let mut recorded = recorded.borrow_mut();
        recorded.push(bytes);
        recorded.len() as c_int
    })
}

/// Returns and clears everything [`recording`] received on the current thread.
pub fn take_recorded() -> Vec<Vec<u8>> {
    RECORDED.take()
}
