//! Common functionality for crossing the C ABI boundary: owned foreign string buffers, the
//! allocator they are carved from, and helpers to read C strings back into Rust.

mod allocator;
mod error;
mod foreign_string;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

pub use allocator::{ForeignAllocator, LibcAllocator};
pub use error::ForeignStringError;
pub use foreign_string::ForeignString;

/// The signature of the external entry point: `int foo(const char*)`.
///
/// The callee borrows the string for the duration of the call only; the caller owns and frees it.
pub type EntryPoint = unsafe extern "C" fn(*const c_char) -> c_int;

/// The symbol name of the external entry point.
pub const ENTRY_POINT_NAME: &str = "foo";

/// Tries to convert a C style string pointer to a `&str`.
///
/// # Safety
///
/// The caller must provide a valid C string with a null terminator, whose content doesnt change
/// during the lifetime `'a`.
pub unsafe fn try_convert_c_string<'a>(string: *const c_char) -> Result<&'a str, &'static str> {
    if string.is_null() {
        return Err("null pointer");
    }

    match CStr::from_ptr::<'a>(string).to_str() {
        Ok(value) => Ok(value),
        Err(_) => Err("invalid UTF-8 encoded"),
    }
}
