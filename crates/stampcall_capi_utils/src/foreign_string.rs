use std::{ffi::CStr, fmt, os::raw::c_char, ptr, ptr::NonNull, slice};

use crate::{ForeignAllocator, ForeignStringError, LibcAllocator};

/// A null-terminated string that lives in foreign memory.
///
/// The buffer is allocated when the `ForeignString` is constructed and released exactly once when
/// it is dropped, including during unwinding. Pointers obtained through [`ForeignString::as_ptr`]
/// must not outlive the `ForeignString`; the foreign side may only borrow them for the duration of
/// a call.
pub struct ForeignString<A: ForeignAllocator = LibcAllocator> {
    ptr: NonNull<c_char>,
    len: usize,
    allocator: A,
}

impl ForeignString<LibcAllocator> {
    /// Copies `bytes` into a newly allocated, null-terminated buffer on the C heap.
    pub fn new<T: AsRef<[u8]>>(bytes: T) -> Result<Self, ForeignStringError> {
        Self::new_in(bytes, LibcAllocator)
    }
}

impl<A: ForeignAllocator> ForeignString<A> {
    /// Copies `bytes` into a newly allocated, null-terminated buffer obtained from `allocator`.
    ///
    /// Fails without allocating if `bytes` contains a nul byte.
    pub fn new_in<T: AsRef<[u8]>>(bytes: T, allocator: A) -> Result<Self, ForeignStringError> {
        let bytes = bytes.as_ref();
        if let Some(position) = bytes.iter().position(|&b| b == 0) {
            return Err(ForeignStringError::InteriorNul { position });
        }

        let size = bytes.len() + 1;
        let ptr = NonNull::new(allocator.allocate(size).cast::<c_char>())
            .ok_or(ForeignStringError::AllocationFailed { size })?;

        // SAFETY: the allocation is valid for `size` bytes and cannot overlap with `bytes`.
        unsafe {
            let dst = ptr.as_ptr().cast::<u8>();
            ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
            dst.add(bytes.len()).write(0);
        }

        Ok(Self {
            ptr,
            len: bytes.len(),
            allocator,
        })
    }

    /// Returns a pointer to the null-terminated buffer.
    pub fn as_ptr(&self) -> *const c_char {
        self.ptr.as_ptr()
    }

    /// Returns the number of bytes, excluding the null terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the contents of the buffer without the null terminator.
    pub fn as_bytes(&self) -> &[u8] {
        let bytes = self.as_bytes_with_nul();
        &bytes[..self.len]
    }

    /// Returns the contents of the buffer including the null terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        // SAFETY: the buffer holds `len + 1` initialized bytes for as long as `self` lives.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<u8>(), self.len + 1) }
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: construction rejects interior nul bytes and writes the terminator.
        unsafe { CStr::from_bytes_with_nul_unchecked(self.as_bytes_with_nul()) }
    }
}

impl<A: ForeignAllocator> Drop for ForeignString<A> {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `self.allocator` and is released only here.
        unsafe { self.allocator.deallocate(self.ptr.as_ptr().cast()) };
    }
}

impl<A: ForeignAllocator> fmt::Debug for ForeignString<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForeignString")
            .field(&self.as_c_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[derive(Clone, Default)]
    struct TrackingAllocator {
        allocations: Rc<Cell<usize>>,
        releases: Rc<Cell<usize>>,
    }

    unsafe impl ForeignAllocator for TrackingAllocator {
        fn allocate(&self, size: usize) -> *mut u8 {
            self.allocations.set(self.allocations.get() + 1);
            LibcAllocator.allocate(size)
        }

        unsafe fn deallocate(&self, ptr: *mut u8) {
            self.releases.set(self.releases.get() + 1);
            LibcAllocator.deallocate(ptr);
        }
    }

    struct ExhaustedAllocator;

    unsafe impl ForeignAllocator for ExhaustedAllocator {
        fn allocate(&self, _size: usize) -> *mut u8 {
            ptr::null_mut()
        }

        unsafe fn deallocate(&self, _ptr: *mut u8) {
            unreachable!("nothing was allocated");
        }
    }

    #[test]
    fn null_terminated_copy() {
        let string = ForeignString::new("2024-01-01 00:00:00").unwrap();
        assert_eq!(string.len(), 19);
        assert_eq!(string.as_bytes(), b"2024-01-01 00:00:00");
        assert_eq!(string.as_bytes_with_nul(), b"2024-01-01 00:00:00\0");
        assert_eq!(string.as_c_str().to_str(), Ok("2024-01-01 00:00:00"));
    }

    #[test]
    fn empty_string_still_allocates_terminator() {
        let string = ForeignString::new("").unwrap();
        assert!(string.is_empty());
        assert_eq!(string.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn interior_nul_is_rejected_before_allocating() {
        let allocator = TrackingAllocator::default();
        let err = ForeignString::new_in("2024\001-01", allocator.clone()).unwrap_err();
        assert_eq!(err, ForeignStringError::InteriorNul { position: 4 });
        assert_eq!(allocator.allocations.get(), 0);
    }

    #[test]
    fn allocation_failure() {
        let err = ForeignString::new_in("abc", ExhaustedAllocator).unwrap_err();
        assert_eq!(err, ForeignStringError::AllocationFailed { size: 4 });
    }

    #[test]
    fn one_allocation_one_release() {
        let allocator = TrackingAllocator::default();
        {
            let _string = ForeignString::new_in("2024-01-01 00:00:00", allocator.clone()).unwrap();
            assert_eq!(allocator.allocations.get(), 1);
            assert_eq!(allocator.releases.get(), 0);
        }
        assert_eq!(allocator.allocations.get(), 1);
        assert_eq!(allocator.releases.get(), 1);
    }

    #[test]
    fn released_while_unwinding() {
        let allocator = TrackingAllocator::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _string = ForeignString::new_in("2024-01-01 00:00:00", allocator.clone()).unwrap();
            panic!("callee failed");
        }));
        assert!(result.is_err());
        assert_eq!(allocator.releases.get(), 1);
    }

    #[test]
    fn debug_shows_contents() {
        let string = ForeignString::new("abc").unwrap();
        assert_eq!(format!("{string:?}"), r#"ForeignString("abc")"#);
    }
}
