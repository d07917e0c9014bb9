use std::fmt;

/// An allocator that hands out memory the foreign side can read and that must be returned to the
/// same allocator.
///
/// # Safety
///
/// A non-null pointer returned by [`ForeignAllocator::allocate`] must be valid for reads and
/// writes of `size` bytes until it is passed to [`ForeignAllocator::deallocate`] on the same
/// allocator (or a clone of it).
pub unsafe trait ForeignAllocator {
    /// Allocates `size` bytes. Returns a null pointer if the allocation failed.
    fn allocate(&self, size: usize) -> *mut u8;

    /// Returns memory previously obtained from [`ForeignAllocator::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator and must not have been
    /// deallocated before.
    unsafe fn deallocate(&self, ptr: *mut u8);
}

/// The C heap: `malloc` and `free`.
#[derive(Clone, Copy, Default)]
pub struct LibcAllocator;

impl fmt::Debug for LibcAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LibcAllocator")
    }
}

unsafe impl ForeignAllocator for LibcAllocator {
    fn allocate(&self, size: usize) -> *mut u8 {
        // SAFETY: `malloc` has no preconditions; a zero sized request may return null which the
        // caller treats as a failure.
        unsafe { libc::malloc(size) }.cast()
    }

    unsafe fn deallocate(&self, ptr: *mut u8) {
        libc::free(ptr.cast());
    }
}
