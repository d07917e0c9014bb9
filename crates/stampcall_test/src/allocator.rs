use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use stampcall_capi_utils::{ForeignAllocator, LibcAllocator};

#[derive(Debug, Default)]
struct Counts {
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

/// Wraps the C heap and counts allocations and releases. Clones share their counts.
#[derive(Clone, Debug, Default)]
pub struct CountingAllocator {
    counts: Arc<Counts>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocations(&self) -> usize {
        self.counts.allocations.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.counts.releases.load(Ordering::SeqCst)
    }

    /// Allocations that have not been released yet.
    pub fn live(&self) -> usize {
        self.allocations() - self.releases()
    }
}

unsafe impl ForeignAllocator for CountingAllocator {
    fn allocate(&self, size: usize) -> *mut u8 {
        let ptr = LibcAllocator.allocate(size);
        if !ptr.is_null() {
            self.counts.allocations.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn deallocate(&self, ptr: *mut u8) {
        self.counts.releases.fetch_add(1, Ordering::SeqCst);
        LibcAllocator.deallocate(ptr);
    }
}
