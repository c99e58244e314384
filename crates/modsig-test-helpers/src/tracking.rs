//! Per-thread heap accounting for leak checks.
//!
//! Install [`TrackingAllocator`] as the `#[global_allocator]` of a test
//! binary, then wrap the code under test in a [`LiveBytesGuard`]. Only the
//! thread that created the guard is counted.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    static TRACKING_ENABLED: Cell<bool> = const { Cell::new(false) };
}

fn tracking() -> bool {
    TRACKING_ENABLED.with(Cell::get)
}

fn adjust(delta: isize) {
    LIVE_BYTES.with(|live| live.set(live.get().saturating_add(delta)));
}

fn signed(size: usize) -> isize {
    isize::try_from(size).unwrap_or(isize::MAX)
}

/// [`System`] allocator that records live bytes per thread while tracking.
pub struct TrackingAllocator;

// SAFETY: every call forwards to `System` with the caller's arguments; the
// bookkeeping touches only const-initialised thread locals and never
// allocates.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded caller contract.
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() && tracking() {
            ALLOCATIONS.with(|count| count.set(count.get().saturating_add(1)));
            adjust(signed(layout.size()));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { System.dealloc(ptr, layout) };
        if tracking() {
            adjust(-signed(layout.size()));
        }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: forwarded caller contract.
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() && tracking() {
            adjust(signed(new_size).saturating_sub(signed(layout.size())));
        }
        new_ptr
    }
}

/// Snapshot of the current thread's heap counters; tracking stops on drop.
pub struct LiveBytesGuard {
    start_live: isize,
    start_allocations: usize,
}

impl LiveBytesGuard {
    /// Start tracking on this thread.
    pub fn new() -> Self {
        TRACKING_ENABLED.with(|e| e.set(true));
        Self {
            start_live: LIVE_BYTES.with(Cell::get),
            start_allocations: ALLOCATIONS.with(Cell::get),
        }
    }

    /// Bytes allocated since the guard was created and not yet freed.
    /// Negative when memory from before the guard was released.
    pub fn live_bytes(&self) -> isize {
        LIVE_BYTES.with(Cell::get).saturating_sub(self.start_live)
    }

    /// Allocations made since the guard was created.
    pub fn allocations(&self) -> usize {
        ALLOCATIONS
            .with(Cell::get)
            .saturating_sub(self.start_allocations)
    }
}

impl Default for LiveBytesGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LiveBytesGuard {
    fn drop(&mut self) {
        TRACKING_ENABLED.with(|e| e.set(false));
    }
}

/// Start tracking live heap bytes on the current thread.
pub fn track_live_bytes() -> LiveBytesGuard {
    LiveBytesGuard::new()
}
