use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

/// Fallible allocator used for every node and payload of a queue.
///
/// `alloc` returns `None` on exhaustion instead of aborting, so callers can
/// roll back and report the failure.
pub trait RawAlloc {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must come from `self.alloc(layout)` with the same `layout`.
    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl RawAlloc for Global {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

#[derive(Debug, Default)]
struct Counters {
    allocs: Cell<usize>,
    frees: Cell<usize>,
    // remaining successful allocations before every request fails
    budget: Cell<Option<usize>>,
}

/// Allocator that counts blocks and can be armed to fail.
///
/// Clones share the same counters, so a clone kept outside a queue observes
/// what the queue does with its own copy.
#[derive(Debug, Default, Clone)]
pub struct TrackingAlloc {
    counters: Rc<Counters>,
}

impl TrackingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more allocations succeed, then fail every one after that.
    pub fn fail_after(&self, n: usize) {
        self.counters.budget.set(Some(n));
    }

    pub fn fail_always(&self) {
        self.fail_after(0)
    }

    pub fn disarm(&self) {
        self.counters.budget.set(None);
    }

    pub fn allocations(&self) -> usize {
        self.counters.allocs.get()
    }

    pub fn frees(&self) -> usize {
        self.counters.frees.get()
    }

    pub fn live(&self) -> usize {
        self.allocations() - self.frees()
    }
}

impl RawAlloc for TrackingAlloc {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        let counters = &self.counters;
        match counters.budget.get() {
            Some(0) => return None,
            Some(n) => counters.budget.set(Some(n - 1)),
            None => {}
        }
        let ptr = Global.alloc(layout)?;
        counters.allocs.set(counters.allocs.get() + 1);
        Some(ptr)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        Global.dealloc(ptr, layout);
        self.counters.frees.set(self.counters.frees.get() + 1);
    }
}
