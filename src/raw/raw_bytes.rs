use super::RawAlloc;

use std::alloc::Layout;
use std::ptr::NonNull;

/// Owned copy of a string, stored NUL-terminated in `len + 1` bytes.
///
/// Does not free itself: the owner must call `dealloc` with the allocator
/// that produced it.
pub struct RawBytes {
    ptr: NonNull<u8>,
    len: usize,
}

impl RawBytes {
    /// Duplicate `s` up to its first NUL into a fresh buffer. `None` when
    /// the allocation fails.
    pub fn copy_from<A: RawAlloc>(alloc: &A, s: &str) -> Option<Self> {
        // cond: NUL is a one-byte char, so the prefix stays valid UTF-8
        let len = s.bytes().position(|b| b == 0).unwrap_or_else(|| s.len());
        let layout = Self::layout(len)?;
        let ptr = alloc.alloc(layout)?;
        unsafe {
            std::ptr::copy_nonoverlapping(s.as_ptr(), ptr.as_ptr(), len);
            ptr.as_ptr().add(len).write(0);
        }
        Some(Self { ptr, len })
    }

    fn layout(len: usize) -> Option<Layout> {
        len.checked_add(1)
            .and_then(|size| Layout::array::<u8>(size).ok())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_str(&self) -> &str {
        // cond: bytes were copied from a &str
        unsafe { std::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// # Safety
    /// `alloc` must be the allocator passed to `copy_from`, and `self` must
    /// not be used afterwards.
    pub unsafe fn dealloc<A: RawAlloc>(&mut self, alloc: &A) {
        let layout = Layout::from_size_align_unchecked(self.len + 1, 1);
        alloc.dealloc(self.ptr, layout);
        self.len = 0;
        self.ptr = NonNull::dangling();
    }
}
