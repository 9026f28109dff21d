use crate::raw::{RawAlloc, RawBytes};

use std::alloc::Layout;
use std::ptr::NonNull;

pub(crate) type Link = Option<NonNull<Node>>;

pub(crate) struct Node {
    pub(crate) value: RawBytes,
    pub(crate) next: Link,
}

impl Node {
    // node first, then payload; a failed payload gives the node back
    pub(crate) fn alloc<A: RawAlloc>(alloc: &A, s: &str) -> Option<NonNull<Self>> {
        let layout = Layout::new::<Node>();
        let ptr = alloc.alloc(layout)?.cast::<Node>();
        match RawBytes::copy_from(alloc, s) {
            Some(value) => unsafe {
                ptr.as_ptr().write(Self { value, next: None });
                Some(ptr)
            },
            None => {
                unsafe { alloc.dealloc(ptr.cast(), layout) };
                None
            }
        }
    }

    // cond: ptr was produced by `Node::alloc` with the same allocator
    pub(crate) unsafe fn dealloc<A: RawAlloc>(alloc: &A, ptr: NonNull<Self>) {
        (*ptr.as_ptr()).value.dealloc(alloc);
        alloc.dealloc(ptr.cast(), Layout::new::<Node>());
    }

    pub(crate) unsafe fn value<'a>(ptr: NonNull<Self>) -> &'a str {
        (*ptr.as_ptr()).value.as_str()
    }
}
