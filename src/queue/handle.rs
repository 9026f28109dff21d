// Operations on a possibly absent queue: inserts and removals fail,
// size is 0, everything else is a no-op.

use super::LinkedQueue;
use crate::error::{QueueError, Result};
use crate::raw::{Global, RawAlloc};

use log::debug;

use std::alloc::Layout;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Queue whose header lives in a block from its own allocator.
pub struct Handle<A: RawAlloc + Clone = Global> {
    ptr: NonNull<LinkedQueue<A>>,
}

unsafe impl<A: RawAlloc + Clone + Send> Send for Handle<A> {}
unsafe impl<A: RawAlloc + Clone + Sync> Sync for Handle<A> {}

impl<A: RawAlloc + Clone> Deref for Handle<A> {
    type Target = LinkedQueue<A>;

    fn deref(&self) -> &LinkedQueue<A> {
        unsafe { self.ptr.as_ref() }
    }
}

impl<A: RawAlloc + Clone> DerefMut for Handle<A> {
    fn deref_mut(&mut self) -> &mut LinkedQueue<A> {
        unsafe { self.ptr.as_mut() }
    }
}

impl<A: RawAlloc + Clone> Drop for Handle<A> {
    fn drop(&mut self) {
        unsafe {
            let alloc = self.ptr.as_ref().allocator().clone();
            std::ptr::drop_in_place(self.ptr.as_ptr());
            alloc.dealloc(self.ptr.cast(), Layout::new::<LinkedQueue<A>>());
        }
    }
}

impl<A: RawAlloc + Clone> fmt::Debug for Handle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

pub fn create() -> Result<Handle> {
    create_in(Global)
}

/// Allocate an empty queue header with `alloc`, which also serves its
/// elements.
pub fn create_in<A: RawAlloc + Clone>(alloc: A) -> Result<Handle<A>> {
    let layout = Layout::new::<LinkedQueue<A>>();
    let ptr = match alloc.alloc(layout) {
        Some(ptr) => ptr.cast::<LinkedQueue<A>>(),
        None => {
            debug!("queue allocation failed");
            return Err(QueueError::AllocationFailure);
        }
    };
    unsafe { ptr.as_ptr().write(LinkedQueue::new_in(alloc)) };
    Ok(Handle { ptr })
}

pub fn destroy<A: RawAlloc + Clone>(q: Option<Handle<A>>) {
    drop(q)
}

pub fn insert_head<A: RawAlloc>(q: Option<&mut LinkedQueue<A>>, s: &str) -> Result<()> {
    q.ok_or(QueueError::AllocationFailure)?.insert_head(s)
}

pub fn insert_tail<A: RawAlloc>(q: Option<&mut LinkedQueue<A>>, s: &str) -> Result<()> {
    q.ok_or(QueueError::AllocationFailure)?.insert_tail(s)
}

pub fn remove_head<A: RawAlloc>(
    q: Option<&mut LinkedQueue<A>>,
    buf: Option<&mut [u8]>,
) -> Result<()> {
    q.ok_or(QueueError::InvalidState)?.remove_head(buf)
}

pub fn size<A: RawAlloc>(q: Option<&LinkedQueue<A>>) -> usize {
    q.map_or(0, LinkedQueue::len)
}

pub fn reverse<A: RawAlloc>(q: Option<&mut LinkedQueue<A>>) {
    if let Some(q) = q {
        q.reverse()
    }
}

pub fn sort<A: RawAlloc>(q: Option<&mut LinkedQueue<A>>) {
    if let Some(q) = q {
        q.sort()
    }
}
