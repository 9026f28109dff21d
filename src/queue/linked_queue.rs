use super::merge_sort::{self, Spill};
use super::node::{Link, Node};
use crate::cmp::natural_cmp;
use crate::error::{QueueError, Result};
use crate::raw::{Global, RawAlloc};

use log::{debug, trace};

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Queue of owned strings on a singly-linked list with head and tail links.
///
/// Inserting at either end and removing at the head are `O(1)`. `reverse`
/// and `sort` relink the existing nodes and never allocate.
pub struct LinkedQueue<A: RawAlloc = Global> {
    head: Link,
    tail: Link,
    len: usize,
    alloc: A,
    _marker: PhantomData<Box<Node>>,
}

// invariant: head.is_none() == tail.is_none() == (len == 0),
// walking `next` from head visits len nodes and ends at tail

unsafe impl<A: RawAlloc + Send> Send for LinkedQueue<A> {}
unsafe impl<A: RawAlloc + Sync> Sync for LinkedQueue<A> {}

impl LinkedQueue<Global> {
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<A: RawAlloc> LinkedQueue<A> {
    pub fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn front(&self) -> Option<&str> {
        self.head.map(|ptr| unsafe { Node::value(ptr) })
    }

    pub fn back(&self) -> Option<&str> {
        self.tail.map(|ptr| unsafe { Node::value(ptr) })
    }

    fn alloc_node(&self, s: &str) -> Result<NonNull<Node>> {
        Node::alloc(&self.alloc, s).ok_or_else(|| {
            debug!("node allocation failed, queue left at len {}", self.len);
            QueueError::AllocationFailure
        })
    }

    /// Copy `s` into a new element placed before the current head.
    ///
    /// On `AllocationFailure` the queue is unchanged and nothing leaks.
    pub fn insert_head(&mut self, s: &str) -> Result<()> {
        let mut node = self.alloc_node(s)?;
        unsafe { node.as_mut().next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Copy `s` into a new element placed after the current tail.
    pub fn insert_tail(&mut self, s: &str) -> Result<()> {
        let node = self.alloc_node(s)?;
        match self.tail {
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    fn unlink_head(&mut self) -> Option<NonNull<Node>> {
        let node = self.head?;
        self.head = unsafe { node.as_ref().next };
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node)
    }

    /// Drop the head element, copying its value into `buf` first.
    ///
    /// At most `buf.len() - 1` bytes are copied and the rest of `buf` is
    /// zeroed, so the result is always NUL-terminated; longer values are
    /// silently truncated. An empty `buf` receives nothing.
    ///
    /// Fails with `InvalidState` on an empty queue, leaving it untouched.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Result<()> {
        let node = self.unlink_head().ok_or(QueueError::InvalidState)?;
        unsafe {
            if let Some(buf) = buf {
                copy_truncated(node.as_ref().value.as_bytes(), buf);
            }
            Node::dealloc(&self.alloc, node);
        }
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<String> {
        let node = self.unlink_head()?;
        unsafe {
            let value = Node::value(node).to_owned();
            Node::dealloc(&self.alloc, node);
            Some(value)
        }
    }

    pub fn clear(&mut self) {
        let mut cur = self.head.take();
        self.tail = None;
        self.len = 0;
        while let Some(node) = cur {
            unsafe {
                cur = node.as_ref().next;
                Node::dealloc(&self.alloc, node);
            }
        }
    }

    pub fn reverse(&mut self) {
        if self.len < 2 {
            return;
        }
        trace!("reversing {} elements", self.len);

        let mut prev: Link = None;
        let mut cur = self.head;
        while let Some(mut node) = cur {
            unsafe {
                cur = node.as_ref().next;
                node.as_mut().next = prev;
            }
            prev = Some(node);
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    /// Sort ascending in natural order (see [`natural_cmp`]).
    pub fn sort(&mut self) {
        self.sort_by(natural_cmp)
    }

    /// Stable merge sort with a caller-supplied order.
    ///
    /// If `cmp` panics, every element stays in the queue in an unspecified
    /// order.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        trace!("sorting {} elements", self.len);

        let spill = Spill::default();
        let mut guard = SortGuard {
            queue: self,
            spill: &spill,
        };
        let head = guard.queue.head.take();
        guard.queue.head = unsafe { merge_sort::sort(head, &mut cmp, &spill) };
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

// Relinks head and tail once sorting ends, normally or by unwinding.
struct SortGuard<'a, A: RawAlloc> {
    queue: &'a mut LinkedQueue<A>,
    spill: &'a Spill,
}

impl<A: RawAlloc> Drop for SortGuard<'_, A> {
    fn drop(&mut self) {
        let queue = &mut *self.queue;
        if queue.head.is_none() {
            debug!("sort unwound, relinking {} elements", queue.len);
            queue.head = self.spill.take();
        }
        queue.tail = unsafe { merge_sort::last(queue.head) };
    }
}

fn copy_truncated(src: &[u8], buf: &mut [u8]) {
    let cap = match buf.len().checked_sub(1) {
        Some(cap) => cap,
        None => return,
    };
    let n = src.len().min(cap);
    buf[..n].copy_from_slice(&src[..n]);
    for b in &mut buf[n..] {
        *b = 0;
    }
}

impl<A: RawAlloc> Drop for LinkedQueue<A> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<A: RawAlloc + Default> Default for LinkedQueue<A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<A: RawAlloc> fmt::Debug for LinkedQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ------------------------------------
// begin: IterOwned

pub struct IterOwned<A: RawAlloc = Global>(LinkedQueue<A>);

impl<A: RawAlloc> Iterator for IterOwned<A> {
    type Item = String;
    fn next(&mut self) -> Option<String> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<A: RawAlloc> IntoIterator for LinkedQueue<A> {
    type Item = String;
    type IntoIter = IterOwned<A>;

    fn into_iter(self) -> IterOwned<A> {
        IterOwned(self)
    }
}

impl<A: RawAlloc> ExactSizeIterator for IterOwned<A> {
    fn len(&self) -> usize {
        self.0.len
    }
}

impl<A: RawAlloc> FusedIterator for IterOwned<A> {}

// end: IterOwned
// ------------------------------------

// ------------------------------------
// begin: Iter

pub struct Iter<'a> {
    next: Link,
    len: usize,
    _marker: PhantomData<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<&'a str> {
        let node = self.next?;
        unsafe {
            self.next = node.as_ref().next;
            self.len -= 1;
            Some(Node::value(node))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, A: RawAlloc> IntoIterator for &'a LinkedQueue<A> {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a> FusedIterator for Iter<'a> {}

// end: Iter
// ------------------------------------
