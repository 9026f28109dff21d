use super::node::{Link, Node};

use std::cell::Cell;
use std::cmp::Ordering;

/// Chains given up by sort frames that unwound, e.g. on a panicking `cmp`.
#[derive(Default)]
pub(crate) struct Spill(Cell<Link>);

impl Spill {
    pub(crate) fn take(&self) -> Link {
        self.0.take()
    }

    // cond: `chain` is terminated and shares no node with the spilled chains
    unsafe fn push(&self, chain: Link) {
        if let Some(mut end) = last(chain) {
            end.as_mut().next = self.0.take();
            self.0.set(chain);
        }
    }
}

// Chains a frame owns while `cmp` may run. Whatever is still held on drop
// goes to the spill.
struct Held<'s> {
    merged: Link,
    left: Link,
    right: Link,
    spill: &'s Spill,
}

impl<'s> Held<'s> {
    fn new(spill: &'s Spill) -> Self {
        Self {
            merged: None,
            left: None,
            right: None,
            spill,
        }
    }
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        unsafe {
            self.spill.push(self.merged.take());
            self.spill.push(self.left.take());
            self.spill.push(self.right.take());
        }
    }
}

// cond: `head` is a well-formed, acyclic chain of live nodes
pub(crate) unsafe fn sort<F>(head: Link, cmp: &mut F, spill: &Spill) -> Link
where
    F: FnMut(&str, &str) -> Ordering,
{
    let (left, right) = split(head);
    if right.is_none() {
        return left;
    }
    let mut held = Held::new(spill);
    held.right = right;
    held.left = sort(left, cmp, spill);
    held.right = sort(held.right.take(), cmp, spill);
    merge(held.left.take(), held.right.take(), cmp, spill)
}

/// Cut the chain after its midpoint. The first half keeps the extra node
/// when the length is odd.
pub(crate) unsafe fn split(head: Link) -> (Link, Link) {
    let mut slow = match head {
        Some(node) => node,
        None => return (None, None),
    };
    let mut fast = slow.as_ref().next;
    while let Some(f) = fast {
        fast = match f.as_ref().next {
            Some(f2) => f2.as_ref().next,
            None => break,
        };
        if let Some(s) = slow.as_ref().next {
            slow = s;
        }
    }
    let rest = slow.as_mut().next.take();
    (head, rest)
}

/// Merge two sorted chains. On equal keys the node from `left` goes first.
pub(crate) unsafe fn merge<F>(left: Link, right: Link, cmp: &mut F, spill: &Spill) -> Link
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut held = Held::new(spill);
    held.left = left;
    held.right = right;

    // invariant: `merged` is terminated whenever `cmp` runs
    let mut tail: *mut Link = &mut held.merged;
    while let (Some(mut l), Some(mut r)) = (held.left, held.right) {
        let node = if cmp(Node::value(r), Node::value(l)) == Ordering::Less {
            held.right = r.as_mut().next.take();
            r
        } else {
            held.left = l.as_mut().next.take();
            l
        };
        *tail = Some(node);
        tail = &mut (*node.as_ptr()).next;
    }
    let rest = held.left.take().or(held.right.take());
    *tail = rest;
    held.merged.take()
}

pub(crate) unsafe fn last(head: Link) -> Link {
    let mut cur = head?;
    while let Some(next) = cur.as_ref().next {
        cur = next;
    }
    Some(cur)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cmp::natural_cmp;
    use crate::raw::TrackingAlloc;

    fn chain(alloc: &TrackingAlloc, values: &[&str]) -> Link {
        let mut head: Link = None;
        for s in values.iter().rev() {
            let mut node = Node::alloc(alloc, s).unwrap();
            unsafe { node.as_mut().next = head };
            head = Some(node);
        }
        head
    }

    fn drain(alloc: &TrackingAlloc, mut head: Link) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(node) = head {
            unsafe {
                out.push(Node::value(node).to_owned());
                head = node.as_ref().next;
                Node::dealloc(alloc, node);
            }
        }
        out
    }

    #[test]
    fn test_split() {
        let alloc = TrackingAlloc::new();
        for n in 0..7 {
            let values: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            let (left, right) = unsafe { split(chain(&alloc, &refs)) };
            let left = drain(&alloc, left);
            let right = drain(&alloc, right);
            assert_eq!(left.len(), (n + 1) / 2);
            assert_eq!(right.len(), n / 2);
            assert_eq!([left, right].concat(), values);
        }
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn test_merge_prefers_left_on_ties() {
        let alloc = TrackingAlloc::new();
        let left = chain(&alloc, &["a1", "c1"]);
        let right = chain(&alloc, &["a2", "b2", "c2"]);
        let mut by_letter = |a: &str, b: &str| a[..1].cmp(&b[..1]);

        let merged = unsafe { merge(left, right, &mut by_letter, &Spill::default()) };
        assert_eq!(drain(&alloc, merged), ["a1", "a2", "b2", "c1", "c2"]);
    }

    #[test]
    fn test_sort_relinks_without_allocating() {
        let alloc = TrackingAlloc::new();
        let head = chain(&alloc, &["item2", "item10", "item1", "b", "a", "item2"]);
        let before = alloc.allocations();

        let sorted = unsafe { sort(head, &mut natural_cmp, &Spill::default()) };
        assert_eq!(alloc.allocations(), before);
        assert_eq!(alloc.frees(), 0);
        assert_eq!(unsafe { Node::value(last(sorted).unwrap()) }, "item10");

        assert_eq!(
            drain(&alloc, sorted),
            ["a", "b", "item1", "item2", "item2", "item10"]
        );
        assert_eq!(alloc.live(), 0);
    }
}
