//! The interval node: one currently-reserved `[start, end)` range, plus the
//! per-level forward pointers and lifecycle flags that make it a skip list
//! element.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::epoch::{Atomic, Guard, Shared};
use parking_lot::Mutex;
use rangelock_core::{Interval, RangeBound};

/// One node of the skip list backbone.
///
/// `interval`/`top_level` are immutable after construction. `next[..]`,
/// `fully_linked`, and `marked` are the mutable parts: `next[..]` is only
/// ever written while holding `write_lock`, but is read lock-free through
/// `crossbeam`'s epoch guard so that a node physically unlinked by a
/// concurrent `release_lock` is never freed while another thread's
/// `find_insert`/`find_exact` still holds a reference to it (the navigator
/// never takes a lock — see [`crate::navigator`]).
pub(crate) struct Node<K> {
    pub(crate) interval: Interval<K>,
    pub(crate) top_level: usize,
    pub(crate) next: Box<[Atomic<Node<K>>]>,
    pub(crate) fully_linked: AtomicBool,
    pub(crate) marked: AtomicBool,
    /// Guards transitions of `next[..]`, `fully_linked`, and `marked`.
    /// Readers never take this lock; only `try_lock`/`release_lock` do,
    /// bottom-up, per the ordering discipline in the crate's module docs.
    pub(crate) write_lock: Mutex<()>,
}

impl<K: RangeBound> Node<K> {
    /// Allocates a node with `height + 1` occupied levels (`0..=top_level`).
    pub(crate) fn new(interval: Interval<K>, top_level: usize) -> Self {
        let next = (0..=top_level).map(|_| Atomic::null()).collect();
        Self {
            interval,
            top_level,
            next,
            fully_linked: AtomicBool::new(false),
            marked: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    /// Allocates the head or tail sentinel: `[bound, bound)`, occupying
    /// every level `0..height`, fully linked from the moment it's published
    /// since sentinels never transition.
    pub(crate) fn sentinel(bound: K, height: usize) -> Self {
        let node = Self::new(Interval::new(bound, bound), height - 1);
        node.fully_linked.store(true, Ordering::Release);
        node
    }

    #[inline]
    pub(crate) fn is_fully_linked(&self) -> bool {
        self.fully_linked.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn is_marked(&self) -> bool {
        self.marked.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn next_at<'g>(&self, level: usize, guard: &'g Guard) -> Shared<'g, Node<K>> {
        self.next[level].load(Ordering::Acquire, guard)
    }

    /// Publishing store: must only be called while holding `write_lock`.
    #[inline]
    pub(crate) fn set_next_at(&self, level: usize, value: Shared<'_, Node<K>>) {
        self.next[level].store(value, Ordering::Release);
    }
}
