//! `find_insert` and `find_exact`: the two read-only, lock-free descents
//! that populate per-level predecessor and successor arrays.
//!
//! Advance rule: advance while `succ.end <= a`, i.e. stop at the first
//! successor whose end strictly exceeds `a`. Neither function takes any
//! node lock; the arrays they populate may be stale by the time a caller
//! validates them under locks in [`crate::range_lock`].

use crossbeam::epoch::{Guard, Shared};
use rangelock_core::{Interval, RangeBound};

use crate::node::Node;

/// Descends level by level from `head`, locating the neighborhood into
/// which `query` would be inserted. Also reports the highest level at
/// which `query` overlaps an existing interval.
///
/// Returns `Some(level)` if `succs[level]`'s interval overlaps `query` at
/// some level (the highest such level), `None` if no overlap is observed
/// at any level.
pub(crate) fn find_insert<'g, K: RangeBound>(
    head: Shared<'g, Node<K>>,
    height: usize,
    query: Interval<K>,
    preds: &mut [Shared<'g, Node<K>>],
    succs: &mut [Shared<'g, Node<K>>],
    guard: &'g Guard,
) -> Option<usize> {
    let mut level_found = None;
    let mut pred = head;

    for level in (0..height).rev() {
        let mut curr = unsafe { pred.deref() }.next_at(level, guard);

        while unsafe { curr.deref() }.interval.end <= query.start {
            pred = curr;
            curr = unsafe { pred.deref() }.next_at(level, guard);
        }

        if level_found.is_none() && query.overlaps(&unsafe { curr.deref() }.interval) {
            level_found = Some(level);
        }

        preds[level] = pred;
        succs[level] = curr;
    }

    level_found
}

/// Descends level by level from `head`, locating a node whose interval is
/// exactly `query`.
///
/// Returns `Some(level)` — the highest level at which `succs[level]` has
/// exactly this interval — or `None` if no such node is visible.
pub(crate) fn find_exact<'g, K: RangeBound>(
    head: Shared<'g, Node<K>>,
    height: usize,
    query: Interval<K>,
    preds: &mut [Shared<'g, Node<K>>],
    succs: &mut [Shared<'g, Node<K>>],
    guard: &'g Guard,
) -> Option<usize> {
    let mut level_found = None;
    let mut pred = head;

    for level in (0..height).rev() {
        let mut curr = unsafe { pred.deref() }.next_at(level, guard);

        while unsafe { curr.deref() }.interval.end <= query.start {
            pred = curr;
            curr = unsafe { pred.deref() }.next_at(level, guard);
        }

        if level_found.is_none() && unsafe { curr.deref() }.interval == query {
            level_found = Some(level);
        }

        preds[level] = pred;
        succs[level] = curr;
    }

    level_found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crossbeam::epoch::{self, Owned};

    /// Builds a 2-level list `head -> [0,5) -> [10,15) -> tail` (both nodes
    /// at top_level 0) and checks both navigators against it directly,
    /// without going through `RangeLock`.
    #[test]
    fn find_insert_and_find_exact_agree_on_a_small_list() {
        let guard = &epoch::pin();
        let head = Node::<i32>::sentinel(i32::MIN, 2);
        let tail = Node::<i32>::sentinel(i32::MAX, 2);
        let mid = Node::new(Interval::new(10, 15), 0);
        let first = Node::new(Interval::new(0, 5), 0);

        let tail_shared = Owned::new(tail).into_shared(guard);
        let mid_shared = Owned::new(mid).into_shared(guard);
        let first_shared = Owned::new(first).into_shared(guard);
        let head_shared = Owned::new(head).into_shared(guard);

        for level in 0..2 {
            unsafe { head_shared.deref() }.set_next_at(level, first_shared);
        }
        unsafe { first_shared.deref() }.set_next_at(0, mid_shared);
        unsafe { mid_shared.deref() }.set_next_at(0, tail_shared);

        let mut preds = vec![Shared::null(); 2];
        let mut succs = vec![Shared::null(); 2];

        let found = find_exact(
            head_shared,
            2,
            Interval::new(10, 15),
            &mut preds,
            &mut succs,
            guard,
        );
        assert_eq!(found, Some(0));
        assert_eq!(succs[0], mid_shared);
        assert_eq!(preds[0], first_shared);

        let mut preds = vec![Shared::null(); 2];
        let mut succs = vec![Shared::null(); 2];
        let overlap = find_insert(
            head_shared,
            2,
            Interval::new(3, 4),
            &mut preds,
            &mut succs,
            guard,
        );
        assert_eq!(overlap, Some(0));
        assert_eq!(succs[0], first_shared);

        let mut preds = vec![Shared::null(); 2];
        let mut succs = vec![Shared::null(); 2];
        let no_overlap = find_insert(
            head_shared,
            2,
            Interval::new(5, 10),
            &mut preds,
            &mut succs,
            guard,
        );
        assert_eq!(no_overlap, None);
        assert_eq!(succs[0], mid_shared);

        unsafe {
            guard.defer_destroy(head_shared);
            guard.defer_destroy(first_shared);
            guard.defer_destroy(mid_shared);
            guard.defer_destroy(tail_shared);
        }
    }
}
