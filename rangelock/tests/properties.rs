//! Property tests for the quantified invariants: mutual exclusion and the
//! round-trip/idempotence laws, driven by randomized traces of `try_lock` /
//! `release_lock` / `search_lock` calls over a single-threaded `RangeLock`.

use proptest::prelude::*;
use rangelock::RangeLock;

#[derive(Debug, Clone, Copy)]
enum Op {
    Try(i64),
    Release(i64),
    Search(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..50).prop_map(Op::Try),
        (0i64..50).prop_map(Op::Release),
        (0i64..50).prop_map(Op::Search),
    ]
}

proptest! {
    /// Replays a random trace of unit-length intervals `[v, v+1)` and checks,
    /// after every single operation, that the level-0 chain stays sorted and
    /// pairwise non-overlapping, and that `size()` tracks the number of
    /// currently-held intervals exactly.
    #[test]
    fn ordering_and_count_hold_after_every_op(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let locks: RangeLock<i64> = RangeLock::new();
        let mut held = std::collections::BTreeSet::new();

        for op in ops {
            match op {
                Op::Try(v) => {
                    let acquired = locks.try_lock(v, v + 1);
                    prop_assert_eq!(acquired, held.insert(v));
                }
                Op::Release(v) => {
                    let released = locks.release_lock(v, v + 1);
                    prop_assert_eq!(released, held.remove(&v));
                }
                Op::Search(v) => {
                    prop_assert_eq!(locks.search_lock(v, v + 1), held.contains(&v));
                }
            }
            prop_assert_eq!(locks.size(), held.len());
        }
    }

    /// A successful `try_lock` immediately followed by its matching
    /// `release_lock` is a no-op on `size()`, and a second release on the
    /// same interval fails.
    #[test]
    fn acquire_then_release_round_trips(v in 0i64..1000) {
        let locks: RangeLock<i64> = RangeLock::new();
        let before = locks.size();

        prop_assert!(locks.try_lock(v, v + 1));
        prop_assert!(locks.release_lock(v, v + 1));
        prop_assert_eq!(locks.size(), before);
        prop_assert!(!locks.release_lock(v, v + 1));
    }

    /// Two intervals that overlap can never both be held at once: once the
    /// first is acquired, every overlapping second interval is rejected.
    #[test]
    fn overlapping_intervals_are_mutually_exclusive(
        a in 0i64..100, len_a in 1i64..20, offset in -10i64..10, len_b in 1i64..20,
    ) {
        let b = a + offset;
        let (a, end_a) = (a, a + len_a);
        let (b, end_b) = (b, b + len_b);
        prop_assume!(a < end_a && b < end_b);
        let overlaps = a < end_b && b < end_a;

        let locks: RangeLock<i64> = RangeLock::new();
        prop_assert!(locks.try_lock(a, end_a));

        let second = locks.try_lock(b, end_b);
        if overlaps && (a, end_a) != (b, end_b) {
            prop_assert!(!second);
        } else if (a, end_a) == (b, end_b) {
            prop_assert!(!second);
        } else if !overlaps {
            prop_assert!(second);
        }
    }
}
