//! Range-lock core: `try_lock`, `release_lock`, `search_lock`, orchestrated
//! on top of the node, navigator, and height sampler modules.
//!
//! Uses `crossbeam::epoch` for lock-free reads and safe reclamation,
//! `parking_lot::Mutex` for the per-node write lock, and `rand`'s `StdRng`
//! for the height sampler.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::epoch::{self, Atomic, Owned, Shared};
use parking_lot::MutexGuard;
use rangelock_core::{Interval, RangeBound};

use crate::config::RangeLockConfig;
use crate::height::HeightSampler;
use crate::navigator::{find_exact, find_insert};
use crate::node::Node;

/// A concurrent range lock over half-open intervals `[start, end)` drawn
/// from `K`.
///
/// Acquiring `[a, b)` (via [`try_lock`](RangeLock::try_lock)) succeeds iff
/// no currently-held range overlaps it. Non-overlapping ranges proceed in
/// parallel; the structure has no global critical section. See the crate
/// documentation for the full contract.
pub struct RangeLock<K: RangeBound> {
    head: Atomic<Node<K>>,
    tail: Atomic<Node<K>>,
    height: usize,
    element_count: AtomicUsize,
    sampler: HeightSampler,
}

impl<K: RangeBound> RangeLock<K> {
    /// Creates a new, empty range lock with the default configuration
    /// (height 16).
    pub fn new() -> Self {
        Self::with_config(RangeLockConfig::default())
            .expect("default RangeLockConfig always has height >= 1")
    }

    /// Creates a new, empty range lock with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`rangelock_core::Error::InvalidHeight`] if
    /// `config.height == 0`.
    pub fn with_config(config: RangeLockConfig) -> rangelock_core::Result<Self> {
        if config.height == 0 {
            return Err(rangelock_core::Error::InvalidHeight(config.height));
        }

        let head = Atomic::new(Node::sentinel(K::MIN, config.height));
        let tail = Atomic::new(Node::sentinel(K::MAX, config.height));

        {
            let guard = &epoch::pin();
            let head_shared = head.load(Ordering::Relaxed, guard);
            let tail_shared = tail.load(Ordering::Relaxed, guard);
            for level in 0..config.height {
                unsafe { head_shared.deref() }.set_next_at(level, tail_shared);
            }
        }

        Self {
            head,
            tail,
            height: config.height,
            element_count: AtomicUsize::new(0),
            sampler: HeightSampler::new(config.height),
        }
    }

    /// The number of currently-held ranges (excludes the head/tail
    /// sentinels).
    pub fn size(&self) -> usize {
        self.element_count.load(Ordering::Relaxed)
    }

    /// Attempts to acquire exclusive access to `[a, b)`.
    ///
    /// Returns `true` and publishes a new node representing `[a, b)` iff no
    /// live node's interval overlaps it; returns `false` otherwise.
    /// Rejects degenerate intervals (`a >= b`) by returning `false`.
    pub fn try_lock(&self, a: K, b: K) -> bool {
        let query = Interval::new(a, b);
        if !query.is_valid() {
            log::trace!("try_lock: rejected degenerate interval {a:?}..{b:?}");
            return false;
        }

        let top_level = self.sampler.sample();
        let guard = &epoch::pin();

        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let mut preds = vec![Shared::null(); self.height];
            let mut succs = vec![Shared::null(); self.height];

            if let Some(level_found) =
                find_insert(head, self.height, query, &mut preds, &mut succs, guard)
            {
                let witness = succs[level_found];
                let witness_ref = unsafe { witness.deref() };

                if !witness_ref.is_marked() {
                    while !witness_ref.is_fully_linked() {
                        std::hint::spin_loop();
                    }
                    log::trace!("try_lock: {a:?}..{b:?} overlaps a live range");
                    return false;
                }

                // The witness is mid-removal; the overlap is transient. Retry.
                continue;
            }

            let (locked, valid) = lock_and_validate(&preds, &succs, top_level, guard);
            if !valid {
                drop(locked);
                continue;
            }

            let new_node = Owned::new(Node::new(query, top_level)).into_shared(guard);
            let new_node_ref = unsafe { new_node.deref() };
            for level in 0..=top_level {
                new_node_ref.set_next_at(level, succs[level]);
            }
            for level in 0..=top_level {
                unsafe { preds[level].deref() }.set_next_at(level, new_node);
            }
            new_node_ref
                .fully_linked
                .store(true, Ordering::Release);

            drop(locked);
            self.element_count.fetch_add(1, Ordering::Relaxed);
            log::debug!("try_lock: acquired {a:?}..{b:?} at height {}", top_level + 1);
            return true;
        }
    }

    /// Releases the node whose interval is exactly `[a, b)`.
    ///
    /// Returns `true` on success, `false` if no such fully-linked, unmarked
    /// node exists (including the double-release case).
    pub fn release_lock(&self, a: K, b: K) -> bool {
        let query = Interval::new(a, b);
        let guard = &epoch::pin();
        let mut victim: Option<Shared<'_, Node<K>>> = None;
        let mut victim_lock: Option<MutexGuard<'_, ()>> = None;
        let mut top_level = 0usize;

        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            let mut preds = vec![Shared::null(); self.height];
            let mut succs = vec![Shared::null(); self.height];
            let level_found = find_exact(head, self.height, query, &mut preds, &mut succs, guard);

            if victim.is_none() {
                let candidate = match level_found {
                    Some(level) => {
                        let candidate_ref = unsafe { succs[level].deref() };
                        (candidate_ref.top_level == level && !candidate_ref.is_marked())
                            .then_some(succs[level])
                    }
                    None => None,
                };

                let Some(candidate) = candidate else {
                    log::trace!("release_lock: no live range {a:?}..{b:?}");
                    return false;
                };

                let candidate_ref = unsafe { candidate.deref() };
                let lock = candidate_ref.write_lock.lock();
                if candidate_ref.is_marked() {
                    // Lost the race to another releaser.
                    return false;
                }
                candidate_ref.marked.store(true, Ordering::Release);

                top_level = candidate_ref.top_level;
                victim = Some(candidate);
                victim_lock = Some(lock);
            }

            let victim_shared = victim.expect("victim set above");
            let victim_ptr = victim_shared.as_raw();

            let mut locked: Vec<MutexGuard<'_, ()>> = Vec::with_capacity(top_level + 1);
            let mut locked_ptrs: Vec<*const Node<K>> = Vec::with_capacity(top_level + 1);
            let mut valid = true;

            for level in 0..=top_level {
                let pred_ptr = preds[level].as_raw();
                if pred_ptr == victim_ptr || locked_ptrs.contains(&pred_ptr) {
                    continue;
                }
                let pred_ref = unsafe { preds[level].deref() };
                locked.push(pred_ref.write_lock.lock());
                locked_ptrs.push(pred_ptr);
            }

            for level in 0..=top_level {
                let pred_ref = unsafe { preds[level].deref() };
                if pred_ref.is_marked() || pred_ref.next_at(level, guard) != victim_shared {
                    valid = false;
                    break;
                }
            }

            if !valid {
                drop(locked);
                continue;
            }

            for level in (0..=top_level).rev() {
                let pred_ref = unsafe { preds[level].deref() };
                let victim_ref = unsafe { victim_shared.deref() };
                pred_ref.set_next_at(level, victim_ref.next_at(level, guard));
            }

            drop(locked);
            drop(victim_lock.take());
            self.element_count.fetch_sub(1, Ordering::Relaxed);
            // Safety: victim is marked, physically unlinked at every level it
            // occupied, and was allocated by `Owned::new` in `try_lock`.
            unsafe {
                guard.defer_destroy(victim_shared);
            }
            log::debug!("release_lock: released {a:?}..{b:?}");
            return true;
        }
    }

    /// Returns `true` iff a node with interval exactly `[a, b)` exists, is
    /// fully linked, and is unmarked, at some instant during the call.
    /// Takes no locks and has no side effects.
    pub fn search_lock(&self, a: K, b: K) -> bool {
        let query = Interval::new(a, b);
        let guard = &epoch::pin();
        let head = self.head.load(Ordering::Acquire, guard);
        let mut preds = vec![Shared::null(); self.height];
        let mut succs = vec![Shared::null(); self.height];

        match find_exact(head, self.height, query, &mut preds, &mut succs, guard) {
            Some(level) => {
                let node = unsafe { succs[level].deref() };
                node.is_fully_linked() && !node.is_marked()
            }
            None => false,
        }
    }

    /// Dumps the list, level by level, for debugging. Not part of the
    /// concurrency contract: reads are unsynchronized with concurrent
    /// mutation and the output is only a best-effort snapshot.
    pub fn display_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let guard = &epoch::pin();
        let tail = self.tail.load(Ordering::Acquire, guard);
        let head = self.head.load(Ordering::Acquire, guard);

        writeln!(writer, "RangeLock ({} live)", self.size())?;

        let mut row = unsafe { head.deref() }.next_at(0, guard);
        let mut rows: Vec<Shared<'_, Node<K>>> = Vec::new();
        while row != tail {
            rows.push(row);
            row = unsafe { row.deref() }.next_at(0, guard);
        }

        if rows.is_empty() {
            writeln!(writer, "  (empty)")?;
            return Ok(());
        }

        for level in (0..self.height).rev() {
            write!(writer, "  L{level:>2}: head ")?;
            for node in &rows {
                let node_ref = unsafe { node.deref() };
                if node_ref.top_level >= level {
                    write!(
                        writer,
                        "->[{:02?},{:02?})",
                        node_ref.interval.start, node_ref.interval.end
                    )?;
                } else {
                    write!(writer, "---------")?;
                }
            }
            writeln!(writer, " -> tail")?;
        }

        Ok(())
    }
}

/// Acquires the per-node write lock on every distinct `preds[0..=top_level]`
/// node (bottom-up, skipping duplicates — a single predecessor may occupy
/// several levels), then validates that none of `preds`/`succs` has been
/// marked and that each `preds[level]` still points at `succs[level]`.
///
/// Returns the held locks (released when dropped) and whether validation
/// passed. On failure the caller must drop the locks and retry from the
/// navigator.
fn lock_and_validate<'g, K: RangeBound>(
    preds: &[Shared<'g, Node<K>>],
    succs: &[Shared<'g, Node<K>>],
    top_level: usize,
    guard: &'g epoch::Guard,
) -> (Vec<MutexGuard<'g, ()>>, bool) {
    let mut locked = Vec::with_capacity(top_level + 1);
    let mut locked_ptrs: Vec<*const Node<K>> = Vec::with_capacity(top_level + 1);

    for level in 0..=top_level {
        let pred_ptr = preds[level].as_raw();
        if locked_ptrs.contains(&pred_ptr) {
            continue;
        }
        let pred_ref = unsafe { preds[level].deref() };
        locked.push(pred_ref.write_lock.lock());
        locked_ptrs.push(pred_ptr);
    }

    let mut valid = true;
    for level in 0..=top_level {
        let pred_ref = unsafe { preds[level].deref() };
        let succ_ref = unsafe { succs[level].deref() };
        if pred_ref.is_marked() || succ_ref.is_marked() || pred_ref.next_at(level, guard) != succs[level] {
            valid = false;
            break;
        }
    }

    (locked, valid)
}

impl<K: RangeBound> Default for RangeLock<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RangeBound> std::fmt::Debug for RangeLock<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = Vec::new();
        self.display_to(&mut buf).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

impl<K: RangeBound> Drop for RangeLock<K> {
    fn drop(&mut self) {
        // Every node still reachable at this point is unreachable from any
        // other thread (we have `&mut self`), so immediate reclamation is
        // sound without waiting on the epoch.
        let guard = &epoch::pin();
        let tail = self.tail.load(Ordering::Relaxed, guard);
        let mut curr = self.head.load(Ordering::Relaxed, guard);

        while curr != tail {
            let next = unsafe { curr.deref() }.next_at(0, guard);
            unsafe {
                guard.defer_destroy(curr);
            }
            curr = next;
        }
        unsafe {
            guard.defer_destroy(tail);
        }
    }
}
