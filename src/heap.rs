//! Fixed-capacity max-heap keeping the best K candidates of a query.
use crate::index::Scalar;

/// An entry that can be ranked by a distance.
pub trait Ranked {
    type Distance: Scalar;

    fn rank(&self) -> Self::Distance;
}

/// A max-heap of at most `capacity` entries, with the worst (largest
/// rank) entry on top.
///
/// The backing storage is allocated once, at creation, and never grows.
#[derive(Debug, Clone)]
pub struct BoundedHeap<E> {
    entries: Vec<E>,
    capacity: usize,
}

impl<E: Ranked> BoundedHeap<E> {
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "a bounded heap needs at least one slot");
        BoundedHeap { entries: Vec::with_capacity(capacity), capacity }
    }

    fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Insert into a heap that is not yet full.
    ///
    /// Panics when the heap is full.
    fn push(&mut self, entry: E) {
        assert!(!self.is_full(), "push into a full bounded heap");
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        self.sift_up(last);
    }

    /// Replace the worst entry, returning it.
    ///
    /// Panics when the heap is empty.
    fn replace_worst(&mut self, entry: E) -> E {
        let old = std::mem::replace(&mut self.entries[0], entry);
        let len = self.entries.len();
        self.sift_down(0, len);
        old
    }

    /// Keep `entry` if there is room, or if it is strictly better than
    /// the current worst entry.
    ///
    /// Returns the pruning bound: the worst kept rank once the heap is
    /// full, `None` before that.
    pub fn offer(&mut self, entry: E) -> Option<E::Distance> {
        if !self.is_full() {
            self.push(entry);
        } else if entry.rank() < self.entries[0].rank() {
            self.replace_worst(entry);
        }

        if self.is_full() {
            Some(self.entries[0].rank())
        } else {
            None
        }
    }

    /// Consume the heap, returning its entries by ascending rank.
    pub fn into_sorted_vec(mut self) -> Vec<E> {
        let mut end = self.entries.len();
        while end > 1 {
            end -= 1;
            self.entries.swap(0, end);
            self.sift_down(0, end);
        }
        self.entries
    }

    fn greater(&self, a: usize, b: usize) -> bool {
        self.entries[a].rank() > self.entries[b].rank()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.greater(pos, parent) {
                break;
            }
            self.entries.swap(pos, parent);
            pos = parent;
        }
    }

    /// Restore the heap property below `pos`, considering only `[0, end)`.
    fn sift_down(&mut self, mut pos: usize, end: usize) {
        loop {
            let left = 2 * pos + 1;
            if left >= end {
                break;
            }
            let right = left + 1;
            let child = if right < end && self.greater(right, left) { right } else { left };
            if !self.greater(child, pos) {
                break;
            }
            self.entries.swap(pos, child);
            pos = child;
        }
    }
}
