//! The in-place vantage-point tree.
//!
//! A built tree is nothing more than the caller's slice, reordered. For
//! any subtree occupying `items[lo..hi]`, `items[lo]` is the vantage
//! point, the remaining items are split at `mid = lo + 1 + (hi - lo - 1) / 2`
//! into a near half `[lo + 1, mid)` and a far half `[mid, hi)`, and the
//! vantage point's threshold is its distance to the median item placed at
//! `items[mid]` when the subtree was split. Building the far half later
//! moves its own vantage point there, so in a finished tree the threshold
//! is the smallest distance from the vantage point to any far item.
//! Thresholds are stored by the caller, through the `save_threshold` and
//! `get_threshold` callbacks.
use std::cmp;
use std::fmt::Debug;

use num::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heap::{BoundedHeap, Ranked};
use crate::median::quick_select_by_key;

/// Distances the tree can work with.
pub trait Scalar: Float + Debug {}
impl<T: Float + Debug> Scalar for T {}

/// Seed for the pivot choices of `build`. Pivots only affect build time,
/// so a fixed seed keeps builds reproducible.
const PARTITION_SEED: u64 = 0x7670_7472_6565;

/// An item found by a search, with its distance to the query.
#[derive(Debug)]
pub struct Neighbour<'a, T: 'a, F> {
    pub item: &'a T,
    pub distance: F,
}

impl<'a, T: 'a, F: Copy> Clone for Neighbour<'a, T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: 'a, F: Copy> Copy for Neighbour<'a, T, F> {}

impl<'a, T: PartialEq + 'a, F: PartialEq> PartialEq for Neighbour<'a, T, F> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.item == other.item
    }
}

impl<'a, T: 'a, F: Scalar> Ranked for Neighbour<'a, T, F> {
    type Distance = F;

    fn rank(&self) -> F {
        self.distance
    }
}

/// Two distinct items of a tree and their separation.
///
/// `a` precedes `b` in the tree's order, but equality ignores the order.
#[derive(Debug)]
pub struct Pair<'a, T: 'a, F> {
    pub a: &'a T,
    pub b: &'a T,
    pub distance: F,
}

impl<'a, T: 'a, F: Copy> Clone for Pair<'a, T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: 'a, F: Copy> Copy for Pair<'a, T, F> {}

impl<'a, T: PartialEq + 'a, F: PartialEq> PartialEq for Pair<'a, T, F> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance &&
            ((self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a))
    }
}

impl<'a, T: 'a, F: Scalar> Ranked for Pair<'a, T, F> {
    type Distance = F;

    fn rank(&self) -> F {
        self.distance
    }
}

/// Reorder `items` into a vantage-point tree.
///
/// `choose_vp` picks the vantage point of each subtree (as an index into
/// the subtree), `measure` must be a metric, and `save_threshold` is
/// called once for every vantage point with its near/far boundary.
///
/// Panics if `choose_vp` returns an index outside the subtree.
pub fn build<T, F, C, M, S>(items: &mut [T], choose_vp: C, measure: M, save_threshold: S)
    where F: Scalar,
          C: FnMut(&[T]) -> usize,
          M: FnMut(&T, &T) -> F,
          S: FnMut(&mut T, F) {

    let mut rng = StdRng::seed_from_u64(PARTITION_SEED);
    build_with_rng(items, &mut rng, choose_vp, measure, save_threshold);
}

/// `build`, drawing the partition pivots from `rng`.
pub fn build_with_rng<T, F, R, C, M, S>(items: &mut [T], rng: &mut R,
                                        mut choose_vp: C, mut measure: M, mut save_threshold: S)
    where F: Scalar,
          R: Rng,
          C: FnMut(&[T]) -> usize,
          M: FnMut(&T, &T) -> F,
          S: FnMut(&mut T, F) {

    build_range(items, rng, &mut choose_vp, &mut measure, &mut save_threshold);
}

fn build_range<T, F, R, C, M, S>(items: &mut [T], rng: &mut R,
                                 choose_vp: &mut C, measure: &mut M, save_threshold: &mut S)
    where F: Scalar,
          R: Rng,
          C: FnMut(&[T]) -> usize,
          M: FnMut(&T, &T) -> F,
          S: FnMut(&mut T, F) {

    let n = items.len();
    if n <= 1 {
        return;
    }

    let chosen = choose_vp(items);
    assert!(chosen < n, "vantage point index {} out of range for {} items", chosen, n);
    items.swap(0, chosen);

    let (head, rest) = items.split_at_mut(1);
    let vp = &mut head[0];
    let mid = rest.len() / 2;

    // Median split by distance from the vantage point.
    quick_select_by_key(rest, mid, rng, &mut |x: &T| measure(vp, x));

    let threshold = measure(vp, &rest[mid]);
    save_threshold(vp, threshold);

    let (near, far) = rest.split_at_mut(mid);
    build_range(near, rng, choose_vp, measure, save_threshold);
    build_range(far, rng, choose_vp, measure, save_threshold);
}

/// Report every item of `tree` within `radius` of `centre`, in no
/// particular order.
///
/// `centre` need not be an item; `measure(item, centre)` only has to
/// agree with the metric the tree was built with.
pub fn find<'a, T, Q, F, M, G, O>(tree: &'a [T], centre: &Q, radius: F,
                                  mut measure: M, mut get_threshold: G, mut on_found: O)
    where Q: ?Sized,
          F: Scalar,
          M: FnMut(&T, &Q) -> F,
          G: FnMut(&T) -> F,
          O: FnMut(&'a T, F) {

    debug_assert!(!(radius < F::zero()), "negative search radius {:?}", radius);
    find_range(tree, centre, radius, &mut measure, &mut get_threshold, &mut on_found);
}

fn find_range<'a, T, Q, F, M, G, O>(range: &'a [T], centre: &Q, radius: F,
                                    measure: &mut M, get_threshold: &mut G, on_found: &mut O)
    where Q: ?Sized,
          F: Scalar,
          M: FnMut(&T, &Q) -> F,
          G: FnMut(&T) -> F,
          O: FnMut(&'a T, F) {

    let (vp, rest) = match range.split_first() {
        Some(split) => split,
        None => return,
    };

    let d = measure(vp, centre);
    if d <= radius {
        on_found(vp, d);
    }
    if rest.is_empty() {
        return;
    }

    let threshold = get_threshold(vp);
    let (near, far) = rest.split_at(rest.len() / 2);
    if d - radius <= threshold {
        find_range(near, centre, radius, measure, get_threshold, on_found);
    }
    if d + radius >= threshold {
        find_range(far, centre, radius, measure, get_threshold, on_found);
    }
}

/// Find the (at most) `k` items closest to `centre` and within `radius`
/// of it, by ascending distance.
///
/// Panics if `k` is zero.
pub fn find_nearest<'a, T, Q, F, M, G>(tree: &'a [T], centre: &Q, radius: F, k: usize,
                                       mut measure: M, mut get_threshold: G) -> Vec<Neighbour<'a, T, F>>
    where Q: ?Sized,
          F: Scalar,
          M: FnMut(&T, &Q) -> F,
          G: FnMut(&T) -> F {

    assert!(k > 0, "nearest-neighbour search needs room for at least one result");
    debug_assert!(!(radius < F::zero()), "negative search radius {:?}", radius);

    let mut heap = BoundedHeap::with_capacity(cmp::max(1, cmp::min(k, tree.len())));
    let mut radius = radius;
    nearest_range(tree, centre, &mut radius, &mut heap, &mut measure, &mut get_threshold);
    heap.into_sorted_vec()
}

fn nearest_range<'a, T, Q, F, M, G>(range: &'a [T], centre: &Q, radius: &mut F,
                                    heap: &mut BoundedHeap<Neighbour<'a, T, F>>,
                                    measure: &mut M, get_threshold: &mut G)
    where Q: ?Sized,
          F: Scalar,
          M: FnMut(&T, &Q) -> F,
          G: FnMut(&T) -> F {

    let (vp, rest) = match range.split_first() {
        Some(split) => split,
        None => return,
    };

    let d = measure(vp, centre);
    if d <= *radius {
        if let Some(bound) = heap.offer(Neighbour { item: vp, distance: d }) {
            if bound < *radius {
                *radius = bound;
            }
        }
    }
    if rest.is_empty() {
        return;
    }

    let threshold = get_threshold(vp);
    let (near, far) = rest.split_at(rest.len() / 2);

    // Search the half the centre falls in first; the radius can only
    // shrink, so the other half is then more likely to be pruned.
    if d < threshold {
        if d - *radius <= threshold {
            nearest_range(near, centre, radius, heap, measure, get_threshold);
        }
        if d + *radius >= threshold {
            nearest_range(far, centre, radius, heap, measure, get_threshold);
        }
    } else {
        if d + *radius >= threshold {
            nearest_range(far, centre, radius, heap, measure, get_threshold);
        }
        if d - *radius <= threshold {
            nearest_range(near, centre, radius, heap, measure, get_threshold);
        }
    }
}

/// Find the (at most) `k` closest pairs of distinct items in `tree`
/// that are no more than `max_separation` apart, by ascending
/// separation.
///
/// Each unordered pair is reported at most once.
///
/// Panics if `k` is zero.
pub fn closest<'a, T, F, M, G>(tree: &'a [T], max_separation: F, k: usize,
                               mut measure: M, mut get_threshold: G) -> Vec<Pair<'a, T, F>>
    where F: Scalar,
          M: FnMut(&T, &T) -> F,
          G: FnMut(&T) -> F {

    assert!(k > 0, "closest-pair search needs room for at least one result");
    debug_assert!(!(max_separation < F::zero()), "negative separation {:?}", max_separation);

    let n = tree.len();
    let pair_count = n.saturating_mul(n.saturating_sub(1)) / 2;
    let mut heap = BoundedHeap::with_capacity(cmp::max(1, cmp::min(k, pair_count)));
    let mut separation = max_separation;

    for (position, target) in tree.iter().enumerate() {
        let mut search = PairSearch {
            target,
            position,
            separation: &mut separation,
            heap: &mut heap,
        };
        search.descend(tree, 0, &mut measure, &mut get_threshold);
    }

    heap.into_sorted_vec()
}

/// One descent of `closest`, pairing `target` with the vantage points
/// that come after it in the tree.
struct PairSearch<'a, 's, T: 'a, F: 's> {
    target: &'a T,
    position: usize,
    separation: &'s mut F,
    heap: &'s mut BoundedHeap<Pair<'a, T, F>>,
}

impl<'a, 's, T: 'a, F: Scalar + 's> PairSearch<'a, 's, T, F> {
    fn descend<M, G>(&mut self, range: &'a [T], offset: usize, measure: &mut M, get_threshold: &mut G)
        where M: FnMut(&T, &T) -> F,
              G: FnMut(&T) -> F {

        // Nothing in this range comes after the target.
        if offset + range.len() <= self.position + 1 {
            return;
        }
        let (vp, rest) = match range.split_first() {
            Some(split) => split,
            None => return,
        };

        let d = measure(vp, self.target);
        if self.position < offset && d <= *self.separation {
            let pair = Pair { a: self.target, b: vp, distance: d };
            if let Some(bound) = self.heap.offer(pair) {
                if bound < *self.separation {
                    *self.separation = bound;
                }
            }
        }
        if rest.is_empty() {
            return;
        }

        let threshold = get_threshold(vp);
        let mid = rest.len() / 2;
        let (near, far) = rest.split_at(mid);
        let (near_offset, far_offset) = (offset + 1, offset + 1 + mid);

        if d < threshold {
            if d - *self.separation <= threshold {
                self.descend(near, near_offset, measure, get_threshold);
            }
            if d + *self.separation >= threshold {
                self.descend(far, far_offset, measure, get_threshold);
            }
        } else {
            if d + *self.separation >= threshold {
                self.descend(far, far_offset, measure, get_threshold);
            }
            if d - *self.separation <= threshold {
                self.descend(near, near_offset, measure, get_threshold);
            }
        }
    }
}
