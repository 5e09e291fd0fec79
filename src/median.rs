//! In-place selection used to split each subtree around its median.
use rand::Rng;

/// Index of the median of the first three elements of `arr`, given a
/// strict less-than predicate.
///
/// ```
/// use vpindex::median::median_of_three_by;
/// let mut less = |a: &i32, b: &i32| a < b;
/// assert_eq!(median_of_three_by(&[1, 2, 3], &mut less), 1);
/// assert_eq!(median_of_three_by(&[1, 3, 2], &mut less), 2);
/// assert_eq!(median_of_three_by(&[3, 1, 2], &mut less), 2);
/// assert_eq!(median_of_three_by(&[2, 1, 3], &mut less), 0);
/// assert_eq!(median_of_three_by(&[3, 2, 1], &mut less), 1);
/// assert_eq!(median_of_three_by(&[2, 3, 1], &mut less), 0);
/// ```
pub fn median_of_three_by<T, F>(arr: &[T], less: &mut F) -> usize
    where F: FnMut(&T, &T) -> bool {

    let (a, b, c) = (&arr[0], &arr[1], &arr[2]);
    if less(a, b) {
        if less(b, c) { 1 } else if less(a, c) { 2 } else { 0 }
    } else {
        if less(a, c) { 0 } else if less(b, c) { 2 } else { 1 }
    }
}

/// Partial sort the elements by `key` such that `arr[k]` is in its
/// sorted position, the first k elements are all <= it and the
/// remaining elements are all >= it.
///
/// `key` is evaluated about once per element per partitioning round;
/// the pivot's key is computed once and reused. Keys that are
/// incomparable are treated as equal.
///
/// Panics if `arr` is non-empty and `k` is out of bounds.
pub fn quick_select_by_key<T, K, R, F>(arr: &mut [T], k: usize, rng: &mut R, key: &mut F)
    where K: PartialOrd + Copy, R: Rng, F: FnMut(&T) -> K {

    if arr.is_empty() {
        return;
    }
    assert!(k < arr.len(), "selection index {} out of bounds for {} elements", k, arr.len());

    let mut lo = 0;
    let mut hi = arr.len();
    let mut k = k;

    loop {
        let sub = &mut arr[lo..hi];
        let n = sub.len();
        if n <= 1 {
            return;
        }
        if n == 2 {
            // order the elements and return
            if key(&sub[1]) < key(&sub[0]) {
                sub.swap(0, 1);
            }
            return;
        }

        // Choose a random pivot (the median among three random elements)
        sub.swap(0, rng.gen_range(0..n));
        sub.swap(1, rng.gen_range(1..n));
        sub.swap(2, rng.gen_range(2..n));
        let sample = [key(&sub[0]), key(&sub[1]), key(&sub[2])];
        let mid_idx = median_of_three_by(&sample, &mut |a: &K, b: &K| a < b);
        let pivot = sample[mid_idx];
        sub.swap(0, mid_idx);

        // Three-way partition of sub[1..] around the pivot at sub[0]:
        // [1, lt) < pivot, [lt, i) == pivot, [gt, n) > pivot.
        let mut lt = 1;
        let mut i = 1;
        let mut gt = n;
        while i < gt {
            let ki = key(&sub[i]);
            if ki < pivot {
                sub.swap(i, lt);
                lt += 1;
                i += 1;
            } else if pivot < ki {
                gt -= 1;
                sub.swap(i, gt);
            } else {
                i += 1;
            }
        }

        // Move the pivot into the run of equal elements.
        sub.swap(0, lt - 1);
        let eq_start = lt - 1;

        // Continue on (at most) one side
        if k < eq_start {
            hi = lo + eq_start;
        } else if k >= gt {
            lo += gt;
            k -= gt;
        } else {
            return;
        }
    }
}
