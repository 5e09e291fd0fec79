//! Vantage point selection.
//!
//! The choice never affects which items a query finds, only how well
//! the tree prunes.
use rand::Rng;

use crate::index::Scalar;

/// How `VPTree` picks the vantage point of each subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VantageStrategy {
    /// Always the first item of the subtree.
    First,
    /// A uniformly random item.
    Random,
    /// The item farthest from a random item. Costs one extra distance
    /// per item and level, but tends to produce a more even split.
    Spread,
}

impl Default for VantageStrategy {
    fn default() -> Self {
        VantageStrategy::Random
    }
}

/// Use the first item of every subtree.
pub fn first<T>(_: &[T]) -> usize {
    0
}

/// Use a uniformly random item of every subtree.
pub fn random<'r, T: 'r, R: Rng>(rng: &'r mut R) -> impl FnMut(&[T]) -> usize + 'r {
    move |items: &[T]| rng.gen_range(0..items.len())
}

/// Randomly select an item, and choose the item furthest from it.
pub fn spread<'r, T, F, R, M>(rng: &'r mut R, mut measure: M) -> impl FnMut(&[T]) -> usize + 'r
    where T: 'r, F: Scalar + 'r, R: Rng, M: FnMut(&T, &T) -> F + 'r {

    move |items: &[T]| {
        let random_item = &items[rng.gen_range(0..items.len())];

        let mut farthest = (F::zero(), 0);
        for (i, y) in items.iter().enumerate() {
            let d = measure(random_item, y);
            if d > farthest.0 {
                farthest = (d, i);
            }
        }
        farthest.1
    }
}


#[cfg(test)]
mod tests {
    use super::{first, random, spread};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_is_zero() {
        assert_eq!(first(&[3, 2, 1]), 0);
    }

    #[test]
    fn random_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut choose = random(&mut rng);
        let items = [0u8; 7];
        for _ in 0..100 {
            assert!(choose(&items) < items.len());
        }
    }

    #[test]
    fn spread_picks_an_extreme() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = [4.0f64, 0.0, 5.0, 10.0, 6.0];
        let mut choose = spread(&mut rng, |a: &f64, b: &f64| (a - b).abs());
        for _ in 0..20 {
            let i = choose(&items);
            assert!(i == 1 || i == 3, "chose {}", items[i]);
        }
    }

    #[test]
    fn spread_of_coincident_items() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = [2.0f64; 4];
        let mut choose = spread(&mut rng, |a: &f64, b: &f64| (a - b).abs());
        assert_eq!(choose(&items), 0);
    }
}
