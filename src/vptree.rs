//! An owned vantage-point tree over items that know their own metric.
//!
//! `VPTree` keeps each item's threshold inline, next to the item, and
//! validates query arguments before handing them to the functions in
//! `index`.
use std::iter::FromIterator;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::index::{self, Neighbour, Pair, Scalar};
use crate::vantage::{self, VantageStrategy};

/// Items with a distance function.
///
/// The distance must be a metric (non-negative, symmetric, obeying the
/// triangle inequality) or queries will silently miss items. `Q` lets
/// items be measured against a query of another type, as long as it
/// agrees with the item-to-item distance.
pub trait MetricItem<F: Scalar, Q: ?Sized = Self> {
    fn distance(&self, other: &Q) -> F;
}

const DEFAULT_SEED: u64 = 0x5eed;

/// Build settings for `VPTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub vantage: VantageStrategy,
    /// Seeds both the vantage point choice and the median partitioning.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config { vantage: VantageStrategy::default(), seed: DEFAULT_SEED }
    }
}

impl Config {
    pub fn vantage(mut self, vantage: VantageStrategy) -> Self {
        self.vantage = vantage;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
struct Node<F, T> {
    item: T,
    mu: F,
}

fn node_distance<F: Scalar, T: MetricItem<F>>(a: &Node<F, T>, b: &Node<F, T>) -> F {
    a.item.distance(&b.item)
}

fn query_distance<F, T, Q>(node: &Node<F, T>, q: &Q) -> F
    where F: Scalar, Q: ?Sized, T: MetricItem<F, Q> {

    node.item.distance(q)
}

fn node_threshold<F: Scalar, T>(node: &Node<F, T>) -> F {
    node.mu
}

fn check_radius<F: Scalar>(radius: F) -> Result<()> {
    if radius >= F::zero() {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius.to_f64().unwrap_or(f64::NAN)))
    }
}

fn check_capacity(k: usize) -> Result<()> {
    if k == 0 {
        Err(Error::ZeroCapacity)
    } else {
        Ok(())
    }
}

/// A vantage-point tree that owns its items.
#[derive(Debug, Clone)]
pub struct VPTree<F: Scalar, T: MetricItem<F>> {
    nodes: Vec<Node<F, T>>,
    config: Config,
}

impl<F: Scalar, T: MetricItem<F>> VPTree<F, T> {
    /// Construct a new vantage point tree from a set of elements.
    pub fn new(items: Vec<T>) -> VPTree<F, T> {
        VPTree::with_config(items, Config::default())
    }

    pub fn with_config(items: Vec<T>, config: Config) -> VPTree<F, T> {
        let mut nodes: Vec<Node<F, T>> = items.into_iter()
            .map(|item| Node { item, mu: F::zero() })
            .collect();

        let mut pivot_rng = StdRng::seed_from_u64(config.seed);
        let mut vantage_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let save = |node: &mut Node<F, T>, mu: F| node.mu = mu;

        match config.vantage {
            VantageStrategy::First =>
                index::build_with_rng(&mut nodes, &mut pivot_rng, vantage::first,
                                      node_distance, save),
            VantageStrategy::Random =>
                index::build_with_rng(&mut nodes, &mut pivot_rng, vantage::random(&mut vantage_rng),
                                      node_distance, save),
            VantageStrategy::Spread =>
                index::build_with_rng(&mut nodes, &mut pivot_rng,
                                      vantage::spread(&mut vantage_rng, node_distance),
                                      node_distance, save),
        }

        debug!("built vantage point tree over {} items ({:?} vantage points)",
               nodes.len(), config.vantage);
        VPTree { nodes, config }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The items, in tree order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().map(|node| &node.item)
    }

    /// Give back the items, in tree order.
    pub fn into_items(self) -> Vec<T> {
        self.nodes.into_iter().map(|node| node.item).collect()
    }

    /// Call `f` with every item within `radius` of `obj`, and its
    /// distance, in no particular order.
    pub fn for_each_within<Q, G>(&self, obj: &Q, radius: F, mut f: G) -> Result<()>
        where Q: ?Sized, T: MetricItem<F, Q>, G: FnMut(&T, F) {

        check_radius(radius)?;
        let mut evaluations: usize = 0;
        let mut found: usize = 0;
        index::find(&self.nodes, obj, radius,
                    |node: &Node<F, T>, q: &Q| { evaluations += 1; query_distance(node, q) },
                    node_threshold,
                    |node: &Node<F, T>, d| { found += 1; f(&node.item, d) });
        trace!("range search found {} of {} items with {} distance evaluations",
               found, self.nodes.len(), evaluations);
        Ok(())
    }

    /// Find every item within `radius` of `obj`, in no particular order.
    pub fn within<Q>(&self, obj: &Q, radius: F) -> Result<Vec<Neighbour<'_, T, F>>>
        where Q: ?Sized, T: MetricItem<F, Q> {

        check_radius(radius)?;
        let mut found = Vec::new();
        index::find(&self.nodes, obj, radius,
                    query_distance,
                    node_threshold,
                    |node, d| found.push(Neighbour { item: &node.item, distance: d }));
        Ok(found)
    }

    /// Find the nearest neighbor, or `None` if the tree is empty.
    pub fn nearest_neighbor<Q>(&self, obj: &Q) -> Option<Neighbour<'_, T, F>>
        where Q: ?Sized, T: MetricItem<F, Q> {

        self.nearest(obj, F::infinity(), 1).into_iter().next()
    }

    /// Find the n nearest neighbors, closest first.
    pub fn nearest_neighbors<Q>(&self, obj: &Q, n: usize) -> Result<Vec<Neighbour<'_, T, F>>>
        where Q: ?Sized, T: MetricItem<F, Q> {

        check_capacity(n)?;
        Ok(self.nearest(obj, F::infinity(), n))
    }

    /// Find the n nearest neighbors within `radius` of `obj`, closest first.
    pub fn nearest_within<Q>(&self, obj: &Q, radius: F, n: usize) -> Result<Vec<Neighbour<'_, T, F>>>
        where Q: ?Sized, T: MetricItem<F, Q> {

        check_capacity(n)?;
        check_radius(radius)?;
        Ok(self.nearest(obj, radius, n))
    }

    fn nearest<Q>(&self, obj: &Q, radius: F, n: usize) -> Vec<Neighbour<'_, T, F>>
        where Q: ?Sized, T: MetricItem<F, Q> {

        let mut evaluations: usize = 0;
        let measure = |node: &Node<F, T>, q: &Q| {
            evaluations += 1;
            query_distance(node, q)
        };
        let found = index::find_nearest(&self.nodes, obj, radius, n, measure, node_threshold);
        trace!("nearest search kept {} of {} requested with {} distance evaluations",
               found.len(), n, evaluations);

        found.into_iter()
            .map(|nb| Neighbour { item: &nb.item.item, distance: nb.distance })
            .collect()
    }

    /// Find the n closest pairs of distinct items no more than
    /// `max_separation` apart, closest first.
    pub fn closest_pairs(&self, n: usize, max_separation: F) -> Result<Vec<Pair<'_, T, F>>> {
        check_capacity(n)?;
        check_radius(max_separation)?;

        let mut evaluations: usize = 0;
        let measure = |a: &Node<F, T>, b: &Node<F, T>| {
            evaluations += 1;
            node_distance(a, b)
        };
        let found = index::closest(&self.nodes, max_separation, n, measure, node_threshold);
        trace!("closest pair search kept {} of {} requested with {} distance evaluations",
               found.len(), n, evaluations);

        Ok(found.into_iter()
           .map(|p| Pair { a: &p.a.item, b: &p.b.item, distance: p.distance })
           .collect())
    }
}

impl<F: Scalar, T: MetricItem<F>> FromIterator<T> for VPTree<F, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        VPTree::new(iter.into_iter().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::{Config, MetricItem, VPTree};
    use crate::error::Error;
    use crate::vantage::VantageStrategy;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Point(f64);

    impl MetricItem<f64> for Point {
        fn distance(&self, a: &Self) -> f64 {
            (self.0 - a.0).abs()
        }
    }

    impl MetricItem<f64, f64> for Point {
        fn distance(&self, a: &f64) -> f64 {
            (self.0 - a).abs()
        }
    }

    fn line(n: usize, config: Config) -> VPTree<f64, Point> {
        VPTree::with_config((0..n).map(|x| Point(x as f64)).collect(), config)
    }

    #[test]
    fn every_strategy_finds_the_same() {
        for &vantage in &[VantageStrategy::First, VantageStrategy::Random, VantageStrategy::Spread] {
            let tree = line(50, Config::default().vantage(vantage).seed(9));
            assert_eq!(tree.len(), 50);

            let mut found: Vec<f64> = tree.within(&20.5f64, 2.0).unwrap().iter().map(|n| n.item.0).collect();
            found.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(found, vec![19.0, 20.0, 21.0, 22.0]);

            let near = tree.nearest_neighbors(&Point(48.9), 3).unwrap();
            let xs: Vec<f64> = near.iter().map(|n| n.item.0).collect();
            assert_eq!(xs, vec![49.0, 48.0, 47.0]);
        }
    }

    #[test]
    fn query_with_other_type() {
        let tree = line(10, Config::default());
        let nb = tree.nearest_neighbor(&3.2f64).unwrap();
        assert_eq!(*nb.item, Point(3.0));
        assert!((nb.distance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_queries() {
        let tree = line(10, Config::default());
        assert_eq!(tree.nearest_neighbors(&Point(1.0), 0).unwrap_err(), Error::ZeroCapacity);
        assert_eq!(tree.within(&Point(1.0), -1.0).unwrap_err(), Error::InvalidRadius(-1.0));
        assert!(tree.nearest_within(&Point(1.0), f64::NAN, 2).is_err());
        assert_eq!(tree.closest_pairs(0, 1.0).unwrap_err(), Error::ZeroCapacity);
        assert!(tree.for_each_within(&Point(1.0), -0.5, |_, _| ()).is_err());
    }

    #[test]
    fn empty_tree() {
        let tree: VPTree<f64, Point> = VPTree::new(vec![]);
        assert!(tree.is_empty());
        assert!(tree.nearest_neighbor(&Point(0.0)).is_none());
        assert!(tree.within(&Point(0.0), 10.0).unwrap().is_empty());
        assert!(tree.closest_pairs(3, 10.0).unwrap().is_empty());
    }

    #[test]
    fn keeps_every_item() {
        let tree: VPTree<f64, Point> = (0..20).map(|x| Point((x * 7 % 20) as f64)).collect();
        let mut xs: Vec<f64> = tree.iter().map(|p| p.0).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, (0..20).map(|x| x as f64).collect::<Vec<_>>());
        assert_eq!(tree.into_items().len(), 20);
    }

    #[test]
    fn for_each_within_counts() {
        let tree = line(30, Config::default());
        let mut total = 0.0;
        tree.for_each_within(&Point(10.0), 1.0, |p, d| total += p.0 + d).unwrap();
        assert_eq!(total, 9.0 + 10.0 + 11.0 + 2.0);
    }

    #[test]
    fn closest_pairs_of_a_line() {
        let tree: VPTree<f64, Point> =
            vec![Point(0.0), Point(3.0), Point(3.5), Point(9.0), Point(9.1)].into_iter().collect();
        let pairs = tree.closest_pairs(5, 1.0).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!((pairs[0].distance - 0.1).abs() < 1e-9);
        assert_eq!(pairs[1].distance, 0.5);
    }
}
