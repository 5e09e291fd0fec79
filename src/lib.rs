//! Vantage-point trees for exact range, k-nearest-neighbour and
//! closest-pair queries in any metric space.
//!
//! The functions in [`index`] build the tree in place, inside a slice
//! the caller owns, with the metric and threshold storage supplied as
//! callbacks. [`VPTree`] wraps them for items implementing
//! [`MetricItem`].
//!
//! ```
//! use vpindex::{MetricItem, VPTree};
//!
//! struct Point(f64, f64);
//!
//! impl MetricItem<f64> for Point {
//!     fn distance(&self, other: &Self) -> f64 {
//!         (self.0 - other.0).hypot(self.1 - other.1)
//!     }
//! }
//!
//! let tree = VPTree::new(vec![Point(0.0, 0.0), Point(1.0, 1.0), Point(5.0, 5.0)]);
//! let nearest = tree.nearest_neighbors(&Point(0.9, 0.9), 2).unwrap();
//! assert_eq!(nearest[0].item.0, 1.0);
//! assert_eq!(nearest[1].item.0, 0.0);
//! ```
pub mod error;
pub mod heap;
pub mod index;
pub mod median;
pub mod vantage;
pub mod vptree;

pub use error::{Error, Result};
pub use index::{build, build_with_rng, closest, find, find_nearest, Neighbour, Pair, Scalar};
pub use vantage::VantageStrategy;
pub use vptree::{Config, MetricItem, VPTree};
