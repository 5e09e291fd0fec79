//! Errors reported by `VPTree` when a query is malformed.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A k-nearest or closest-pair query asked for zero results.
    #[error("at least one result must be requested")]
    ZeroCapacity,
    /// A radius or separation that is negative or not a number.
    #[error("search radius must be a non-negative number, got {0}")]
    InvalidRadius(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
