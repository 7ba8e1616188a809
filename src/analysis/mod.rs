//! Numeric analysis stages of the sales insight service.
//!
//! Each stage takes a borrowed series and returns a new value; nothing here
//! performs I/O or holds state between calls.
//!
//! Submodules:
//! - `aggregate`: buckets raw records into calendar-aligned sums.
//! - `decompose`: classical additive/multiplicative seasonal decomposition.
//! - `extremes`: lowest and highest fraction of observed points.

pub mod aggregate;
pub mod decompose;
pub mod extremes;

pub use aggregate::aggregate;
pub use decompose::decompose;
pub use extremes::{find_extremes, ExtremesSet};
