//! Analysis modules.
//!
//! Filtering and distribution statistics over a roster snapshot.

pub mod aggregator;

pub use aggregator::*;
