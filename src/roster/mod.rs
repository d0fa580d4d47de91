//! Roster retrieval.
//!
//! Snapshots come from the roster API, a local JSON file, or the sample
//! generator. Sample data replaces a failed fetch only when the caller
//! enables the fallback.

pub mod client;
pub mod sample;

pub use client::{load_snapshot_file, RosterClient};
pub use sample::{or_sample_snapshot, sample_snapshot};
