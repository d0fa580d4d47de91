//! Typed errors for roster retrieval.
//!
//! The fetch layer reports failures to the caller instead of substituting
//! data; `main` decides whether a failure falls back to a sample roster.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from fetching or loading a roster snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read snapshot file at {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot file at {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
