use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
    #[error("{invalid} malformed entries in run log {path}")]
    InvalidLog { path: PathBuf, invalid: usize },
    #[error("{failed} of {total} conformance cases failed")]
    Failed { failed: usize, total: usize },
}
