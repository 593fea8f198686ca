use std::path::PathBuf;

use thiserror::Error;

use crate::filters::FilterError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {} is not valid JSON", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store file holds an invalid entry")]
    Filter(#[from] FilterError),

    #[error("store file version mismatch (expected {expected}, found {found})")]
    VersionMismatch { expected: u32, found: u32 },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
