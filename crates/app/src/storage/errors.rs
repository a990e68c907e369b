//! Storage errors.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error")]
    Io(#[from] io::Error),

    #[error("storage file is corrupt")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize storage file")]
    Serialize(#[source] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
