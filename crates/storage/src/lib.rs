//! Storage layer: the JSON library file and the poster cache directory.
//!
//! Holds the persisted `MovieRecord` model and the store trait the library
//! service writes through.

use std::path::PathBuf;
use thiserror::Error;

pub mod json;
pub mod models;
pub mod posters;

pub use json::JsonLibraryStore;
pub use models::MovieRecord;
pub use posters::PosterCache;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("library file {path} is corrupt: {reason}")]
    CorruptData { path: PathBuf, reason: String },
    #[error("invalid poster identifier: {0:?}")]
    InvalidPosterId(String),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole-library persistence. Single process, single writer.
pub trait LibraryStore: Send + Sync {
    fn load(&self) -> Result<Vec<MovieRecord>, StorageError>;
    fn save(&self, library: &[MovieRecord]) -> Result<(), StorageError>;
}
